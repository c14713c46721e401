use std::{sync::Arc, time::Duration};

use chrono::Utc;
use shared::{
    domain::{default_slides, TitleAnimation},
    error::{ApiError, ErrorCode},
    protocol::{ChartKind, ChartSpec, DashboardView, RenderedChart, RenewableShareResponse},
};
use storage::{DataStore, DatasetSnapshot};
use tracing::{error, warn};

pub mod cache;
pub mod charts;
pub mod svg;

use cache::TtlCache;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

pub const INVALID_CONSUMPTION_MESSAGE: &str =
    "Por favor ingrese un valor válido para el consumo total.";
pub const NON_POSITIVE_CONSUMPTION_MESSAGE: &str = "El consumo total debe ser un valor positivo.";

#[derive(Clone)]
pub struct ApiContext {
    pub store: DataStore,
    pub snapshot: Arc<DatasetSnapshot>,
    charts: TtlCache<ChartKind, ChartSpec>,
    table: TtlCache<(), Vec<Vec<String>>>,
}

impl ApiContext {
    pub fn new(store: DataStore, snapshot: DatasetSnapshot, cache_ttl: Duration) -> Self {
        Self {
            store,
            snapshot: Arc::new(snapshot),
            charts: TtlCache::new(cache_ttl),
            table: TtlCache::new(cache_ttl),
        }
    }

    pub async fn load(store: DataStore, cache_ttl: Duration) -> anyhow::Result<Self> {
        let snapshot = store.load_snapshot().await?;
        Ok(Self::new(store, snapshot, cache_ttl))
    }
}

/// Share of the submitted consumption covered by the loaded renewable
/// figures, as a percentage capped at 100.
pub fn renewable_share(ctx: &ApiContext, raw_total: &str) -> Result<RenewableShareResponse, ApiError> {
    let total_consumption = raw_total
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ApiError::validation(INVALID_CONSUMPTION_MESSAGE))?;
    if total_consumption <= 0.0 {
        return Err(ApiError::validation(NON_POSITIVE_CONSUMPTION_MESSAGE));
    }

    let production = ctx.snapshot.total_renewables();
    if production <= 0.0 {
        return Err(ApiError::internal("no renewable production data loaded"));
    }

    Ok(RenewableShareResponse {
        total_consumption,
        renewable_percentage: (total_consumption / production * 100.0).min(100.0),
    })
}

pub async fn chart(ctx: &ApiContext, kind: ChartKind) -> Result<ChartSpec, ApiError> {
    ctx.charts
        .get_or_try_insert_with(kind, || build_chart(ctx, kind))
        .await
}

async fn build_chart(ctx: &ApiContext, kind: ChartKind) -> Result<ChartSpec, ApiError> {
    let spec = match kind {
        ChartKind::Bar => charts::production_by_source(&ctx.snapshot.source_totals),
        ChartKind::Pie => {
            charts::electricity_share(&ctx.store.electricity_shares().await.map_err(internal)?)
        }
        ChartKind::Line => {
            charts::installed_capacity_trend(&ctx.store.installed_capacity().await.map_err(internal)?)
        }
        ChartKind::Area => {
            charts::renewable_vs_conventional(&ctx.store.world_consumption().await.map_err(internal)?)
        }
    };
    Ok(spec)
}

pub async fn rendered_chart(ctx: &ApiContext, kind: ChartKind) -> Result<RenderedChart, ApiError> {
    let spec = chart(ctx, kind).await?;
    let data_uri = svg::chart_data_uri(&svg::render_svg(&spec));
    Ok(RenderedChart { spec, data_uri })
}

pub async fn page_table(ctx: &ApiContext) -> Vec<Vec<String>> {
    let rows = ctx
        .table
        .get_or_try_insert_with((), || async { ctx.store.page_table().await })
        .await;
    rows.unwrap_or_else(|err| {
        error!(error = %format!("{err:#}"), "failed to read page table");
        Vec::new()
    })
}

/// Assembles everything the dashboard page shows. Charts that fail to build
/// are left out rather than failing the page.
pub async fn dashboard_view(
    ctx: &ApiContext,
    share: Option<Result<RenewableShareResponse, ApiError>>,
) -> DashboardView {
    let mut charts = Vec::with_capacity(ChartKind::ALL.len());
    for kind in ChartKind::ALL {
        match rendered_chart(ctx, kind).await {
            Ok(chart) => charts.push(chart),
            Err(err) => warn!(chart = %kind, error = %err.message, "chart unavailable"),
        }
    }

    let (renewable_percentage, error) = match share {
        Some(Ok(response)) => (Some(response.renewable_percentage), None),
        Some(Err(err)) => (None, Some(err)),
        None => (None, None),
    };

    DashboardView {
        slides: default_slides(),
        title_animation: TitleAnimation::default(),
        charts,
        table: page_table(ctx).await,
        renewable_percentage,
        error,
        generated_at: Utc::now(),
    }
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, format!("{err:#}"))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

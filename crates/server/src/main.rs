use std::{net::SocketAddr, path::Path, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{Path as UrlPath, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use server_api::{chart, dashboard_view, renewable_share, svg, ApiContext};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{ChartKind, ChartSpec, DashboardView, RenewableShareRequest, RenewableShareResponse},
};
use storage::DataStore;
use tower_http::{limit::RequestBodyLimitLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod html;

use app_state::AppState;
use config::load_settings;

const MAX_REQUEST_BODY_BYTES: usize = 16 * 1024;

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[derive(Debug, Deserialize)]
struct ShareForm {
    #[serde(default)]
    consumo_total: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    if settings.hosted {
        info!("running in hosted mode");
    } else {
        info!("running locally");
    }

    let store = DataStore::open(&settings.data_dir).await.map_err(|error| {
        error!(
            data_dir = %settings.data_dir.display(),
            error = %format!("{error:#}"),
            "failed to open dataset directory; check APP__DATA_DIR"
        );
        error
    })?;
    let api = ApiContext::load(store, settings.chart_cache_ttl()).await?;
    info!(
        renewable_records = api.snapshot.renewables.len(),
        sources = api.snapshot.source_totals.len(),
        "datasets loaded"
    );

    let app = build_router(Arc::new(AppState { api }), &settings.static_dir);

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index).post(submit_share))
        .route("/healthz", get(healthz))
        .route("/api/dashboard", get(http_dashboard))
        .route("/api/renewable-share", post(http_renewable_share))
        .route("/api/charts/:kind", get(http_chart))
        .route("/api/charts/:kind/svg", get(http_chart_svg))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> ApiResult<&'static str> {
    state.api.store.health_check().await.map_err(|e| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::new(ErrorCode::Internal, format!("{e:#}"))),
        )
    })?;
    Ok("ok")
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let view = dashboard_view(&state.api, None).await;
    Html(html::render_dashboard(&view))
}

async fn submit_share(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ShareForm>,
) -> Html<String> {
    let share = renewable_share(&state.api, &form.consumo_total);
    let view = dashboard_view(&state.api, Some(share)).await;
    Html(html::render_dashboard(&view))
}

async fn http_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    Json(dashboard_view(&state.api, None).await)
}

async fn http_renewable_share(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RenewableShareRequest>,
) -> ApiResult<Json<RenewableShareResponse>> {
    renewable_share(&state.api, &req.total_consumption)
        .map(Json)
        .map_err(api_error)
}

async fn http_chart(
    State(state): State<Arc<AppState>>,
    UrlPath(kind): UrlPath<String>,
) -> ApiResult<Json<ChartSpec>> {
    let kind = kind.parse::<ChartKind>().map_err(api_error)?;
    chart(&state.api, kind).await.map(Json).map_err(api_error)
}

async fn http_chart_svg(
    State(state): State<Arc<AppState>>,
    UrlPath(kind): UrlPath<String>,
) -> ApiResult<impl IntoResponse> {
    let kind = kind.parse::<ChartKind>().map_err(api_error)?;
    let spec = chart(&state.api, kind).await.map_err(api_error)?;
    Ok((
        [(header::CONTENT_TYPE, "image/svg+xml")],
        svg::render_svg(&spec),
    ))
}

fn api_error(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;

use super::*;
use axum::{body, body::Body, http::Request};
use server_api::{DEFAULT_CACHE_TTL, INVALID_CONSUMPTION_MESSAGE};
use std::fs;
use tempfile::TempDir;
use tower::ServiceExt;

fn write_fixture(dir: &Path) {
    let files = [
        (
            "data.csv",
            "Entity,Code,Year,Renewables (% equivalent primary energy)\nA,AA,2020,120\nB,BB,2020,80\n",
        ),
        (
            "08 wind-generation.csv",
            "Entity,Year,Electricity from wind (TWh)\nWorld,2020,40\n",
        ),
        (
            "04 share-electricity-renewables.csv",
            "Entity,Year,Renewables (% electricity)\nWorld,2021,28\n",
        ),
        (
            "11 share-electricity-wind.csv",
            "Entity,Year,Wind (% electricity)\nWorld,2021,6\n",
        ),
        (
            "15 share-electricity-solar.csv",
            "Entity,Year,Solar (% electricity)\nWorld,2021,3\n",
        ),
        (
            "07 share-electricity-hydro.csv",
            "Entity,Year,Hydro (% electricity)\nWorld,2021,15\n",
        ),
        (
            "data_pagina.csv",
            "Fuente,Dato\nEólica,<b>Limpia</b>\n",
        ),
    ];
    for (name, contents) in files {
        fs::write(dir.join(name), contents).expect("fixture");
    }
}

async fn test_app() -> (TempDir, Router) {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path().join("archivo");
    fs::create_dir_all(&data_dir).expect("data dir");
    fs::create_dir_all(dir.path().join("pkg")).expect("pkg dir");
    write_fixture(&data_dir);
    fs::write(dir.path().join("pkg").join("client_core.js"), "export default 1;").expect("js");

    let store = DataStore::open(&data_dir).await.expect("store");
    let api = ApiContext::load(store, DEFAULT_CACHE_TTL).await.expect("api");
    let app = build_router(Arc::new(AppState { api }), dir.path());
    (dir, app)
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

#[tokio::test]
async fn healthz_reports_ok_when_data_dir_is_readable() {
    let (_dir, app) = test_app().await;
    let response = app
        .oneshot(Request::get("/healthz").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn healthz_fails_once_data_dir_disappears() {
    let (dir, app) = test_app().await;
    fs::remove_dir_all(dir.path().join("archivo")).expect("remove");
    let response = app
        .oneshot(Request::get("/healthz").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn index_renders_carousel_icon_and_title_markup() {
    let (_dir, app) = test_app().await;
    let response = app
        .oneshot(Request::get("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_text(response).await;
    assert!(page.contains(r#"id="energyCarousel""#));
    assert!(page.contains(r#"<i id="energy-icon" class="fas fa-sun fa-4x">"#));
    assert!(page.contains(r#"<div class="carousel-item active" data-icon="fas fa-sun">"#));
    assert!(page.contains(r#"<div class="carousel-item" data-icon="fas fa-wind">"#));
    assert!(page.contains(r#"data-icon="fas fa-water""#));
    assert!(page.contains(r#"<span class="auto-type">Energía Renovable</span>"#));
    assert!(page.contains("/static/pkg/client_core.js"));
    assert!(page.contains("&lt;b&gt;Limpia&lt;/b&gt;"));
    assert!(page.contains("data:image/svg+xml;base64,"));
}

#[tokio::test]
async fn form_post_shows_renewable_percentage() {
    let (_dir, app) = test_app().await;
    let request = Request::post("/")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("consumo_total=50"))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_text(response).await;
    assert!(page.contains("Porcentaje de energía renovable: 25.00%"));
    assert!(!page.contains("share-error"));
}

#[tokio::test]
async fn form_post_with_bad_value_shows_validation_message() {
    let (_dir, app) = test_app().await;
    let request = Request::post("/")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("consumo_total=abc"))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_text(response).await;
    assert!(page.contains(INVALID_CONSUMPTION_MESSAGE));
    assert!(!page.contains("renewable-percentage"));
}

#[tokio::test]
async fn share_api_returns_percentage_or_validation_error() {
    let (_dir, app) = test_app().await;

    let ok = Request::post("/api/renewable-share")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({ "total_consumption": "400" }).to_string(),
        ))
        .expect("request");
    let response = app.clone().oneshot(ok).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let dto: RenewableShareResponse =
        serde_json::from_str(&body_text(response).await).expect("json");
    assert_eq!(dto.renewable_percentage, 100.0);

    let bad = Request::post("/api/renewable-share")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({ "total_consumption": "-1" }).to_string(),
        ))
        .expect("request");
    let response = app.oneshot(bad).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let err: ApiError = serde_json::from_str(&body_text(response).await).expect("json");
    assert_eq!(err.code, ErrorCode::Validation);
}

#[tokio::test]
async fn chart_routes_serve_json_and_svg() {
    let (_dir, app) = test_app().await;

    let response = app
        .clone()
        .oneshot(Request::get("/api/charts/pie").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let spec: ChartSpec = serde_json::from_str(&body_text(response).await).expect("json");
    assert_eq!(spec.kind, ChartKind::Pie);
    assert_eq!(spec.series[0].points[2].y, 15.0);

    let response = app
        .oneshot(Request::get("/api/charts/bar/svg").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).expect("content type"),
        "image/svg+xml"
    );
    assert!(body_text(response).await.starts_with("<svg"));
}

#[tokio::test]
async fn unknown_chart_kind_is_not_found() {
    let (_dir, app) = test_app().await;
    let response = app
        .oneshot(Request::get("/api/charts/radar").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn chart_with_missing_dataset_is_internal_error() {
    let (_dir, app) = test_app().await;
    let response = app
        .oneshot(Request::get("/api/charts/line").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn dashboard_api_lists_available_charts() {
    let (_dir, app) = test_app().await;
    let response = app
        .oneshot(Request::get("/api/dashboard").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let view: DashboardView = serde_json::from_str(&body_text(response).await).expect("json");
    let kinds: Vec<ChartKind> = view.charts.iter().map(|chart| chart.spec.kind).collect();
    assert_eq!(kinds, vec![ChartKind::Bar, ChartKind::Pie]);
    assert_eq!(view.slides.len(), 3);
    assert!(view.renewable_percentage.is_none());
}

#[tokio::test]
async fn static_client_bundle_is_served() {
    let (_dir, app) = test_app().await;
    let response = app
        .oneshot(
            Request::get("/static/pkg/client_core.js")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "export default 1;");
}

#[tokio::test]
async fn oversized_form_body_is_rejected() {
    let (_dir, app) = test_app().await;
    let body = format!("consumo_total={}", "9".repeat(MAX_REQUEST_BODY_BYTES + 1));
    let request = Request::post("/")
        .header("content-type", "application/x-www-form-urlencoded")
        .header("content-length", body.len().to_string())
        .body(Body::from(body))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

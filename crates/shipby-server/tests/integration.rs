use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use dear_client::{DearError, Sale, SaleGateway, SaleListEntry, SaleUpdate};
use http_body_util::BodyExt;
use shipby_core::SyncWindow;
use shipby_server::{AppState, BatchRunner, RunnerSettings};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Send a GET request via `oneshot` and return (status, parsed JSON body).
async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// A gateway with no sales whose listing always fails.
struct DownGateway;

#[async_trait]
impl SaleGateway for DownGateway {
    async fn list_sales(&self, _: &SyncWindow, _: &str) -> dear_client::Result<Vec<SaleListEntry>> {
        Err(DearError::Status {
            context: "saleList".into(),
            status: 503,
            body: "maintenance".into(),
        })
    }

    async fn get_sale(&self, id: &str) -> dear_client::Result<Sale> {
        panic!("unexpected fetch of {id}")
    }

    async fn update_sale(&self, update: &SaleUpdate) -> dear_client::Result<()> {
        panic!("unexpected update of {}", update.id)
    }
}

/// A gateway that lists nothing.
struct QuietGateway;

#[async_trait]
impl SaleGateway for QuietGateway {
    async fn list_sales(&self, _: &SyncWindow, _: &str) -> dear_client::Result<Vec<SaleListEntry>> {
        Ok(Vec::new())
    }

    async fn get_sale(&self, id: &str) -> dear_client::Result<Sale> {
        panic!("unexpected fetch of {id}")
    }

    async fn update_sale(&self, update: &SaleUpdate) -> dear_client::Result<()> {
        panic!("unexpected update of {}", update.id)
    }
}

fn settings() -> RunnerSettings {
    RunnerSettings {
        location_id: "loc-1".into(),
        source_channel: "Shopify".into(),
        timezone: chrono_tz::America::New_York,
        order_delay: Duration::ZERO,
        created_lookback_days: 1,
        updated_lookback_secs: 300,
        dry_run: false,
    }
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn liveness_acknowledges() {
    let app = shipby_server::build_router(AppState::new("Shopify"));
    let (status, json) = get(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn status_before_first_run_is_empty() {
    let app = shipby_server::build_router(AppState::new("Shopify"));
    let (status, json) = get(app, "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source_channel"], "Shopify");
    assert_eq!(json["runs"], 0);
    assert!(json["last_summary"].is_null());
}

#[tokio::test]
async fn status_reports_last_summary() {
    let state = AppState::new("Shopify");
    let runner = BatchRunner::new(Arc::new(QuietGateway), settings());
    state.record(&runner.run().await).await;

    let (_, json) = get(shipby_server::build_router(state), "/api/status").await;

    assert_eq!(json["runs"], 1);
    assert_eq!(json["last_summary"]["candidates"], 0);
    assert!(json["last_error"].is_null());
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = shipby_server::build_router(AppState::new("Shopify"));
    let (status, _) = get(app, "/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn scheduler_runs_at_startup_and_on_each_tick() {
    let state = AppState::new("Shopify");
    let runner = Arc::new(BatchRunner::new(Arc::new(QuietGateway), settings()));

    shipby_server::scheduler::run_scheduler(
        runner,
        Duration::from_secs(300),
        state.clone(),
        tokio::time::sleep(Duration::from_secs(650)),
    )
    .await;

    // t=0, t=300, t=600
    assert_eq!(state.snapshot().await.runs, 3);
}

#[tokio::test(start_paused = true)]
async fn scheduler_survives_list_failures() {
    let state = AppState::new("Shopify");
    let runner = Arc::new(BatchRunner::new(Arc::new(DownGateway), settings()));

    shipby_server::scheduler::run_scheduler(
        runner,
        Duration::from_secs(300),
        state.clone(),
        tokio::time::sleep(Duration::from_secs(350)),
    )
    .await;

    let status = state.snapshot().await;
    assert_eq!(status.runs, 2);
    assert!(status.last_error.unwrap().contains("maintenance"));
}

#[tokio::test]
async fn service_stops_on_shutdown() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let runner = Arc::new(BatchRunner::new(Arc::new(QuietGateway), settings()));
    let state = AppState::new("Shopify");

    let result = shipby_server::run_service(
        listener,
        runner,
        Duration::from_secs(300),
        state.clone(),
        tokio::time::sleep(Duration::from_millis(100)),
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(state.snapshot().await.runs, 1);
}

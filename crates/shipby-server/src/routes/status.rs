use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::{AppState, SchedulerStatus};

#[derive(Serialize)]
pub struct StatusResponse {
    pub source_channel: String,
    pub started_at: DateTime<Utc>,
    #[serde(flatten)]
    pub scheduler: SchedulerStatus,
}

/// GET /api/status: counters and the most recent run summary.
pub async fn get_status(State(app): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        source_channel: app.source_channel.clone(),
        started_at: app.started_at,
        scheduler: app.snapshot().await,
    })
}

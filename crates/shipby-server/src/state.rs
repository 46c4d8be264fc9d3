use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::RunError;
use crate::runner::RunSummary;

/// What the scheduler has done so far, as reported by `/api/status`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchedulerStatus {
    pub runs: u64,
    pub last_finished_at: Option<DateTime<Utc>>,
    pub last_summary: Option<RunSummary>,
    /// Set when the most recent run failed to list sales.
    pub last_error: Option<String>,
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub source_channel: String,
    pub started_at: DateTime<Utc>,
    pub status: Arc<RwLock<SchedulerStatus>>,
}

impl AppState {
    pub fn new(source_channel: impl Into<String>) -> Self {
        Self {
            source_channel: source_channel.into(),
            started_at: Utc::now(),
            status: Arc::new(RwLock::new(SchedulerStatus::default())),
        }
    }

    /// Record the result of a finished run.
    pub async fn record(&self, result: &Result<RunSummary, RunError>) {
        let mut status = self.status.write().await;
        status.runs += 1;
        status.last_finished_at = Some(Utc::now());
        match result {
            Ok(summary) => {
                status.last_summary = Some(summary.clone());
                status.last_error = None;
            }
            Err(e) => status.last_error = Some(e.to_string()),
        }
    }

    pub async fn snapshot(&self) -> SchedulerStatus {
        self.status.read().await.clone()
    }
}

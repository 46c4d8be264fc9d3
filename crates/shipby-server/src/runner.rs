//! One pass over recently touched sales.
//!
//! List → for each candidate: fetch → extract → reconcile → update. Sales are
//! handled strictly one after another with a fixed pause in between to stay
//! under the API rate limit. A failure on one sale is logged and recorded;
//! only a failed listing aborts the run.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use dear_client::{SaleGateway, SaleUpdate};
use serde::Serialize;
use shipby_core::config::Config;
use shipby_core::{reconcile, Decision, OrderSnapshot, StagingReason, SyncWindow};

use crate::error::{FailureStage, OrderError, RunError};

// ─── Settings ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RunnerSettings {
    pub location_id: String,
    pub source_channel: String,
    pub timezone: Tz,
    pub order_delay: Duration,
    pub created_lookback_days: u32,
    pub updated_lookback_secs: u32,
    /// Compute decisions without writing anything back.
    pub dry_run: bool,
}

impl RunnerSettings {
    pub fn from_config(config: &Config) -> shipby_core::Result<Self> {
        Ok(Self {
            location_id: config.location_id.clone(),
            source_channel: config.source_channel.clone(),
            timezone: config.tz()?,
            order_delay: config.order_delay(),
            created_lookback_days: config.created_lookback_days,
            updated_lookback_secs: config.updated_lookback_secs,
            dry_run: false,
        })
    }
}

// ─── Summary ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub duration_ms: u128,
    pub window: SyncWindow,
    /// Rows returned by the listing, before channel/status filtering.
    pub listed: usize,
    pub candidates: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub dry_run: bool,
    pub outcomes: Vec<OrderOutcome>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderOutcome {
    pub sale_id: String,
    #[serde(flatten)]
    pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OrderStatus {
    Updated {
        ship_by: DateTime<Utc>,
        staged: Option<StagingReason>,
    },
    /// Dry run: this update would have been sent.
    Planned {
        ship_by: DateTime<Utc>,
        staged: Option<StagingReason>,
        note: String,
    },
    Unchanged,
    Failed {
        stage: FailureStage,
        error: String,
    },
}

// ─── Runner ───────────────────────────────────────────────────────────────

pub struct BatchRunner<G: ?Sized> {
    gateway: Arc<G>,
    settings: RunnerSettings,
}

impl<G: SaleGateway + ?Sized> BatchRunner<G> {
    pub fn new(gateway: Arc<G>, settings: RunnerSettings) -> Self {
        Self { gateway, settings }
    }

    pub async fn run(&self) -> Result<RunSummary, RunError> {
        self.run_at(Utc::now()).await
    }

    /// Run with the sync window anchored at `now`.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<RunSummary, RunError> {
        let clock = Instant::now();
        let s = &self.settings;
        let window = SyncWindow::at(
            now,
            s.timezone,
            s.created_lookback_days,
            s.updated_lookback_secs,
        );
        tracing::debug!(
            created_since = %window.created_since_param(),
            updated_since = %window.updated_since_param(),
            "starting run"
        );

        let entries = self
            .gateway
            .list_sales(&window, &s.location_id)
            .await
            .map_err(RunError::List)?;
        let listed = entries.len();
        let ids: Vec<String> = entries
            .into_iter()
            .filter(|e| e.is_candidate(&s.source_channel))
            .map(|e| e.sale_id)
            .collect();
        tracing::info!(
            listed,
            candidates = ids.len(),
            channel = %s.source_channel,
            "fetched sale list"
        );

        let mut outcomes = Vec::with_capacity(ids.len());
        for (i, sale_id) in ids.into_iter().enumerate() {
            if i > 0 && !s.order_delay.is_zero() {
                tokio::time::sleep(s.order_delay).await;
            }
            let status = match self.process(&sale_id).await {
                Ok(status) => status,
                Err(e) => {
                    tracing::error!(%sale_id, stage = ?e.stage(), "error processing sale: {e}");
                    OrderStatus::Failed {
                        stage: e.stage(),
                        error: e.to_string(),
                    }
                }
            };
            outcomes.push(OrderOutcome { sale_id, status });
        }

        let count = |f: fn(&OrderStatus) -> bool| outcomes.iter().filter(|o| f(&o.status)).count();
        let summary = RunSummary {
            started_at: now,
            duration_ms: clock.elapsed().as_millis(),
            window,
            listed,
            candidates: outcomes.len(),
            updated: count(|st| {
                matches!(st, OrderStatus::Updated { .. } | OrderStatus::Planned { .. })
            }),
            unchanged: count(|st| matches!(st, OrderStatus::Unchanged)),
            failed: count(|st| matches!(st, OrderStatus::Failed { .. })),
            dry_run: s.dry_run,
            outcomes,
        };
        tracing::info!(
            updated = summary.updated,
            unchanged = summary.unchanged,
            failed = summary.failed,
            duration_ms = summary.duration_ms as u64,
            "run complete"
        );
        Ok(summary)
    }

    async fn process(&self, sale_id: &str) -> Result<OrderStatus, OrderError> {
        let sale = self
            .gateway
            .get_sale(sale_id)
            .await
            .map_err(OrderError::Fetch)?;
        let customer = sale.customer.as_deref().unwrap_or("");

        let snapshot = OrderSnapshot::new(sale.note.clone(), sale.ship_by);
        tracing::debug!(
            sale_id,
            customer,
            delivery_date = ?snapshot.delivery_date,
            ship_by = ?snapshot.ship_by,
            "reconciling"
        );

        let (ship_by, note, staged) = match reconcile(&snapshot).map_err(OrderError::Reconcile)? {
            Decision::NoOp => {
                tracing::info!(sale_id, customer, "ship-by already matches delivery date; skipping");
                return Ok(OrderStatus::Unchanged);
            }
            Decision::Update {
                ship_by,
                note,
                staged,
            } => (ship_by, note, staged),
        };

        if let Some(reason) = staged {
            tracing::info!(sale_id, customer, %reason, %ship_by, "applying staging buffer");
        }

        if self.settings.dry_run {
            return Ok(OrderStatus::Planned {
                ship_by,
                staged,
                note,
            });
        }

        let update = SaleUpdate::from_sale(&sale, ship_by, note);
        self.gateway
            .update_sale(&update)
            .await
            .map_err(OrderError::Update)?;
        tracing::info!(sale_id, customer, %ship_by, "updated ship-by");

        Ok(OrderStatus::Updated { ship_by, staged })
    }
}

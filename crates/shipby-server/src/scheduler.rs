//! Fixed-interval driver for [`BatchRunner`].
//!
//! The first run starts immediately. Each run is awaited before the next
//! tick is taken and ticks missed while a run was in flight are skipped, so
//! two runs never overlap.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dear_client::SaleGateway;
use tokio::time::MissedTickBehavior;

use crate::runner::BatchRunner;
use crate::state::AppState;

pub async fn run_scheduler<G, F>(
    runner: Arc<BatchRunner<G>>,
    interval: Duration,
    state: AppState,
    shutdown: F,
) where
    G: SaleGateway + ?Sized,
    F: Future<Output = ()>,
{
    tracing::info!(interval_secs = interval.as_secs(), "starting scheduler");
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }

        tokio::select! {
            _ = &mut shutdown => {
                tracing::warn!("shutdown requested mid-run; remaining sales wait for the next start");
                break;
            }
            result = runner.run() => {
                if let Err(e) = &result {
                    tracing::error!("run failed: {e}");
                }
                state.record(&result).await;
            }
        }
    }

    tracing::info!("scheduler stopped");
}

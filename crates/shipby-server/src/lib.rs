pub mod error;
pub mod routes;
pub mod runner;
pub mod scheduler;
pub mod state;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use dear_client::SaleGateway;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

pub use error::{FailureStage, OrderError, RunError};
pub use runner::{BatchRunner, OrderOutcome, OrderStatus, RunSummary, RunnerSettings};
pub use state::AppState;

/// Build the axum Router with the liveness and status routes.
/// Used by `serve_on()` and available for integration testing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::health::liveness))
        .route("/api/status", get(routes::status::get_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the router on a pre-bound listener until `shutdown` resolves.
pub async fn serve_on<F>(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let port = listener.local_addr()?.port();
    tracing::info!("liveness endpoint listening on http://localhost:{port}");
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Run the HTTP server and the scheduler side by side until `shutdown`
/// resolves or the server fails.
pub async fn run_service<G, F>(
    listener: tokio::net::TcpListener,
    runner: Arc<BatchRunner<G>>,
    interval: Duration,
    state: AppState,
    shutdown: F,
) -> anyhow::Result<()>
where
    G: SaleGateway + ?Sized,
    F: Future<Output = ()>,
{
    let (stop_tx, stop_rx) = watch::channel(false);
    let stopped = |mut rx: watch::Receiver<bool>| async move {
        let _ = rx.wait_for(|stop| *stop).await;
    };

    let server_stop = stopped(stop_rx.clone());
    let scheduler_stop = stopped(stop_rx.clone());
    let trigger_stop = stopped(stop_rx);
    let server_state = state.clone();

    let server = async {
        let result = serve_on(listener, server_state, server_stop).await;
        let _ = stop_tx.send(true);
        result
    };
    let scheduler = scheduler::run_scheduler(runner, interval, state, scheduler_stop);
    let trigger = async {
        tokio::select! {
            _ = shutdown => {
                tracing::info!("shutting down");
                let _ = stop_tx.send(true);
            }
            _ = trigger_stop => {}
        }
    };

    let (server_result, (), ()) = tokio::join!(server, scheduler, trigger);
    server_result
}

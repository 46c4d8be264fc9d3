use anyhow::Result;
use shipby_core::config::Config;
use shipby_server::{AppState, BatchRunner, RunnerSettings};
use std::sync::Arc;

use super::{build_client, ensure_valid};

pub fn run(config: &Config) -> Result<()> {
    ensure_valid(config)?;
    let client = build_client(config)?;
    let settings = RunnerSettings::from_config(config)?;
    let runner = Arc::new(BatchRunner::new(Arc::new(client), settings));
    let state = AppState::new(config.source_channel.clone());
    let interval = config.poll_interval();
    let port = config.port;

    tracing::info!(
        channel = %config.source_channel,
        location_id = %config.location_id,
        interval_secs = interval.as_secs(),
        "starting ship-by sync"
    );

    let rt = tokio::runtime::Runtime::new()?;
    let listener = rt.block_on(tokio::net::TcpListener::bind(("0.0.0.0", port)))?;
    rt.block_on(shipby_server::run_service(
        listener,
        runner,
        interval,
        state,
        async {
            let _ = tokio::signal::ctrl_c().await;
        },
    ))
}

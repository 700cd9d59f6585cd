use std::sync::Arc;

use anyhow::Result;
use safekids_common::config::DaemonConfig;
use tracing::{error, info};

mod daemon;
mod sink;

use daemon::Daemon;
use sink::LogSink;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(true)
        .init();

    info!("Starting SafeKids daemon");

    let config = DaemonConfig::load()?;

    let (daemon, _location_tx) = Daemon::new(&config, Arc::new(LogSink));
    // The location sender is handed to the platform location source once
    // a transport is wired in; holding it here keeps the daemon alive.

    if let Err(e) = daemon.run().await {
        error!("Daemon error: {}", e);
        return Err(e);
    }

    info!("SafeKids daemon stopped");
    Ok(())
}

//! Swapline server application library

use std::sync::Arc;

use anyhow::Context;
use chain_reader::{ChainReader, SnapshotFile, SnapshotReader};
use swapline_api::AppState;
use swapline_core::AppConfig;

/// Install the global tracing subscriber
pub fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("swapline=debug".parse()?)
                .add_directive("amm=debug".parse()?)
                .add_directive("chain_reader=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}

/// Chain reader for the configured snapshot, or an empty one
pub fn build_reader(config: &AppConfig) -> anyhow::Result<Arc<dyn ChainReader>> {
    match &config.snapshot_path {
        Some(path) => {
            let reader = SnapshotReader::from_file(path)
                .with_context(|| format!("loading pool snapshot {}", path.display()))?;
            Ok(Arc::new(reader))
        }
        None => {
            tracing::warn!("No snapshot_path configured; serving an empty pool set");
            Ok(Arc::new(SnapshotReader::new("empty", SnapshotFile::default())))
        }
    }
}

/// Run the quoting server until it fails
pub async fn run() -> anyhow::Result<()> {
    init_tracing()?;

    let config = AppConfig::from_env().context("loading configuration")?;
    tracing::info!(
        port = config.api_port,
        max_hops = config.router.max_hops,
        tolerance_bps = config.router.tolerance_bps,
        "Starting Swapline"
    );

    let reader = build_reader(&config)?;
    let state = AppState::new(config, reader);

    swapline_api::start_server(state)
        .await
        .context("API server stopped")
}

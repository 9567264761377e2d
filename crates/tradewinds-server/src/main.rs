//! Server binary for Tradewinds.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration (`tradewinds.yaml`, or the path given as the
//!    first argument; missing file means defaults)
//! 3. Open the save store for private rooms
//! 4. Build the registry and application state
//! 5. Serve WebSocket and REST traffic until stopped

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use tradewinds_core::GameConfig;
use tradewinds_server::AppState;
use tradewinds_store::FileSaveStore;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration loading or the listener fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("tradewinds-server starting");

    // 2. Configuration.
    let path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("tradewinds.yaml"), PathBuf::from);
    let cfg = Arc::new(GameConfig::load_or_default(&path)?);
    info!(
        turn_seconds = cfg.rules.turn_seconds,
        dock_tax = cfg.rules.dock_tax,
        debt_floor = cfg.rules.debt_floor,
        port = cfg.server.port,
        "configuration loaded"
    );

    // 3. Save store.
    let store = Arc::new(FileSaveStore::new(cfg.server.save_dir.clone()));
    info!(save_dir = %cfg.server.save_dir, "save store ready");

    // 4. Application state.
    let state = Arc::new(AppState::new(Arc::clone(&cfg), store));

    // 5. Serve.
    tradewinds_server::serve(state).await?;
    Ok(())
}

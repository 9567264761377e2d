//! WebSocket/REST server for Tradewinds.
//!
//! Wires the room registry, the save store, and the Axum transport
//! together. Game traffic flows over one WebSocket per player; the
//! REST surface is limited to the room listing and a health check.
//!
//! # Modules
//!
//! - [`state`] -- Shared application state
//! - [`registry`] -- The room registry
//! - [`connection`] -- WebSocket session lifecycle
//! - [`router`] / [`handlers`] -- Axum wiring and REST handlers
//! - [`error`] -- Error types

pub mod connection;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod router;
pub mod state;

use std::sync::Arc;

pub use error::ServerError;
pub use registry::Registry;
pub use state::AppState;

/// Bind the listener and serve until the process is stopped.
///
/// # Errors
///
/// Returns [`ServerError::Io`] if the listener cannot be bound or the
/// server fails while running.
pub async fn serve(state: Arc<AppState>) -> Result<(), ServerError> {
    let port = state.cfg.server.port;
    let app = router::build_router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

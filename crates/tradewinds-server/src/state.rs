//! Shared application state for the server.
//!
//! [`AppState`] is the single value injected into Axum handlers and
//! WebSocket sessions: the room registry and the loaded configuration.
//! It holds no per-room state -- rooms own themselves.

use std::sync::Arc;

use tradewinds_core::GameConfig;
use tradewinds_store::SaveStore;

use crate::registry::Registry;

/// Shared state for the Axum application, wrapped in [`Arc`].
pub struct AppState {
    /// The room registry.
    pub registry: Registry,
    /// The loaded configuration.
    pub cfg: Arc<GameConfig>,
}

impl AppState {
    /// Build the application state from configuration and a save store.
    pub fn new(cfg: Arc<GameConfig>, store: Arc<dyn SaveStore>) -> Self {
        Self {
            registry: Registry::new(Arc::clone(&cfg), store),
            cfg,
        }
    }
}

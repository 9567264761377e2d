//! Axum router construction.
//!
//! Assembles the WebSocket endpoint and the small REST surface into a
//! single [`Router`] with CORS and request tracing enabled.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::connection;
use crate::handlers;
use crate::state::AppState;

/// Build the complete router.
///
/// - `GET /` -- minimal HTML status page
/// - `GET /ws` -- the WebSocket game connection
/// - `GET /api/rooms` -- public room listing
/// - `GET /api/health` -- liveness check
///
/// CORS allows any origin for development; restrict in production.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/ws", get(connection::ws_handler))
        .route("/api/rooms", get(handlers::list_rooms))
        .route("/api/health", get(handlers::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

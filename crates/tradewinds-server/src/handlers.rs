//! REST handlers for the administrative surface.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::Json;
use tradewinds_types::RoomInfo;

use crate::state::AppState;

/// Minimal HTML status page.
///
/// # Route
///
/// `GET /`
pub async fn index() -> Html<&'static str> {
    Html(
        "<html><head><title>Tradewinds</title></head>\
         <body><h1>Tradewinds</h1>\
         <p>Game traffic: <code>GET /ws</code>. \
         Rooms: <a href=\"/api/rooms\">/api/rooms</a>. \
         Health: <a href=\"/api/health\">/api/health</a>.</p>\
         </body></html>",
    )
}

/// The public room listing.
///
/// # Route
///
/// `GET /api/rooms`
pub async fn list_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomInfo>> {
    Json(state.registry.list().await)
}

/// Liveness and a couple of cheap facts.
///
/// # Route
///
/// `GET /api/health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let rooms = state.registry.len().await;
    Json(serde_json::json!({
        "status": "ok",
        "rooms": rooms,
    }))
}

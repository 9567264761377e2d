//! Integration tests for the REST surface.
//!
//! Tests drive the Axum `Router` directly via `tower::ServiceExt`
//! without starting a TCP server, validating routing and handler logic
//! with no live network.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use tradewinds_core::GameConfig;
use tradewinds_server::router::build_router;
use tradewinds_server::AppState;
use tradewinds_store::MemorySaveStore;

fn make_state() -> Arc<AppState> {
    Arc::new(AppState::new(
        Arc::new(GameConfig::default()),
        Arc::new(MemorySaveStore::new()),
    ))
}

async fn get_json(state: Arc<AppState>, uri: &str) -> (StatusCode, Value) {
    let app = build_router(state);
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = get_json(make_state(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("status").and_then(Value::as_str), Some("ok"));
    assert_eq!(body.get("rooms").and_then(Value::as_u64), Some(0));
}

#[tokio::test]
async fn room_listing_shows_public_rooms_only() {
    let state = make_state();
    let public = state
        .registry
        .create_room(String::from("open table"), false, None)
        .await;
    let private = state
        .registry
        .create_room(
            String::from("my game"),
            true,
            Some(tradewinds_types::PlayerId::new()),
        )
        .await;

    let (status, body) = get_json(Arc::clone(&state), "/api/rooms").await;
    assert_eq!(status, StatusCode::OK);
    let rooms = body.as_array().unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(
        rooms
            .first()
            .and_then(|r| r.get("name"))
            .and_then(Value::as_str),
        Some("open table")
    );

    state.registry.close_room(public.id).await;
    state.registry.close_room(private.id).await;
}

#[tokio::test]
async fn index_serves_html() {
    let app = build_router(make_state());
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = build_router(make_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

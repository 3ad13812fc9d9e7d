#![allow(dead_code)]

use std::net::SocketAddr;

use axum::Router;

use lobby_api::AppState;

pub fn test_state() -> AppState {
    AppState::new()
}

pub fn test_app() -> (Router, AppState) {
    let state = test_state();
    let app = lobby_api::routes::router().with_state(state.clone());
    (app, state)
}

/// Start an actual TCP server for WebSocket testing.
/// Returns (addr, state). The server runs in the background.
pub async fn start_ws_server() -> (SocketAddr, AppState) {
    let (app, state) = test_app();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, state)
}

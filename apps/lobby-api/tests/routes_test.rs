mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_test::TestServer;
use tower::ServiceExt;

use lobby_api::gateway::session::outbound_channel;

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_ok() {
    let (app, _state) = common::test_app();
    let server = TestServer::new(app).unwrap();

    let resp = server.get("/health").await;
    resp.assert_status_ok();

    let body: serde_json::Value = resp.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["online"], 0);
}

#[tokio::test]
async fn health_counts_live_sessions() {
    let (app, state) = common::test_app();
    let (tx, _rx) = outbound_channel();
    state.gateway.connect(Some("alice"), tx).unwrap();

    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["online"], 1);
}

// ---------------------------------------------------------------------------
// GET /api/v1/users
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_users_returns_roster_in_admission_order() {
    let (app, state) = common::test_app();
    let server = TestServer::new(app).unwrap();

    let (tx, _alice_rx) = outbound_channel();
    let alice = state.gateway.connect(Some("alice"), tx).unwrap();
    let (tx, _bob_rx) = outbound_channel();
    let bob = state.gateway.connect(Some("bob"), tx).unwrap();

    let resp = server.get("/api/v1/users").await;
    resp.assert_status_ok();

    let users: Vec<serde_json::Value> = resp.json();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["userId"], alice.user_id.as_str());
    assert_eq!(users[1]["userId"], bob.user_id.as_str());
    assert_eq!(users[1]["username"], "bob");
}

#[tokio::test]
async fn list_users_drops_departed_sessions() {
    let (app, state) = common::test_app();
    let server = TestServer::new(app).unwrap();

    let (tx, _rx) = outbound_channel();
    let alice = state.gateway.connect(Some("alice"), tx).unwrap();
    state.gateway.disconnect(&alice.user_id);

    let users: Vec<serde_json::Value> = server.get("/api/v1/users").await.json();
    assert!(users.is_empty());
}

// ---------------------------------------------------------------------------
// OpenAPI document
// ---------------------------------------------------------------------------

#[test]
fn openapi_document_lists_http_endpoints() {
    use utoipa::OpenApi;

    let doc = lobby_api::routes::ApiDoc::openapi();
    assert!(doc.paths.paths.contains_key("/health"));
    assert!(doc.paths.paths.contains_key("/api/v1/users"));
}

//! Read-only roster endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::gateway::session::Session;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/users", get(list_users))
}

// ---------------------------------------------------------------------------
// GET /api/v1/users
// ---------------------------------------------------------------------------

/// Same snapshot a client receives in its `users` event.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    responses(
        (status = 200, description = "Connected users in admission order", body = Vec<Session>),
    ),
)]
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<Session>> {
    Json(state.gateway.roster())
}

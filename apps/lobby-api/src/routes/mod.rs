pub mod health;
pub mod users;

use axum::Router;
use utoipa::OpenApi;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(crate::gateway::server::router())
        .nest("/api/v1", users::router())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        users::list_users,
    ),
    components(
        schemas(
            crate::error::ApiErrorBody,
            crate::error::ApiErrorDetail,
            crate::gateway::session::Session,
            health::HealthResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check"),
        (name = "Users", description = "Connected users"),
    )
)]
pub struct ApiDoc;

pub mod config;
pub mod error;
pub mod gateway;
pub mod routes;

use gateway::Gateway;

/// Shared application state available to all route handlers.
#[derive(Clone, Default)]
pub struct AppState {
    pub gateway: Gateway,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

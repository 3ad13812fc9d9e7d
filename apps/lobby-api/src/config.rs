/// Lobby API configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Browser origin allowed by CORS (e.g. `http://localhost:5173`).
    /// `None` allows any origin.
    pub cors_origin: Option<String>,
}

const DEFAULT_PORT: u16 = 4001;

impl Config {
    /// Load configuration from environment variables. Every variable is
    /// optional.
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            cors_origin: std::env::var("CORS_ORIGIN").ok().filter(|s| !s.is_empty()),
        }
    }
}

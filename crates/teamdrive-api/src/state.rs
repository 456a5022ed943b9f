//! Application state shared across all handlers.

use std::sync::Arc;

use teamdrive_core::config::app::ServerConfig;
use teamdrive_service::ServiceContainer;

/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// HTTP server settings (body limit, CORS).
    pub server: Arc<ServerConfig>,
    /// Every use case.
    pub services: ServiceContainer,
}

impl AppState {
    /// Creates the state from wired services.
    pub fn new(server: ServerConfig, services: ServiceContainer) -> Self {
        Self {
            server: Arc::new(server),
            services,
        }
    }
}

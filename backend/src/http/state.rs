//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::repository::FactRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for database operations
    pub repository: Arc<dyn FactRepository>,
    /// Configuration the process was started with
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new application state with the given repository and configuration.
    pub fn new(repository: Arc<dyn FactRepository>, config: AppConfig) -> Self {
        Self {
            repository,
            config: Arc::new(config),
        }
    }
}

use std::sync::Arc;

use crm_db::{Repositories, SharedBackend};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Record backend shared by every repository.
    pub backend: SharedBackend,
    /// One repository per entity kind.
    pub repos: Repositories,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(backend: SharedBackend, config: ServerConfig) -> Self {
        Self {
            repos: Repositories::new(Arc::clone(&backend)),
            backend,
            config: Arc::new(config),
        }
    }
}

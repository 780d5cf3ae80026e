use std::sync::Arc;

use scribe_ai::AiBridge;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference-counted and the rest sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: scribe_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Outbound client for the configured AI vendor.
    pub ai: Arc<AiBridge>,
}

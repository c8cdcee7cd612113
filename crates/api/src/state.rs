use std::sync::Arc;

use pricesorter_core::freshness::FreshnessTracker;

use crate::config::ServerConfig;
use crate::error::{AppError, Rejection};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Built once at startup and torn down at shutdown; cheaply cloneable.
#[derive(Clone)]
pub struct AppState {
    /// Read-only pool over the listings database.
    pub pool: pricesorter_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Last dataset refresh trigger time, written by the refresh scheduler.
    pub freshness: Arc<FreshnessTracker>,
}

impl AppState {
    /// Wrap an error with the configured error policy for rendering.
    pub fn reject(&self, error: impl Into<AppError>) -> Rejection {
        Rejection::new(error, self.config.error_policy)
    }
}

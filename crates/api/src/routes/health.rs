//! `GET /health`: liveness plus dataset readiness.
//!
//! The listings table only exists once the external updater has run, so a
//! readable database file alone does not mean the service can answer
//! listing queries.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use pricesorter_db::repositories::ListingRepo;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when listings can be served, otherwise `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub listings_table: bool,
    /// Last refresh trigger, epoch seconds.
    pub last_updated: i64,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let listings_table = match ListingRepo::table_exists(&state.pool).await {
        Ok(present) => Some(present),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            None
        }
    };
    let db_healthy = listings_table.is_some();
    let listings_table = listings_table.unwrap_or(false);

    Json(HealthResponse {
        status: if listings_table { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        listings_table,
        last_updated: state.freshness.last_updated(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

//! Handlers for dataset status and freshness.

use axum::extract::State;
use axum::Json;
use pricesorter_db::repositories::ListingRepo;

use crate::error::{AppError, AppResult};
use crate::response::StatusResponse;
use crate::state::AppState;

/// GET /
///
/// Number of listings and when the dataset was last refreshed.
pub async fn summary(State(state): State<AppState>) -> AppResult<Json<StatusResponse>> {
    let product_count = ListingRepo::count(&state.pool)
        .await
        .map_err(|e| state.reject(AppError::Status(e)))?;

    Ok(Json(StatusResponse {
        pass: true,
        product_count,
        last_updated: state.freshness.last_updated(),
    }))
}

/// GET /updated
///
/// The freshness timestamp alone, as a bare JSON integer.
pub async fn last_updated(State(state): State<AppState>) -> Json<i64> {
    Json(state.freshness.last_updated())
}

//! Handlers for the paged listing endpoints.
//!
//! Every endpoint normalizes `page` and `externSupplier` the same way and
//! returns at most one page of listings, cheapest price-per-standard first.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use pricesorter_core::category::Category;
use pricesorter_core::listing_query::SearchText;
use pricesorter_db::models::Listing;
use pricesorter_db::repositories::ListingRepo;

use crate::error::{AppError, AppResult};
use crate::query::ListingParams;
use crate::response::DataResponse;
use crate::state::AppState;

type ListingsResponse = Json<DataResponse<Vec<Listing>>>;

/// GET /category/{category}
///
/// Listings in one category. Unknown categories, and path segments that do
/// not decode, are rejected without querying the database.
pub async fn by_category(
    State(state): State<AppState>,
    category: Result<Path<String>, PathRejection>,
    params: ListingParams,
) -> AppResult<ListingsResponse> {
    let Path(category) =
        category.map_err(|e| state.reject(AppError::BadRequest(e.body_text())))?;
    let category: Category = category.parse().map_err(|e| state.reject(e))?;
    let page = params.page_request();

    let rows = ListingRepo::by_category(&state.pool, category, page)
        .await
        .map_err(|e| state.reject(e))?;

    tracing::debug!(%category, page = page.page, rows = rows.len(), "Category listings served");
    Ok(Json(DataResponse::new(rows)))
}

/// GET /top
///
/// Cheapest listings across every category.
pub async fn top(State(state): State<AppState>, params: ListingParams) -> AppResult<ListingsResponse> {
    let page = params.page_request();

    let rows = ListingRepo::top(&state.pool, page)
        .await
        .map_err(|e| state.reject(e))?;

    tracing::debug!(page = page.page, rows = rows.len(), "Top listings served");
    Ok(Json(DataResponse::new(rows)))
}

/// GET /search?query=
///
/// Listings whose title contains `query`. A missing or empty query is
/// rejected without querying the database.
pub async fn search(State(state): State<AppState>, params: ListingParams) -> AppResult<ListingsResponse> {
    let text = SearchText::parse(params.query.as_deref()).map_err(|e| state.reject(e))?;
    let page = params.page_request();

    tracing::debug!(query = text.as_str(), page = page.page, "Search executed");
    let rows = ListingRepo::search(&state.pool, text, page)
        .await
        .map_err(|e| state.reject(e))?;

    Ok(Json(DataResponse::new(rows)))
}

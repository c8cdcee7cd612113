pub mod health;

use axum::routing::get;
use axum::Router;

use crate::handlers::{listings, status};
use crate::state::AppState;

/// Build the public route tree.
///
/// ```text
/// GET /                       dataset summary (count + freshness)
/// GET /updated                freshness timestamp only
/// GET /category/{category}    cheapest listings in a category
/// GET /top                    cheapest listings overall
/// GET /search                 cheapest listings matching ?query=
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(status::summary))
        .route("/updated", get(status::last_updated))
        .route("/category/{category}", get(listings::by_category))
        .route("/top", get(listings::top))
        .route("/search", get(listings::search))
}

//! Query parameters shared by the listing endpoints.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use pricesorter_core::paging::PageRequest;

/// Raw `?page=&externSupplier=&query=` values.
///
/// Extraction never fails. Each key takes its first occurrence, unknown keys
/// are ignored, and a query string that cannot be decoded is treated as
/// absent. The values themselves are normalized later with safe defaults.
#[derive(Debug, Default)]
pub struct ListingParams {
    pub page: Option<String>,
    pub extern_supplier: Option<String>,
    pub query: Option<String>,
}

impl ListingParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_params(self.page.as_deref(), self.extern_supplier.as_deref())
    }

    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = ListingParams::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut params.page,
                "externSupplier" => &mut params.extern_supplier,
                "query" => &mut params.query,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ListingParams {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let pairs = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();
        Ok(ListingParams::from_pairs(pairs))
    }
}

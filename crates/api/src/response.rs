//! Shared response envelope types for API handlers.
//!
//! Successful responses carry `"pass": true` next to their payload; failures
//! are rendered by [`Rejection`](crate::error::Rejection) with
//! `"pass": false`.

use serde::Serialize;

/// Standard `{ "pass": true, "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub pass: bool,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { pass: true, data }
    }
}

/// Body of `GET /`: dataset size and freshness.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub pass: bool,
    pub product_count: i64,
    pub last_updated: i64,
}

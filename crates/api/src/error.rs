use std::str::FromStr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pricesorter_core::error::CoreError;
use serde_json::{Map, Value};

/// Message shown instead of data store errors in sanitized mode.
pub const SANITIZED_MESSAGE: &str = "An internal error occurred";

// ---------------------------------------------------------------------------
// Error policy
// ---------------------------------------------------------------------------

/// How much of an underlying data store error reaches the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorDetail {
    /// Pass the raw database message through.
    #[default]
    Verbose,
    /// Replace database messages with [`SANITIZED_MESSAGE`].
    Sanitized,
}

impl FromStr for ErrorDetail {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "verbose" => Ok(ErrorDetail::Verbose),
            "sanitized" | "sanitised" => Ok(ErrorDetail::Sanitized),
            other => Err(format!("expected `verbose` or `sanitized`, got `{other}`")),
        }
    }
}

/// Which HTTP status failures are sent with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorStatus {
    /// Always 200; failure is signalled only by `pass: false`.
    #[default]
    Body,
    /// 400 for invalid input, 500 for data store failures. Body unchanged.
    Http,
}

impl FromStr for ErrorStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "body" => Ok(ErrorStatus::Body),
            "http" => Ok(ErrorStatus::Http),
            other => Err(format!("expected `body` or `http`, got `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorPolicy {
    pub detail: ErrorDetail,
    pub status: ErrorStatus,
}

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

/// Application-level error type for HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Rejected input, raised before the data store is touched.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A request part axum could not extract (e.g. a path that is not UTF-8).
    #[error("{0}")]
    BadRequest(String),

    /// A listing query failed.
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    /// The product count for the status endpoint failed.
    #[error("{0}")]
    Status(sqlx::Error),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, Rejection>;

/// Body key carrying the failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureField {
    Reason,
    Error,
}

impl FailureField {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureField::Reason => "reason",
            FailureField::Error => "error",
        }
    }
}

impl AppError {
    /// The status endpoint and the missing search query report under
    /// `reason`; everything else under `error`.
    pub fn field(&self) -> FailureField {
        match self {
            AppError::Core(CoreError::MissingSearchQuery) | AppError::Status(_) => {
                FailureField::Reason
            }
            AppError::Core(_) | AppError::BadRequest(_) | AppError::Database(_) => {
                FailureField::Error
            }
        }
    }

    /// Status used when the policy asks for real HTTP codes.
    pub fn http_status(&self) -> StatusCode {
        match self {
            AppError::Core(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Status(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn is_data_store(&self) -> bool {
        matches!(self, AppError::Database(_) | AppError::Status(_))
    }

    /// Message shown to the client under the given detail level.
    pub fn public_message(&self, detail: ErrorDetail) -> String {
        if self.is_data_store() && detail == ErrorDetail::Sanitized {
            SANITIZED_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// Rejection
// ---------------------------------------------------------------------------

/// An [`AppError`] paired with the policy used to render it.
///
/// Produces `{ "pass": false, "<reason|error>": message }`.
#[derive(Debug)]
pub struct Rejection {
    pub error: AppError,
    pub policy: ErrorPolicy,
}

impl Rejection {
    pub fn new(error: impl Into<AppError>, policy: ErrorPolicy) -> Self {
        Self {
            error: error.into(),
            policy,
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let Rejection { error, policy } = self;

        if error.is_data_store() {
            tracing::error!(error = %error, "Data store query failed");
        } else {
            tracing::debug!(error = %error, "Request rejected");
        }

        let status = match policy.status {
            ErrorStatus::Body => StatusCode::OK,
            ErrorStatus::Http => error.http_status(),
        };

        let mut body = Map::new();
        body.insert("pass".to_string(), Value::Bool(false));
        body.insert(
            error.field().as_str().to_string(),
            Value::String(error.public_message(policy.detail)),
        );

        (status, axum::Json(Value::Object(body))).into_response()
    }
}

//! Error types for the recipe cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised while building a cache.
///
/// Cache operations themselves are total; only construction can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Rejected configuration (zero capacity, zero TTL)
    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(String),
}

// == Fetch Error Enum ==
/// Failures talking to the upstream recipe API.
///
/// None of these ever result in a cache write.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport failure or timeout
    #[error("Upstream unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Upstream returned status {0}")]
    Status(u16),

    /// Upstream body was not the expected JSON object
    #[error("Malformed upstream payload: {0}")]
    MalformedPayload(String),

    /// HTTP client could not be built
    #[error("Failed to build upstream client: {0}")]
    Client(#[source] reqwest::Error),
}

// == API Error Enum ==
/// Errors surfaced by the HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or invalid request input
    #[error("{0}")]
    BadRequest(String),

    /// Upstream fetch failed; `message` is what the client sees
    #[error("{message}")]
    Upstream {
        message: &'static str,
        #[source]
        source: FetchError,
    },
}

impl ApiError {
    /// Wraps a fetch failure with the client-facing message for a route.
    pub fn upstream(message: &'static str) -> impl FnOnce(FetchError) -> Self {
        move |source| ApiError::Upstream { message, source }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { source, .. } => {
                tracing::error!(error = %source, "{}", self);
                StatusCode::BAD_GATEWAY
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

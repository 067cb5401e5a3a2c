//! Error types for the report cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::cache::WeighError;

// == Cache Error Enum ==
/// Unified error type for the report cache.
///
/// Cache reads never produce one of these; a miss is `None`.
#[derive(Error, Debug)]
pub enum CacheError {
    /// `set` could not complete the storage mutation
    #[error("Failed to cache key '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: WeighError,
    },

    /// Rejected construction parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Key pattern failed to compile
    #[error("Invalid key pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Caller exceeded the allowance for a throttled action
    #[error("Rate limit exceeded, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::Write { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::InvalidPattern(_) => StatusCode::BAD_REQUEST,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        match self {
            CacheError::RateLimited { retry_after_secs } => (
                status,
                [(header::RETRY_AFTER, retry_after_secs.to_string())],
                body,
            )
                .into_response(),
            _ => (status, body).into_response(),
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the report cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_carries_key_and_cause() {
        let err = CacheError::Write {
            key: "report:pl".to_string(),
            source: WeighError::Fatal("allocator refused".to_string()),
        };

        let message = err.to_string();
        assert!(message.contains("report:pl"));
        assert!(message.contains("allocator refused"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_status_codes() {
        let limited = CacheError::RateLimited {
            retry_after_secs: 30,
        }
        .into_response();
        assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(limited.headers()[header::RETRY_AFTER], "30");

        let bad = CacheError::InvalidRequest("empty pattern".to_string()).into_response();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    }
}

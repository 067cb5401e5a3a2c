//! Request DTOs for the admin API
//!
//! Defines the query parameters accepted by the admin endpoints.

use serde::Deserialize;

/// Default number of rows in performance listings
pub const DEFAULT_LISTING_LIMIT: usize = 10;

/// Upper bound on rows in performance listings
pub const MAX_LISTING_LIMIT: usize = 100;

/// Query for pattern endpoints (`GET /entries`, `DELETE /invalidate`)
///
/// # Fields
/// - `pattern`: Regular expression searched against each full key
#[derive(Debug, Clone, Deserialize)]
pub struct PatternQuery {
    pub pattern: String,
}

impl PatternQuery {
    /// Validates the query
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.pattern.is_empty() {
            return Some("Pattern cannot be empty".to_string());
        }
        None
    }
}

/// Query for `GET /performance`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PerformanceQuery {
    /// Rows in the top-operations and recent-failures listings
    #[serde(default)]
    pub limit: Option<usize>,
}

impl PerformanceQuery {
    /// Requested limit, defaulted and capped.
    pub fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_LISTING_LIMIT)
            .min(MAX_LISTING_LIMIT)
    }
}

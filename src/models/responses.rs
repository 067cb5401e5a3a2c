//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;
use crate::monitor::{FailureRecord, OperationStats, PerformanceSummary};

/// Response body for `GET /stats`
///
/// The store's statistics verbatim plus human-readable renderings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// `total_size` as e.g. `1.5 KB`
    pub total_size_formatted: String,
    /// `hit_rate` as e.g. `66.67%`
    pub hit_rate_formatted: String,
}

impl StatsResponse {
    /// Creates a new StatsResponse
    pub fn new(stats: CacheStats) -> Self {
        Self {
            total_size_formatted: format_bytes(stats.total_size as u64),
            hit_rate_formatted: format_percent(stats.hit_rate),
            stats,
        }
    }
}

/// Response body for `POST /clear`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    /// Entries dropped by the clear
    pub cleared_entries: usize,
    /// Clears the caller may still perform in the current window
    pub remaining_clears: usize,
}

impl ClearResponse {
    /// Creates a new ClearResponse
    pub fn new(cleared_entries: usize, remaining_clears: usize) -> Self {
        Self {
            message: format!("Cache cleared ({} entries removed)", cleared_entries),
            cleared_entries,
            remaining_clears,
        }
    }
}

/// Response body for `DELETE /invalidate`
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// The pattern that was applied
    pub pattern: String,
    /// Entries removed
    pub removed: usize,
}

/// Time left on one matching key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryTtl {
    pub key: String,
    pub ttl_remaining_ms: u64,
}

/// Response body for `GET /entries`
#[derive(Debug, Clone, Serialize)]
pub struct EntriesResponse {
    /// The pattern that was applied
    pub pattern: String,
    /// Number of live matching entries
    pub count: usize,
    /// Matching payloads, ordered by key
    pub values: Vec<Value>,
    /// Matching keys with their remaining TTL, same order as `values`
    pub keys: Vec<EntryTtl>,
}

impl EntriesResponse {
    pub fn new(pattern: impl Into<String>, values: Vec<Value>, keys: Vec<EntryTtl>) -> Self {
        Self {
            pattern: pattern.into(),
            count: values.len(),
            values,
            keys,
        }
    }
}

/// Response body for `GET /performance`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceResponse {
    pub summary: PerformanceSummary,
    pub top_operations: Vec<OperationStats>,
    pub recent_failures: Vec<FailureRecord>,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

// == Formatting ==
/// Renders a byte count with binary units and up to two decimals.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rendered = format!("{:.2}", value);
    let rendered = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", rendered, UNITS[unit])
}

/// Renders a 0-100 percentage with two decimals.
pub fn format_percent(percent: f64) -> String {
    format!("{:.2}%", percent)
}

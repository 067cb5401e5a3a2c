//! Cache Statistics Module
//!
//! Point-in-time statistics snapshot reported by the store.

use serde::{Deserialize, Serialize};

// == Cache Stats ==
/// Snapshot of the store's size and effectiveness.
///
/// `size` is the raw storage count and may include entries that have expired
/// but not yet been swept; the periodic cleanup keeps it accurate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Current number of stored entries
    pub size: usize,
    /// Sum of per-entry hit counts across stored entries
    pub total_hits: u64,
    /// Sum of approximate payload sizes across stored entries, bytes
    pub total_size: usize,
    /// Lifetime hit percentage (0-100) since the last clear
    pub hit_rate: f64,
    /// Alias of `size`
    pub entries: usize,
    /// Lifetime `get` calls since the last clear
    pub total_requests: u64,
    /// Entries removed to make room since the last clear
    pub evictions: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }
}

// == Hit Rate ==
/// Percentage of requests that were hits, 0.0 when there were no requests.
pub fn hit_rate_percent(hits: u64, requests: u64) -> f64 {
    if requests == 0 {
        0.0
    } else {
        hits as f64 / requests as f64 * 100.0
    }
}

//! Monitor Module
//!
//! Performance recorder fed by callers of the cache. The cache itself never
//! depends on it; callers report whether each operation was a cache hit.

mod performance;

use std::sync::Arc;

use tokio::sync::RwLock;

pub use performance::{
    FailureRecord, OperationSample, OperationStats, PerformanceMonitor, PerformanceSummary,
};

/// Monitor shared between request handlers.
pub type SharedMonitor = Arc<RwLock<PerformanceMonitor>>;

/// Wraps a monitor for sharing.
pub fn shared_monitor(monitor: PerformanceMonitor) -> SharedMonitor {
    Arc::new(RwLock::new(monitor))
}

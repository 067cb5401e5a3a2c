//! Cache Module
//!
//! Provides in-memory caching with TTL expiry, frequency-weighted eviction
//! and pattern-based invalidation.

mod entry;
mod eviction;
mod pattern;
mod read_through;
mod stats;
mod store;
mod weigher;

#[cfg(test)]
mod property_tests;

use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::CacheEntry;
pub use eviction::{eviction_score, select_victim, UNHIT_PENALTY};
pub use pattern::KeyPattern;
pub use read_through::{get_or_compute, get_or_compute_tracked, Cached};
pub use stats::{hit_rate_percent, CacheStats};
pub use store::CacheStore;
pub use weigher::{JsonWeigher, WeighError, Weigher};

/// A store behind its single lock, shared between tasks.
pub type SharedCache<V> = Arc<RwLock<CacheStore<V>>>;

/// Wraps a store for sharing.
pub fn shared<V>(store: CacheStore<V>) -> SharedCache<V> {
    Arc::new(RwLock::new(store))
}

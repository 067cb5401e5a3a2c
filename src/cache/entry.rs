//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with usage bookkeeping.

// == Cache Entry ==
/// A cached payload together with the metadata used for expiry, eviction
/// scoring and statistics.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored payload
    pub data: V,
    /// Insertion (or last overwrite) timestamp, Unix milliseconds
    pub created_at: u64,
    /// Timestamp of the most recent successful read, Unix milliseconds
    pub last_accessed_at: u64,
    /// Successful reads since insertion
    pub hit_count: u64,
    /// Approximate payload size in bytes, computed once at insertion
    pub approximate_size: usize,
    /// Store-wide insertion sequence, breaks eviction ties
    pub(crate) sequence: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a fresh entry inserted at `now_ms`.
    pub fn new(data: V, now_ms: u64, approximate_size: usize, sequence: u64) -> Self {
        Self {
            data,
            created_at: now_ms,
            last_accessed_at: now_ms,
            hit_count: 0,
            approximate_size,
            sequence,
        }
    }

    // == Age ==
    /// Milliseconds since insertion.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.created_at)
    }

    // == Is Expired ==
    /// An entry is expired once its age strictly exceeds the TTL; an entry
    /// exactly `ttl_ms` old is still live.
    pub fn is_expired(&self, now_ms: u64, ttl_ms: u64) -> bool {
        self.age_ms(now_ms) > ttl_ms
    }

    // == Remaining TTL ==
    /// Milliseconds left before the entry expires, 0 once expired.
    pub fn ttl_remaining_ms(&self, now_ms: u64, ttl_ms: u64) -> u64 {
        ttl_ms.saturating_sub(self.age_ms(now_ms))
    }

    // == Record Hit ==
    /// Registers a successful read at `now_ms`.
    pub fn record_hit(&mut self, now_ms: u64) {
        self.hit_count += 1;
        self.last_accessed_at = now_ms;
    }
}

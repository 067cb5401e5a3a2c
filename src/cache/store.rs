//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with TTL expiry,
//! frequency-weighted eviction and pattern invalidation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::eviction::select_victim;
use crate::cache::stats::hit_rate_percent;
use crate::cache::{CacheEntry, CacheStats, JsonWeigher, KeyPattern, WeighError, Weigher};
use crate::clock::{system_clock, Clock};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Bounded key/value store for one payload type.
///
/// All operations run to completion synchronously. Share a store between
/// tasks through [`SharedCache`](crate::cache::SharedCache), which wraps it in
/// a single lock.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Expiry applied uniformly to every entry, milliseconds
    ttl_ms: u64,
    /// `get` calls since construction or the last clear
    total_requests: u64,
    /// `get` calls that returned data since construction or the last clear
    total_hits: u64,
    /// Capacity evictions since construction or the last clear
    evictions: u64,
    /// Next insertion sequence number
    next_sequence: u64,
    clock: Arc<dyn Clock>,
    weigher: Box<dyn Weigher<V>>,
}

impl<V: Serialize + 'static> CacheStore<V> {
    // == Constructor ==
    /// Creates a store sized by JSON length and driven by the system clock.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, must be non-zero
    /// * `ttl` - Lifetime of every entry, measured from insertion
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self> {
        Self::with_clock(capacity, ttl, system_clock())
    }

    /// Creates a store driven by the given clock.
    pub fn with_clock(capacity: usize, ttl: Duration, clock: Arc<dyn Clock>) -> Result<Self> {
        Self::with_parts(capacity, ttl, clock, Box::new(JsonWeigher))
    }
}

impl<V> CacheStore<V> {
    /// Creates a store from explicit collaborators.
    pub fn with_parts(
        capacity: usize,
        ttl: Duration,
        clock: Arc<dyn Clock>,
        weigher: Box<dyn Weigher<V>>,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "capacity must be greater than zero".to_string(),
            ));
        }
        let ttl_ms = u64::try_from(ttl.as_millis()).map_err(|_| {
            CacheError::InvalidConfig("ttl does not fit in milliseconds".to_string())
        })?;

        Ok(Self {
            entries: HashMap::new(),
            capacity,
            ttl_ms,
            total_requests: 0,
            total_hits: 0,
            evictions: 0,
            next_sequence: 0,
            clock,
            weigher,
        })
    }

    // == Set ==
    /// Stores `data` under `key`, overwriting any previous entry.
    ///
    /// When the store is full and `key` is new, one entry is evicted first.
    /// A payload that cannot be sized is cached with size 0; only a fatal
    /// sizing failure aborts the write, leaving the store untouched.
    pub fn set(&mut self, key: impl Into<String>, data: V) -> Result<()> {
        let key = key.into();

        let approximate_size = match self.weigher.weigh(&data) {
            Ok(size) => size,
            Err(WeighError::Unsizeable(reason)) => {
                debug!(key = %key, %reason, "payload not sizeable, recording size 0");
                0
            }
            Err(source) => {
                warn!(key = %key, error = %source, "cache write failed");
                return Err(CacheError::Write { key, source });
            }
        };

        let now = self.clock.now_ms();

        // Overwrites never grow the store
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            if let Some(victim) = select_victim(&self.entries, now) {
                self.entries.remove(&victim);
                self.evictions += 1;
                debug!(evicted = %victim, incoming = %key, "evicted entry at capacity");
            }
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries
            .insert(key, CacheEntry::new(data, now, approximate_size, sequence));

        Ok(())
    }

    // == Get ==
    /// Returns a copy of the payload for `key`, or `None` on a miss.
    ///
    /// Every call counts as a request. An expired entry is removed on sight;
    /// that removal is not an eviction.
    pub fn get(&mut self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        self.total_requests += 1;
        let now = self.clock.now_ms();

        let expired = self.entries.get(key)?.is_expired(now, self.ttl_ms);
        if expired {
            self.entries.remove(key);
            debug!(key = %key, "purged expired entry on read");
            return None;
        }

        let entry = self.entries.get_mut(key)?;
        entry.record_hit(now);
        self.total_hits += 1;
        Some(entry.data.clone())
    }

    // == Has ==
    /// Peeks for a live entry without counting a request or touching it.
    ///
    /// Expired entries read as absent but stay stored until the next `get`
    /// or `cleanup`.
    pub fn has(&self, key: &str) -> bool {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(now, self.ttl_ms))
    }

    // == Delete ==
    /// Removes an entry by key, returning whether one was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Clear ==
    /// Removes every entry and resets the request, hit and eviction counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.total_requests = 0;
        self.total_hits = 0;
        self.evictions = 0;
    }

    // == Cleanup ==
    /// Removes all expired entries, returning how many were removed.
    pub fn cleanup(&mut self) -> usize {
        let now = self.clock.now_ms();
        let ttl_ms = self.ttl_ms;
        let before = self.entries.len();

        self.entries
            .retain(|_, entry| !entry.is_expired(now, ttl_ms));

        before - self.entries.len()
    }

    // == Get By Pattern ==
    /// Returns payloads of live entries whose key matches, ordered by key.
    /// Statistics are not affected.
    pub fn get_by_pattern(&self, pattern: &KeyPattern) -> Vec<V>
    where
        V: Clone,
    {
        let now = self.clock.now_ms();
        let mut matched: Vec<(&String, &CacheEntry<V>)> = self
            .entries
            .iter()
            .filter(|(key, entry)| !entry.is_expired(now, self.ttl_ms) && pattern.matches(key))
            .collect();
        matched.sort_by(|a, b| a.0.cmp(b.0));

        matched
            .into_iter()
            .map(|(_, entry)| entry.data.clone())
            .collect()
    }

    // == Invalidate By Pattern ==
    /// Removes every entry whose key matches, returning how many were removed.
    pub fn invalidate_by_pattern(&mut self, pattern: &KeyPattern) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !pattern.matches(key));
        let removed = before - self.entries.len();

        debug!(pattern = %pattern, removed, "invalidated entries by pattern");
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let size = self.entries.len();
        let (total_hits, total_size) = self
            .entries
            .values()
            .fold((0u64, 0usize), |(hits, bytes), entry| {
                (hits + entry.hit_count, bytes + entry.approximate_size)
            });

        CacheStats {
            size,
            total_hits,
            total_size,
            hit_rate: hit_rate_percent(self.total_hits, self.total_requests),
            entries: size,
            total_requests: self.total_requests,
            evictions: self.evictions,
        }
    }

    // == Remaining TTL ==
    /// Time left before `key` expires, `None` if absent or already expired.
    pub fn remaining_ttl(&self, key: &str) -> Option<Duration> {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(now, self.ttl_ms))
            .map(|entry| Duration::from_millis(entry.ttl_remaining_ms(now, self.ttl_ms)))
    }

    // == Keys ==
    /// Live keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        let now = self.clock.now_ms();
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired(now, self.ttl_ms))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    // == Entry ==
    /// Stored entry metadata for `key`, expired or not.
    #[cfg(test)]
    pub(crate) fn entry(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    // == Length ==
    /// Returns the current number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lifetime of every entry.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

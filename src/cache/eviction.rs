//! Eviction Policy Module
//!
//! Frequency-weighted recency scoring used to pick a victim when the store is
//! full. This is not strict LRU: an old but heavily read entry can outlive a
//! recent entry that was never read again.

use std::collections::HashMap;

use crate::cache::CacheEntry;

/// Multiplier applied to entries that were never read after insertion.
pub const UNHIT_PENALTY: f64 = 1000.0;

// == Eviction Score ==
/// Scores an entry for eviction; the highest score is evicted first.
///
/// `score = idle_seconds * penalty`, where `penalty` is `1 / hit_count` for
/// entries that have been read and `UNHIT_PENALTY` for entries that have not.
pub fn eviction_score<V>(entry: &CacheEntry<V>, now_ms: u64) -> f64 {
    let idle_secs = now_ms.saturating_sub(entry.last_accessed_at) as f64 / 1000.0;
    let penalty = if entry.hit_count > 0 {
        1.0 / entry.hit_count as f64
    } else {
        UNHIT_PENALTY
    };
    idle_secs * penalty
}

// == Select Victim ==
/// Returns the key of the entry to evict, or `None` for an empty map.
///
/// The victim is the entry with the **highest** `eviction_score`: long idle
/// and rarely read. An entry read often and recently scores low and stays.
///
/// Equal scores go to the entry inserted first, so the choice is
/// deterministic regardless of map iteration order.
pub fn select_victim<V>(entries: &HashMap<String, CacheEntry<V>>, now_ms: u64) -> Option<String> {
    let mut victim: Option<(&String, f64, u64)> = None;

    for (key, entry) in entries {
        let score = eviction_score(entry, now_ms);
        let replace = match victim {
            None => true,
            Some((_, best_score, best_seq)) => {
                score > best_score || (score == best_score && entry.sequence < best_seq)
            }
        };
        if replace {
            victim = Some((key, score, entry.sequence));
        }
    }

    victim.map(|(key, _, _)| key.clone())
}

//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store's invariants over arbitrary operation
//! sequences.

use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{eviction_score, CacheStore, KeyPattern};
use crate::clock::{Clock, ManualClock};

// == Test Configuration ==
const TEST_CAPACITY: usize = 100;
const TEST_TTL_MS: u64 = 300_000;

fn store_with_clock(capacity: usize, ttl_ms: u64) -> (CacheStore<String>, ManualClock) {
    let clock = ManualClock::new(10_000_000);
    let store = CacheStore::with_clock(
        capacity,
        Duration::from_millis(ttl_ms),
        Arc::new(clock.clone()),
    )
    .unwrap();
    (store, clock)
}

// == Strategies ==
/// Generates cache keys from a small alphabet so sequences revisit keys
fn key_strategy() -> impl Strategy<Value = String> {
    "(report|finance|analytics):[a-c]{1,2}"
}

/// Generates cache values
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,64}"
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
    Advance { ms: u64 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
        (0u64..2_000).prop_map(|ms| CacheOp::Advance { ms }),
    ]
}

fn apply(store: &mut CacheStore<String>, clock: &ManualClock, op: CacheOp) -> Option<bool> {
    match op {
        CacheOp::Set { key, value } => {
            store.set(key, value).unwrap();
            None
        }
        CacheOp::Get { key } => Some(store.get(&key).is_some()),
        CacheOp::Delete { key } => {
            store.delete(&key);
            None
        }
        CacheOp::Advance { ms } => {
            clock.advance(Duration::from_millis(ms));
            None
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // After N gets of which H returned data, the hit rate is H / N * 100,
    // regardless of interleaved writes, deletes and expiry.
    #[test]
    fn prop_hit_rate_accounting(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let (mut store, clock) = store_with_clock(8, 3_000);
        let mut requests: u64 = 0;
        let mut hits: u64 = 0;

        for op in ops {
            if let Some(hit) = apply(&mut store, &clock, op) {
                requests += 1;
                if hit {
                    hits += 1;
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.total_requests, requests);
        let expected = if requests == 0 { 0.0 } else { hits as f64 / requests as f64 * 100.0 };
        prop_assert!((stats.hit_rate - expected).abs() < 1e-9, "hit rate {} != {}", stats.hit_rate, expected);
        prop_assert_eq!(stats.size, store.len());
        prop_assert_eq!(stats.entries, stats.size);
    }

    // Storing and then reading before expiry returns the stored value.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let (mut store, _) = store_with_clock(TEST_CAPACITY, TEST_TTL_MS);

        store.set(key.clone(), value.clone()).unwrap();

        prop_assert_eq!(store.get(&key), Some(value));
    }

    // The store never holds more than its capacity after a set.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..200),
        capacity in 1usize..12
    ) {
        let (mut store, clock) = store_with_clock(capacity, TEST_TTL_MS);

        for (i, (key, value)) in entries.into_iter().enumerate() {
            store.set(key, value).unwrap();
            if i % 3 == 0 {
                clock.advance(Duration::from_millis(7));
            }
            prop_assert!(
                store.len() <= capacity,
                "Cache size {} exceeds capacity {}",
                store.len(),
                capacity
            );
        }
    }

    // At capacity, inserting a new key removes exactly the highest-scoring
    // entry.
    #[test]
    fn prop_eviction_removes_highest_score(
        fill in prop::collection::vec((0u64..5_000, 0u64..6), 2..10),
    ) {
        let capacity = fill.len();
        let (mut store, clock) = store_with_clock(capacity, TEST_TTL_MS);

        for (i, (gap_ms, reads)) in fill.iter().enumerate() {
            clock.advance(Duration::from_millis(*gap_ms));
            let key = format!("k{}", i);
            store.set(key.clone(), "v".to_string()).unwrap();
            for _ in 0..*reads {
                store.get(&key);
            }
        }
        clock.advance(Duration::from_millis(1_000));

        let now = clock.now_ms();
        let mut expected: Option<(String, f64, u64)> = None;
        for i in 0..capacity {
            let key = format!("k{}", i);
            let score = eviction_score(store.entry(&key).unwrap(), now);
            let better = match &expected {
                None => true,
                Some((_, best, _)) => score > *best,
            };
            if better {
                expected = Some((key, score, i as u64));
            }
        }
        let (victim, _, _) = expected.unwrap();

        store.set("incoming", "v".to_string()).unwrap();

        prop_assert_eq!(store.len(), capacity);
        prop_assert!(!store.has(&victim), "expected '{}' to be evicted", victim);
        for i in 0..capacity {
            let key = format!("k{}", i);
            if key != victim {
                prop_assert!(store.has(&key), "'{}' should survive", key);
            }
        }
    }

    // After invalidating a pattern, nothing matching it can be found.
    #[test]
    fn prop_pattern_invalidation_completeness(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 0..40),
        needle in "(report|finance|analytics|:|a|b|c|e)"
    ) {
        let (mut store, _) = store_with_clock(TEST_CAPACITY, TEST_TTL_MS);
        for (key, value) in &entries {
            store.set(key.clone(), value.clone()).unwrap();
        }
        let pattern = KeyPattern::literal(&needle);
        let expected_removed = store.keys().iter().filter(|k| k.contains(needle.as_str())).count();

        let removed = store.invalidate_by_pattern(&pattern);

        prop_assert_eq!(removed, expected_removed);
        prop_assert!(store.get_by_pattern(&pattern).is_empty());
        prop_assert!(store.keys().iter().all(|k| !k.contains(needle.as_str())));
    }

    // Cleanup removes exactly the expired entries and leaves none behind.
    #[test]
    fn prop_cleanup_exhaustiveness(
        inserts in prop::collection::vec((key_strategy(), 0u64..1_500), 0..40),
        final_advance in 0u64..2_000
    ) {
        let ttl_ms = 1_000;
        let (mut store, clock) = store_with_clock(TEST_CAPACITY, ttl_ms);
        let mut created: HashMap<String, u64> = HashMap::new();

        for (key, gap) in inserts {
            clock.advance(Duration::from_millis(gap));
            store.set(key.clone(), "v".to_string()).unwrap();
            created.insert(key, clock.now_ms());
        }
        clock.advance(Duration::from_millis(final_advance));

        let now = clock.now_ms();
        let expected = created.values().filter(|&&at| now - at > ttl_ms).count();

        prop_assert_eq!(store.cleanup(), expected);
        prop_assert_eq!(store.len(), created.len() - expected);
        for key in created.keys() {
            if let Some(entry) = store.entry(key) {
                prop_assert!(!entry.is_expired(now, ttl_ms));
            }
        }
    }

    // Clearing twice is the same as clearing once.
    #[test]
    fn prop_clear_idempotent(ops in prop::collection::vec(cache_op_strategy(), 0..40)) {
        let (mut store, clock) = store_with_clock(8, 3_000);
        for op in ops {
            apply(&mut store, &clock, op);
        }

        store.clear();
        let once = store.stats();
        store.clear();

        prop_assert_eq!(store.stats(), once);
        prop_assert!(store.is_empty());
        prop_assert_eq!(store.stats().total_requests, 0);
    }
}

// == Property Test for Error Response Format ==
// This tests the CacheError -> HTTP response conversion

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Every error surfaces as JSON with an "error" string field.
    #[test]
    fn prop_error_response_format(error_msg in "[a-zA-Z0-9 _-]{1,100}") {
        use crate::cache::WeighError;
        use crate::error::CacheError;
        use axum::body::to_bytes;
        use axum::response::IntoResponse;

        let error_variants = vec![
            CacheError::Write { key: error_msg.clone(), source: WeighError::Fatal(error_msg.clone()) },
            CacheError::InvalidConfig(error_msg.clone()),
            CacheError::InvalidRequest(error_msg.clone()),
            CacheError::RateLimited { retry_after_secs: error_msg.len() as u64 },
        ];

        let rt = tokio::runtime::Runtime::new().unwrap();
        for error in error_variants {
            let expected_msg = error.to_string();
            let response = error.into_response();

            let content_type = response.headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok());
            prop_assert!(
                content_type.map(|ct| ct.contains("application/json")).unwrap_or(false),
                "Response should have JSON content-type"
            );

            let bytes = rt.block_on(async {
                to_bytes(response.into_body(), usize::MAX).await.unwrap()
            });
            let json: serde_json::Value = serde_json::from_slice(&bytes)
                .expect("Response body should be valid JSON");

            prop_assert_eq!(json["error"].as_str(), Some(expected_msg.as_str()));
        }
    }
}

// == Property Test for Concurrent Operation Correctness ==
// Thread-safe access through the single store lock

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    // Concurrent tasks never lose a request count or overflow capacity.
    #[test]
    fn prop_concurrent_operation_correctness(
        operations in prop::collection::vec(cache_op_strategy(), 10..60)
    ) {
        use crate::cache::shared;

        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .enable_all()
            .build()
            .unwrap();

        rt.block_on(async {
            let capacity = 6;
            let store = shared(
                CacheStore::<String>::new(capacity, Duration::from_secs(300)).unwrap(),
            );

            let expected_gets = operations
                .iter()
                .filter(|op| matches!(op, CacheOp::Get { .. }))
                .count() as u64;

            let mut handles = vec![];
            for op in operations {
                let store = Arc::clone(&store);
                handles.push(tokio::spawn(async move {
                    match op {
                        CacheOp::Set { key, value } => {
                            store.write().await.set(key, value).unwrap();
                        }
                        CacheOp::Get { key } => {
                            store.write().await.get(&key);
                        }
                        CacheOp::Delete { key } => {
                            store.write().await.delete(&key);
                        }
                        CacheOp::Advance { .. } => {}
                    }
                }));
            }

            for handle in handles {
                handle.await.expect("Task should not panic");
            }

            let stats = store.read().await.stats();
            prop_assert!(stats.size <= capacity, "Cache should not exceed capacity");
            prop_assert_eq!(stats.total_requests, expected_gets);
            prop_assert!(stats.hit_rate >= 0.0 && stats.hit_rate <= 100.0);

            Ok(())
        })?;
    }
}

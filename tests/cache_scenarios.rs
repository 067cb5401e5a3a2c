//! End-to-end scenarios against the public cache API.

use std::sync::Arc;
use std::time::Duration;

use report_cache::cache::{get_or_compute, shared};
use report_cache::clock::ManualClock;
use report_cache::{spawn_cleanup_task, CacheStore, KeyPattern};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
struct ProfitLoss {
    period: String,
    revenue: i64,
    expenses: i64,
}

fn report(period: &str) -> ProfitLoss {
    ProfitLoss {
        period: period.to_string(),
        revenue: 10_000,
        expenses: 7_500,
    }
}

#[test]
fn test_capacity_two_evicts_oldest_unread() {
    let clock = ManualClock::new(0);
    let mut store =
        CacheStore::<i32>::with_clock(2, Duration::from_millis(1_000), Arc::new(clock.clone())).unwrap();

    store.set("a", 1).unwrap();
    clock.advance(Duration::from_millis(5));
    store.set("b", 2).unwrap();
    assert!(store.has("a") && store.has("b"));

    clock.advance(Duration::from_millis(5));
    store.set("c", 3).unwrap();

    assert_eq!(store.get("b"), Some(2));
    assert_eq!(store.get("a"), None);
    assert_eq!(store.get("c"), Some(3));
}

#[test]
fn test_expired_entry_gone_after_cleanup() {
    let clock = ManualClock::new(0);
    let mut store =
        CacheStore::<String>::with_clock(10, Duration::from_millis(50), Arc::new(clock.clone())).unwrap();

    store.set("x", "v".to_string()).unwrap();
    clock.advance(Duration::from_millis(60));

    assert!(!store.has("x"));
    assert_eq!(store.stats().size, 1, "peek leaves the entry for the sweep");
    assert_eq!(store.cleanup(), 1);
    assert_eq!(store.stats().size, 0);
}

#[test]
fn test_report_family_invalidation() {
    let clock = ManualClock::new(0);
    let mut store =
        CacheStore::<ProfitLoss>::with_clock(50, Duration::from_secs(600), Arc::new(clock)).unwrap();

    for period in ["2024-01", "2024-02", "2024-03"] {
        store.set(format!("report:pl:{}", period), report(period)).unwrap();
    }
    store.set("report:bs:2024-03", report("2024-03")).unwrap();

    let q1 = KeyPattern::regex(r"^report:pl:2024-0[1-2]$").unwrap();
    assert_eq!(store.get_by_pattern(&q1).len(), 2);
    assert_eq!(store.invalidate_by_pattern(&q1), 2);
    assert!(store.get_by_pattern(&q1).is_empty());

    assert_eq!(
        store.keys(),
        vec!["report:bs:2024-03".to_string(), "report:pl:2024-03".to_string()]
    );
}

#[tokio::test]
async fn test_read_through_with_background_sweep() {
    let cache = shared(CacheStore::<ProfitLoss>::new(10, Duration::from_millis(80)).unwrap());
    let sweep = spawn_cleanup_task(cache.clone(), Duration::from_millis(40));

    let first = get_or_compute(&cache, "report:pl:2024-03", || async {
        Ok::<_, String>(report("2024-03"))
    })
    .await
    .unwrap();
    let second = get_or_compute(&cache, "report:pl:2024-03", || async {
        Ok::<_, String>(report("stale"))
    })
    .await
    .unwrap();

    assert!(!first.cache_hit);
    assert!(second.cache_hit);
    assert_eq!(second.value, report("2024-03"));

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(cache.read().await.is_empty(), "sweep removed the expired report");

    sweep.stop();
    let stats = cache.read().await.stats();
    assert_eq!(stats.total_requests, 2);
    assert_eq!(stats.hit_rate, 50.0);
}

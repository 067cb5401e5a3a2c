//! Read-Through Helper
//!
//! The calling convention for code that guards an expensive computation with
//! the cache: read, compute on a miss, then store. A failed store is logged
//! and the computed value is still returned.

use std::future::Future;
use std::time::Instant;

use tracing::{debug, warn};

use crate::cache::SharedCache;
use crate::monitor::{OperationSample, SharedMonitor};

// == Cached Value ==
/// A value together with whether it came from the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<V> {
    pub value: V,
    pub cache_hit: bool,
}

// == Get Or Compute ==
/// Returns the cached value for `key`, or runs `compute` and caches its
/// result.
///
/// Errors from `compute` are returned untouched and nothing is cached.
/// The lock is not held while `compute` runs, so concurrent misses on the
/// same key may each compute; the last write wins.
pub async fn get_or_compute<V, E, F, Fut>(
    cache: &SharedCache<V>,
    key: &str,
    compute: F,
) -> Result<Cached<V>, E>
where
    V: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V, E>>,
{
    if let Some(value) = cache.write().await.get(key) {
        debug!(key = %key, "cache hit");
        return Ok(Cached {
            value,
            cache_hit: true,
        });
    }

    let value = compute().await?;

    if let Err(err) = cache.write().await.set(key, value.clone()) {
        warn!(key = %key, error = %err, "serving uncached value");
    }

    Ok(Cached {
        value,
        cache_hit: false,
    })
}

// == Tracked Variant ==
/// [`get_or_compute`] that also reports the operation to a monitor.
pub async fn get_or_compute_tracked<V, E, F, Fut>(
    cache: &SharedCache<V>,
    monitor: &SharedMonitor,
    operation: &str,
    user_id: Option<&str>,
    key: &str,
    compute: F,
) -> Result<Cached<V>, E>
where
    V: Clone,
    E: std::fmt::Display,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V, E>>,
{
    let started = Instant::now();
    let result = get_or_compute(cache, key, compute).await;
    let elapsed = started.elapsed();

    let sample = match &result {
        Ok(cached) => OperationSample::success(operation, elapsed, cached.cache_hit),
        Err(err) => OperationSample::failure(operation, elapsed, err.to_string()),
    };
    let sample = match user_id {
        Some(user) => sample.with_user(user),
        None => sample,
    };
    monitor.write().await.record(sample);

    result
}

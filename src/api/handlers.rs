//! API Handlers
//!
//! HTTP request handlers for the cache admin endpoints.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::info;

use crate::api::rate_limit::RateLimiter;
use crate::cache::{shared, CacheStore, KeyPattern, SharedCache};
use crate::clock::{system_clock, Clock};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, EntriesResponse, EntryTtl, HealthResponse, InvalidateResponse, PatternQuery,
    PerformanceQuery, PerformanceResponse, StatsResponse,
};
use crate::monitor::{shared_monitor, OperationSample, PerformanceMonitor, SharedMonitor};

/// Header identifying the caller of an admin action
pub const CALLER_HEADER: &str = "x-user-id";

/// Caller name used when no identifying header is present
pub const ANONYMOUS_CALLER: &str = "anonymous";

/// Application state shared across all handlers.
///
/// Holds the report cache, the performance monitor, and the limiter guarding
/// the clear action, each behind its own lock.
#[derive(Clone)]
pub struct AppState {
    /// Report payload cache
    pub cache: SharedCache<Value>,
    /// Operation latency and cache-hit recorder
    pub monitor: SharedMonitor,
    /// Per-caller allowance for `POST /clear`
    pub clear_limiter: Arc<RwLock<RateLimiter>>,
}

impl AppState {
    /// Creates a new AppState from its parts.
    pub fn new(cache: CacheStore<Value>, monitor: PerformanceMonitor, clear_limiter: RateLimiter) -> Self {
        Self {
            cache: shared(cache),
            monitor: shared_monitor(monitor),
            clear_limiter: Arc::new(RwLock::new(clear_limiter)),
        }
    }

    /// Creates a new AppState from configuration using the system clock.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::from_config_with_clock(config, system_clock())
    }

    /// Creates a new AppState from configuration driven by `clock`.
    pub fn from_config_with_clock(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        let cache = CacheStore::with_clock(config.max_entries, config.ttl, clock.clone())?;
        let monitor = PerformanceMonitor::new(
            config.monitor_window,
            config.monitor_max_samples,
            clock.clone(),
        )?;
        let limiter = RateLimiter::new(config.clear_rate_limit, config.clear_rate_window, clock)?;
        Ok(Self::new(cache, monitor, limiter))
    }
}

fn caller_id(headers: &HeaderMap) -> String {
    headers
        .get(CALLER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(ANONYMOUS_CALLER)
        .to_string()
}

/// Handler for GET /stats
///
/// Returns the store's statistics with human-readable size and hit rate.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.read().await.stats();
    Json(StatsResponse::new(stats))
}

/// Handler for POST /clear
///
/// Empties the cache and resets its hit-rate statistics. Limited per caller
/// because it cools the cache for every user.
pub async fn clear_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ClearResponse>> {
    let caller = caller_id(&headers);
    let started = Instant::now();

    let remaining = {
        let mut limiter = state.clear_limiter.write().await;
        if let Err(err) = limiter.check(&caller) {
            state.monitor.write().await.record(
                OperationSample::failure("admin:clear", started.elapsed(), err.to_string())
                    .with_user(caller.clone()),
            );
            return Err(err);
        }
        limiter.remaining(&caller)
    };

    let cleared = {
        let mut cache = state.cache.write().await;
        let cleared = cache.len();
        cache.clear();
        cleared
    };
    info!(caller = %caller, cleared, "cache cleared");

    state.monitor.write().await.record(
        OperationSample::success("admin:clear", started.elapsed(), false).with_user(caller),
    );

    Ok(Json(ClearResponse::new(cleared, remaining)))
}

/// Handler for DELETE /invalidate?pattern=...
///
/// Removes every entry whose key matches the regular expression.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PatternQuery>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }
    let started = Instant::now();
    let pattern = KeyPattern::regex(&query.pattern)?;

    let removed = state.cache.write().await.invalidate_by_pattern(&pattern);
    info!(pattern = %pattern, removed, "cache entries invalidated");

    state.monitor.write().await.record(
        OperationSample::success("admin:invalidate", started.elapsed(), false)
            .with_user(caller_id(&headers)),
    );

    Ok(Json(InvalidateResponse {
        pattern: query.pattern,
        removed,
    }))
}

/// Handler for GET /entries?pattern=...
///
/// Lists live payloads whose key matches, without touching hit statistics.
pub async fn entries_handler(
    State(state): State<AppState>,
    Query(query): Query<PatternQuery>,
) -> Result<Json<EntriesResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }
    let pattern = KeyPattern::regex(&query.pattern)?;

    let cache = state.cache.read().await;
    let values = cache.get_by_pattern(&pattern);
    let keys = cache
        .keys()
        .into_iter()
        .filter(|key| pattern.matches(key))
        .filter_map(|key| {
            let ttl = cache.remaining_ttl(&key)?;
            Some(EntryTtl {
                key,
                ttl_remaining_ms: u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX),
            })
        })
        .collect();
    drop(cache);

    Ok(Json(EntriesResponse::new(query.pattern, values, keys)))
}

/// Handler for GET /performance
///
/// Returns the monitor's summary, busiest operations and latest failures.
pub async fn performance_handler(
    State(state): State<AppState>,
    Query(query): Query<PerformanceQuery>,
) -> Json<PerformanceResponse> {
    let limit = query.effective_limit();
    let monitor = state.monitor.read().await;

    Json(PerformanceResponse {
        summary: monitor.summary(),
        top_operations: monitor.top_operations(limit),
        recent_failures: monitor.recent_failures(limit),
    })
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

//! Rate Limiter
//!
//! Sliding-window limiter for destructive admin actions, keyed by caller.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::clock::Clock;
use crate::error::{CacheError, Result};

/// Per-caller sliding-window rate limiter.
#[derive(Debug)]
pub struct RateLimiter {
    limit: usize,
    window_ms: u64,
    /// Timestamps of allowed calls inside the window, oldest first
    calls: HashMap<String, VecDeque<u64>>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    /// Allows `limit` calls per caller in any `window`.
    pub fn new(limit: usize, window: Duration, clock: Arc<dyn Clock>) -> Result<Self> {
        if limit == 0 || window.is_zero() {
            return Err(CacheError::InvalidConfig(
                "rate limit and window must be greater than zero".to_string(),
            ));
        }
        let window_ms = u64::try_from(window.as_millis()).map_err(|_| {
            CacheError::InvalidConfig("rate limit window is too large".to_string())
        })?;
        Ok(Self {
            limit,
            window_ms,
            calls: HashMap::new(),
            clock,
        })
    }

    /// Records a call for `caller`, or rejects it with the time until the
    /// oldest call in the window ages out.
    ///
    /// Callers with no calls left inside the window are forgotten.
    pub fn check(&mut self, caller: &str) -> Result<()> {
        let now = self.clock.now_ms();
        self.prune(now);

        let window_ms = self.window_ms;
        let calls = self.calls.entry(caller.to_string()).or_default();

        if calls.len() >= self.limit {
            let oldest = calls.front().copied().unwrap_or(now);
            let wait_ms = oldest.saturating_add(window_ms).saturating_sub(now);
            let retry_after_secs = wait_ms.div_ceil(1000).max(1);
            warn!(caller = %caller, retry_after_secs, "rate limit exceeded");
            return Err(CacheError::RateLimited { retry_after_secs });
        }

        calls.push_back(now);
        Ok(())
    }

    /// Drops timestamps that left the window, then callers with none left.
    fn prune(&mut self, now: u64) {
        let window_ms = self.window_ms;
        self.calls.retain(|_, calls| {
            while calls
                .front()
                .is_some_and(|&at| now.saturating_sub(at) >= window_ms)
            {
                calls.pop_front();
            }
            !calls.is_empty()
        });
    }

    /// Calls `caller` may still make in the current window.
    pub fn remaining(&self, caller: &str) -> usize {
        let now = self.clock.now_ms();
        let used = self.calls.get(caller).map_or(0, |calls| {
            calls
                .iter()
                .filter(|&&at| now.saturating_sub(at) < self.window_ms)
                .count()
        });
        self.limit.saturating_sub(used)
    }
}

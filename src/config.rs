//! Configuration Module
//!
//! Handles loading and validating cache and admin-server settings from
//! environment variables.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Cache and admin-server configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Lifetime of every cache entry
    pub ttl: Duration,
    /// Interval between background expiry sweeps
    pub cleanup_interval: Duration,
    /// HTTP server port
    pub server_port: u16,
    /// Clear actions allowed per caller within `clear_rate_window`
    pub clear_rate_limit: usize,
    /// Window for the clear-action rate limit
    pub clear_rate_window: Duration,
    /// Retention window of the performance monitor
    pub monitor_window: Duration,
    /// Maximum samples the performance monitor keeps
    pub monitor_max_samples: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `CACHE_TTL_SECS` - Entry lifetime in seconds (default: 600)
    /// - `CACHE_CLEANUP_INTERVAL_SECS` - Sweep frequency in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEAR_RATE_LIMIT` - Clears allowed per caller per window (default: 5)
    /// - `CLEAR_RATE_WINDOW_SECS` - Clear rate-limit window in seconds (default: 3600)
    /// - `MONITOR_WINDOW_SECS` - Performance sample retention in seconds (default: 3600)
    /// - `MONITOR_MAX_SAMPLES` - Performance sample budget (default: 10000)
    ///
    /// Unparseable values fall back to their defaults. Negative values, and
    /// zero where zero is meaningless, are rejected.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            max_entries: read_count("CACHE_MAX_ENTRIES", defaults.max_entries)?,
            ttl: read_secs("CACHE_TTL_SECS", defaults.ttl)?,
            cleanup_interval: read_secs("CACHE_CLEANUP_INTERVAL_SECS", defaults.cleanup_interval)?,
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            clear_rate_limit: read_count("CLEAR_RATE_LIMIT", defaults.clear_rate_limit)?,
            clear_rate_window: read_secs("CLEAR_RATE_WINDOW_SECS", defaults.clear_rate_window)?,
            monitor_window: read_secs("MONITOR_WINDOW_SECS", defaults.monitor_window)?,
            monitor_max_samples: read_count("MONITOR_MAX_SAMPLES", defaults.monitor_max_samples)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the cache cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(CacheError::InvalidConfig(
                "CACHE_MAX_ENTRIES must be greater than zero".to_string(),
            ));
        }
        if self.cleanup_interval.is_zero() {
            return Err(CacheError::InvalidConfig(
                "CACHE_CLEANUP_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }
        if self.clear_rate_limit == 0 || self.clear_rate_window.is_zero() {
            return Err(CacheError::InvalidConfig(
                "clear rate limit and window must be greater than zero".to_string(),
            ));
        }
        if self.monitor_window.is_zero() || self.monitor_max_samples == 0 {
            return Err(CacheError::InvalidConfig(
                "monitor window and sample budget must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            ttl: Duration::from_secs(600),
            cleanup_interval: Duration::from_secs(300),
            server_port: 3000,
            clear_rate_limit: 5,
            clear_rate_window: Duration::from_secs(3600),
            monitor_window: Duration::from_secs(3600),
            monitor_max_samples: 10_000,
        }
    }
}

// Parsed as signed so a negative setting is reported instead of ignored
fn read_signed(name: &str) -> Result<Option<i64>> {
    match env::var(name).ok().and_then(|v| v.trim().parse::<i64>().ok()) {
        Some(value) if value < 0 => Err(CacheError::InvalidConfig(format!(
            "{} must not be negative, got {}",
            name, value
        ))),
        other => Ok(other),
    }
}

fn read_count(name: &str, default: usize) -> Result<usize> {
    Ok(read_signed(name)?.map_or(default, |v| v as usize))
}

fn read_secs(name: &str, default: Duration) -> Result<Duration> {
    Ok(read_signed(name)?.map_or(default, |v| Duration::from_secs(v as u64)))
}

//! Performance Recorder
//!
//! Windowed latency, error and cache-hit statistics per tracked operation.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::clock::Clock;
use crate::error::{CacheError, Result};

// == Operation Sample ==
/// One measured invocation of a tracked operation.
#[derive(Debug, Clone)]
pub struct OperationSample {
    /// Operation label, e.g. `report:profit-loss`
    pub operation: String,
    /// Measured wall time
    pub duration: Duration,
    /// Whether the caller was served from cache
    pub cache_hit: bool,
    /// Acting user, if known
    pub user_id: Option<String>,
    /// Failure description; `None` for successful operations
    pub error: Option<String>,
}

impl OperationSample {
    /// A successful operation.
    pub fn success(operation: impl Into<String>, duration: Duration, cache_hit: bool) -> Self {
        Self {
            operation: operation.into(),
            duration,
            cache_hit,
            user_id: None,
            error: None,
        }
    }

    /// A failed operation.
    pub fn failure(
        operation: impl Into<String>,
        duration: Duration,
        error: impl Into<String>,
    ) -> Self {
        Self {
            operation: operation.into(),
            duration,
            cache_hit: false,
            user_id: None,
            error: Some(error.into()),
        }
    }

    /// Attributes the sample to a user.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone)]
struct RecordedSample {
    sample: OperationSample,
    recorded_at_ms: u64,
}

// == Views ==
/// Aggregate view over the retained window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub total_operations: usize,
    pub average_ms: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    /// Failed operations, percent
    pub error_rate: f64,
    /// Operations served from cache, percent
    pub cache_hit_rate: f64,
}

/// Per-operation volume and latency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationStats {
    pub operation: String,
    pub count: usize,
    pub average_ms: f64,
    pub error_count: usize,
    pub cache_hits: usize,
}

/// A failed operation as reported to operators.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureRecord {
    pub operation: String,
    pub error: String,
    pub user_id: Option<String>,
    pub duration_ms: f64,
    pub timestamp: DateTime<Utc>,
}

// == Performance Monitor ==
/// Keeps recent operation samples and derives statistics from them.
///
/// Samples older than the window, or beyond the sample budget, are dropped
/// on the next `record`/`prune`.
#[derive(Debug)]
pub struct PerformanceMonitor {
    samples: VecDeque<RecordedSample>,
    window_ms: u64,
    max_samples: usize,
    clock: Arc<dyn Clock>,
}

impl PerformanceMonitor {
    /// Creates a monitor retaining `window` worth of samples, at most
    /// `max_samples` of them.
    pub fn new(window: Duration, max_samples: usize, clock: Arc<dyn Clock>) -> Result<Self> {
        if window.is_zero() {
            return Err(CacheError::InvalidConfig(
                "monitor window must be greater than zero".to_string(),
            ));
        }
        if max_samples == 0 {
            return Err(CacheError::InvalidConfig(
                "monitor sample budget must be greater than zero".to_string(),
            ));
        }

        let window_ms = u64::try_from(window.as_millis()).map_err(|_| {
            CacheError::InvalidConfig("monitor window is too large".to_string())
        })?;

        Ok(Self {
            samples: VecDeque::new(),
            window_ms,
            max_samples,
            clock,
        })
    }

    /// Records a sample stamped with the current time.
    pub fn record(&mut self, sample: OperationSample) {
        let recorded_at_ms = self.clock.now_ms();
        self.samples.push_back(RecordedSample {
            sample,
            recorded_at_ms,
        });

        while self.samples.len() > self.max_samples {
            self.samples.pop_front();
        }
        self.prune();
    }

    /// Drops samples that fell out of the window, returning how many.
    pub fn prune(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.samples.len();

        while let Some(front) = self.samples.front() {
            if now.saturating_sub(front.recorded_at_ms) > self.window_ms {
                self.samples.pop_front();
            } else {
                break;
            }
        }

        let dropped = before - self.samples.len();
        if dropped > 0 {
            debug!(dropped, "pruned performance samples outside window");
        }
        dropped
    }

    fn in_window(&self) -> impl Iterator<Item = &OperationSample> {
        let now = self.clock.now_ms();
        let window_ms = self.window_ms;
        self.samples
            .iter()
            .filter(move |r| now.saturating_sub(r.recorded_at_ms) <= window_ms)
            .map(|r| &r.sample)
    }

    /// Aggregate statistics over the window.
    pub fn summary(&self) -> PerformanceSummary {
        let samples: Vec<&OperationSample> = self.in_window().collect();
        if samples.is_empty() {
            return PerformanceSummary::default();
        }

        let total = samples.len();
        let mut durations: Vec<f64> = samples.iter().map(|s| duration_ms(s.duration)).collect();
        durations.sort_by(|a, b| a.total_cmp(b));

        let failures = samples.iter().filter(|s| !s.is_success()).count();
        let hits = samples.iter().filter(|s| s.cache_hit).count();

        PerformanceSummary {
            total_operations: total,
            average_ms: durations.iter().sum::<f64>() / total as f64,
            p50_ms: percentile(&durations, 50.0),
            p95_ms: percentile(&durations, 95.0),
            p99_ms: percentile(&durations, 99.0),
            error_rate: failures as f64 / total as f64 * 100.0,
            cache_hit_rate: hits as f64 / total as f64 * 100.0,
        }
    }

    /// The `limit` busiest operations, by volume then name.
    pub fn top_operations(&self, limit: usize) -> Vec<OperationStats> {
        let mut grouped: HashMap<&str, (usize, f64, usize, usize)> = HashMap::new();
        for sample in self.in_window() {
            let slot = grouped.entry(sample.operation.as_str()).or_default();
            slot.0 += 1;
            slot.1 += duration_ms(sample.duration);
            if !sample.is_success() {
                slot.2 += 1;
            }
            if sample.cache_hit {
                slot.3 += 1;
            }
        }

        let mut stats: Vec<OperationStats> = grouped
            .into_iter()
            .map(|(operation, (count, total_ms, error_count, cache_hits))| OperationStats {
                operation: operation.to_string(),
                count,
                average_ms: total_ms / count as f64,
                error_count,
                cache_hits,
            })
            .collect();
        stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.operation.cmp(&b.operation)));
        stats.truncate(limit);
        stats
    }

    /// The `limit` most recent failures, newest first.
    pub fn recent_failures(&self, limit: usize) -> Vec<FailureRecord> {
        let now = self.clock.now_ms();
        self.samples
            .iter()
            .rev()
            .filter(|r| now.saturating_sub(r.recorded_at_ms) <= self.window_ms)
            .filter_map(|r| {
                let error = r.sample.error.clone()?;
                Some(FailureRecord {
                    operation: r.sample.operation.clone(),
                    error,
                    user_id: r.sample.user_id.clone(),
                    duration_ms: duration_ms(r.sample.duration),
                    timestamp: DateTime::from_timestamp_millis(r.recorded_at_ms as i64)
                        .unwrap_or_default(),
                })
            })
            .take(limit)
            .collect()
    }

    /// Number of retained samples, including any not yet pruned.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

fn duration_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Nearest-rank percentile over ascending `sorted` values.
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (pct / 100.0 * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

//! TTL Cleanup Task
//!
//! Background task that periodically sweeps expired cache entries so keys
//! that are never read again still release their memory.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::SharedCache;

// == Cleanup Task ==
/// Handle to a running sweep. Stopping (or dropping) the handle cancels the
/// timer.
#[derive(Debug)]
pub struct CleanupTask {
    handle: JoinHandle<()>,
}

impl CleanupTask {
    /// Cancels the periodic sweep.
    pub fn stop(&self) {
        if !self.handle.is_finished() {
            self.handle.abort();
            info!("TTL cleanup task stopped");
        }
    }

    /// Returns true once the task has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for CleanupTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawns a background task that calls `cleanup` on the store every
/// `interval`, taking the store's write lock for each sweep.
///
/// The first sweep happens one full interval after spawning.
///
/// # Example
/// ```ignore
/// let cache = shared(CacheStore::<Report>::new(1000, Duration::from_secs(600))?);
/// let cleanup = spawn_cleanup_task(cache.clone(), Duration::from_secs(300));
/// // Later, during shutdown:
/// cleanup.stop();
/// ```
pub fn spawn_cleanup_task<V>(cache: SharedCache<V>, interval: Duration) -> CleanupTask
where
    V: Send + Sync + 'static,
{
    // tokio intervals cannot be zero
    let interval = interval.max(Duration::from_millis(1));

    let handle = tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {}ms",
            interval.as_millis()
        );

        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let removed = cache.write().await.cleanup();

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    });

    CleanupTask { handle }
}

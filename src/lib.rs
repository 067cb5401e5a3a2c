//! Report Cache - in-process cache for expensive report computations
//!
//! Bounded storage with TTL expiry, frequency-weighted eviction, pattern
//! invalidation and hit-rate statistics, plus a small admin HTTP surface.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod monitor;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheStats, CacheStore, KeyPattern, SharedCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::{spawn_cleanup_task, CleanupTask};

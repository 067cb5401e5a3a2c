//! API Module
//!
//! HTTP handlers and routing for the cache admin surface.
//!
//! # Endpoints
//! - `GET /stats` - Cache statistics
//! - `POST /clear` - Empty the cache (rate limited)
//! - `DELETE /invalidate?pattern=` - Bulk invalidation by key pattern
//! - `GET /entries?pattern=` - Live payloads matching a key pattern
//! - `GET /performance` - Operation performance report
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod rate_limit;
pub mod routes;

pub use handlers::*;
pub use rate_limit::RateLimiter;
pub use routes::create_router;

//! API Routes
//!
//! Configures the Axum router with the cache admin endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, entries_handler, health_handler, invalidate_handler, performance_handler,
    stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /stats` - Cache statistics with formatted size and hit rate
/// - `POST /clear` - Empty the cache (rate limited per caller)
/// - `DELETE /invalidate?pattern=` - Remove entries whose key matches
/// - `GET /entries?pattern=` - List live payloads whose key matches
/// - `GET /performance?limit=` - Operation latency and cache-hit report
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/stats", get(stats_handler))
        .route("/clear", post(clear_handler))
        .route("/invalidate", delete(invalidate_handler))
        .route("/entries", get(entries_handler))
        .route("/performance", get(performance_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

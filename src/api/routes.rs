//! API Routes
//!
//! Configures the Axum router with all cache node endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{
    health_handler, keys_handler, peers_handler, set_peers_handler, stats_handler,
    transact_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /trxn` - Execute or forward a GET/SET/DELETE transaction
/// - `GET /peers` - Current peer set
/// - `PUT /peers` - Replace the peer set
/// - `GET /keys` - Live keys held by this node
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/trxn", post(transact_handler))
        .route("/peers", get(peers_handler).put(set_peers_handler))
        .route("/keys", get(keys_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

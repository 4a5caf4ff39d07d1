use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::health;
use super::knowledge;
use super::state::AppState;

/// Create the full router with application state
///
/// The dashboard runs on a separate origin, so CORS stays permissive; the
/// deployment perimeter is the bank-internal network.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Knowledge base management API
        .nest("/api/knowledge", knowledge::create_knowledge_router())
        // Add state and middleware
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

//! HTTP route handlers for Warden.

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use gatehouse_common::constants::paths;

use crate::state::AppState;

mod challenge;
mod health;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Challenge flow
        .route(paths::ACCESS_REQUIRED, get(challenge::access_required))
        .route(
            paths::CHALLENGE,
            get(challenge::challenge_form).post(challenge::submit_challenge),
        )
        // Inspection endpoint (not part of the primary flow)
        .route("/api/check/{identity}", get(challenge::check_identity))
        // Legacy compatibility stub
        .route("/keys", get(challenge::keys))
        // Health
        .route("/health", get(health::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

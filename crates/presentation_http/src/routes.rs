//! Route definitions

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::{handlers, middleware::UpdateRateLimitLayer, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let rate_limit = UpdateRateLimitLayer::new(
        Arc::clone(&state.rate_limiter),
        state.rate_limit_enabled,
        state.max_body_bytes,
    );

    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Bot webhook (v1)
        .route(
            "/v1/updates",
            post(handlers::updates::handle_update).route_layer(rate_limit),
        )
        // Attach state
        .with_state(state)
}

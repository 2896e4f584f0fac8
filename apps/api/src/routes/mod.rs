pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use tower_http::catch_panic::CatchPanicLayer;

use crate::campaign::handlers;
use crate::errors::panic_response;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_request_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/campaigns", post(handlers::handle_create_campaign))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

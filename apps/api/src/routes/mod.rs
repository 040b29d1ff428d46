pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::review::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/review",
            get(handlers::handle_get_review).post(handlers::handle_upload),
        )
        .route("/api/v1/review/reset", post(handlers::handle_reset))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

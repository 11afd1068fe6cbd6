pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers::handle_analyze;
use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Browser UI
        .route("/", get(handlers::handle_index))
        .route("/sessions/:id", get(handlers::handle_show))
        .route("/sessions/:id/upload", post(handlers::handle_upload))
        .route("/sessions/:id/progress", get(handlers::handle_progress))
        .route("/sessions/:id/reset", post(handlers::handle_reset))
        // JSON API
        .route("/api/v1/analyze", post(handle_analyze))
        .layer(body_limit)
        .with_state(state)
}

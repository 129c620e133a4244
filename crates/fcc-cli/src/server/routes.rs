//! Router configuration for the web server.

use axum::{routing::get, Router};

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/extract-info-pdf", get(handlers::extract_info_pdf))
        .route("/health", get(handlers::health))
        .with_state(state)
}

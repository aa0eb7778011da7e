//! HTTP route definitions.

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::http::handlers;
use crate::state::AppState;

/// Screenshots arrive as base64 data URIs.
const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Create the proxy router.
///
/// ```text
/// GET  /api/health               - Liveness check
/// POST /api/explain              - Explain text
/// POST /api/extract-and-explain  - Read and explain an image
/// POST /api/explain-image        - Same as above
/// POST /api/flashcards           - Generate study flashcards
/// GET  /api/stats                - Uptime and request count
/// ```
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/explain", post(handlers::explain_text))
        .route("/api/extract-and-explain", post(handlers::explain_image))
        .route("/api/explain-image", post(handlers::explain_image))
        .route("/api/flashcards", post(handlers::flashcards))
        .route("/api/stats", get(handlers::stats))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;

//! Router creation and configuration

use super::handlers::*;
use super::types::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create REST API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/test", get(diagnostics))
        .route("/api/blogposts", get(list_blogposts).post(create_blogpost))
        .route("/api/blogposts/:slug", get(get_blogpost))
        .route("/api/tips", get(list_tips).post(create_tip))
        .route("/api/challenges", get(list_challenges).post(create_challenge))
        .route("/api/ebooktests", get(list_ebooktests).post(create_ebooktest))
        .route("/api/seed", post(seed))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

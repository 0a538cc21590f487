use super::handlers;
use super::state::AppState;
use crate::config::HttpConfig;
use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState, http: &HttpConfig) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Audio sessions
        .route(&http.stream_path, get(handlers::stream))
        // Client assets
        .fallback_service(ServeDir::new(&http.static_dir))
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Pipeline operations
        .route("/transcribe", post(handlers::transcribe))
        .route("/generate", post(handlers::generate))
        // Template storage
        .route(
            "/templates",
            get(handlers::list_templates).post(handlers::create_template),
        )
        .route("/templates/:id", delete(handlers::delete_template))
        // Visit storage
        .route(
            "/visits",
            get(handlers::list_visits).post(handlers::save_visit),
        )
        .route("/visits/:id", delete(handlers::delete_visit))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

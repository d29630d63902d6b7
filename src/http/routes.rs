use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/languages", get(handlers::list_languages))
        // Session lifecycle
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/:session_id/confirm", post(handlers::confirm_languages))
        .route("/sessions/:session_id/start", post(handlers::start_conversation))
        .route("/sessions/:session_id/end", post(handlers::end_conversation))
        .route("/sessions/:session_id/turns", post(handlers::take_turn))
        // Session queries
        .route("/sessions/:session_id/status", get(handlers::get_session_status))
        .route(
            "/sessions/:session_id/transcript",
            get(handlers::get_session_transcript),
        )
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

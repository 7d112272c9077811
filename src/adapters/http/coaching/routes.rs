//! HTTP routes for the coaching endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_conversations, get_history, health, ingest, metrics, CoachingHandlers};

/// Creates the coaching router with all endpoints.
pub fn coaching_routes(handlers: CoachingHandlers) -> Router {
    Router::new()
        .route("/ingest", post(ingest))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/conversations/:chat_id", get(get_conversations))
        .route("/conversations/:chat_id/history", get(get_history))
        .with_state(handlers)
}

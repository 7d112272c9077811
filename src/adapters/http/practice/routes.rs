//! HTTP routes for the skill practice endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    generate_situation, get_block, get_progress, get_session, get_skill, list_blocks,
    list_sessions, submit_answer, PracticeHandlers,
};

/// Creates the practice router under `/skills`.
pub fn practice_routes(handlers: PracticeHandlers) -> Router {
    Router::new()
        .route("/skills/blocks", get(list_blocks))
        .route("/skills/blocks/:block_id", get(get_block))
        .route("/skills/blocks/:block_id/skills/:skill_id", get(get_skill))
        .route("/skills/generate-situation", post(generate_situation))
        .route("/skills/submit-answer", post(submit_answer))
        .route("/skills/progress/:chat_id", get(get_progress))
        .route("/skills/sessions/:chat_id", get(list_sessions))
        .route("/skills/session/:session_id", get(get_session))
        .with_state(handlers)
}

//! HTTP handlers for the skill practice endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::adapters::http::coaching::ErrorResponse;
use crate::application::{
    GetPracticeProgressHandler, GetPracticeSessionHandler, ListPracticeSessionsHandler,
    ListPracticeSessionsQuery, PracticeError, StartPracticeCommand, StartPracticeHandler,
    SubmitPracticeAnswerCommand, SubmitPracticeAnswerHandler,
};
use crate::domain::foundation::{ChatId, SessionId};
use crate::domain::practice::SkillLibrary;
use crate::ports::StorageError;

use super::dto::{
    BlocksResponse, FeedbackResponse, GenerateSituationRequest, ProgressResponse,
    SessionDetailResponse, SessionSummary, SessionsParams, SessionsResponse, SituationResponse,
    SubmitAnswerRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct PracticeHandlers {
    library: Arc<SkillLibrary>,
    start_handler: Arc<StartPracticeHandler>,
    submit_handler: Arc<SubmitPracticeAnswerHandler>,
    progress_handler: Arc<GetPracticeProgressHandler>,
    sessions_handler: Arc<ListPracticeSessionsHandler>,
    session_handler: Arc<GetPracticeSessionHandler>,
}

impl PracticeHandlers {
    pub fn new(
        library: Arc<SkillLibrary>,
        start_handler: Arc<StartPracticeHandler>,
        submit_handler: Arc<SubmitPracticeAnswerHandler>,
        progress_handler: Arc<GetPracticeProgressHandler>,
        sessions_handler: Arc<ListPracticeSessionsHandler>,
        session_handler: Arc<GetPracticeSessionHandler>,
    ) -> Self {
        Self {
            library,
            start_handler,
            submit_handler,
            progress_handler,
            sessions_handler,
            session_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /skills/blocks - Block overviews
pub async fn list_blocks(State(handlers): State<PracticeHandlers>) -> Json<BlocksResponse> {
    Json(BlocksResponse {
        blocks: handlers.library.overviews(),
    })
}

/// GET /skills/blocks/:block_id - One block with its skills
pub async fn get_block(
    State(handlers): State<PracticeHandlers>,
    Path(block_id): Path<String>,
) -> Response {
    match handlers.library.block(&block_id) {
        Some(block) => (StatusCode::OK, Json(block.clone())).into_response(),
        None => not_found(format!("Block not found: {block_id}")),
    }
}

/// GET /skills/blocks/:block_id/skills/:skill_id - One skill
pub async fn get_skill(
    State(handlers): State<PracticeHandlers>,
    Path((block_id, skill_id)): Path<(String, String)>,
) -> Response {
    match handlers.library.skill(&block_id, &skill_id) {
        Some(skill) => (StatusCode::OK, Json(skill.clone())).into_response(),
        None => PracticeError::SkillNotFound { block_id, skill_id }.into_response(),
    }
}

/// POST /skills/generate-situation - Open a practice session
pub async fn generate_situation(
    State(handlers): State<PracticeHandlers>,
    Json(request): Json<GenerateSituationRequest>,
) -> Response {
    let cmd = StartPracticeCommand {
        chat_id: request.chat_id,
        block_id: request.block_id,
        skill_id: request.skill_id,
        situation_index: request.situation_index,
    };

    match handlers.start_handler.handle(cmd).await {
        Ok(started) => (StatusCode::OK, Json(SituationResponse::from(started))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /skills/submit-answer - Score an answer
pub async fn submit_answer(
    State(handlers): State<PracticeHandlers>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Response {
    let cmd = SubmitPracticeAnswerCommand {
        chat_id: request.chat_id,
        session_id: request.session_id,
        answer: request.answer,
    };

    match handlers.submit_handler.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(FeedbackResponse::from(result))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /skills/progress/:chat_id - Per-skill aggregate and recent sessions
pub async fn get_progress(
    State(handlers): State<PracticeHandlers>,
    Path(chat_id): Path<ChatId>,
) -> Response {
    match handlers.progress_handler.handle(chat_id).await {
        Ok(report) => (StatusCode::OK, Json(ProgressResponse::from(report))).into_response(),
        Err(e) => storage_failure(e),
    }
}

/// GET /skills/sessions/:chat_id?block_id=&skill_id= - A chat's sessions, newest first
pub async fn list_sessions(
    State(handlers): State<PracticeHandlers>,
    Path(chat_id): Path<ChatId>,
    Query(params): Query<SessionsParams>,
) -> Response {
    let query = ListPracticeSessionsQuery {
        chat_id,
        block_id: params.block_id,
        skill_id: params.skill_id,
    };

    match handlers.sessions_handler.handle(query).await {
        Ok(sessions) => (
            StatusCode::OK,
            Json(SessionsResponse {
                sessions: sessions.iter().map(SessionSummary::from).collect(),
            }),
        )
            .into_response(),
        Err(e) => storage_failure(e),
    }
}

/// GET /skills/session/:session_id - One session with its answers
pub async fn get_session(
    State(handlers): State<PracticeHandlers>,
    Path(session_id): Path<SessionId>,
) -> Response {
    match handlers.session_handler.handle(session_id).await {
        Ok(detail) => (StatusCode::OK, Json(SessionDetailResponse::from(detail))).into_response(),
        Err(e) => e.into_response(),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

impl IntoResponse for PracticeError {
    fn into_response(self) -> Response {
        match self {
            PracticeError::SkillNotFound { .. } | PracticeError::SessionNotFound(_) => {
                not_found(self.to_string())
            }
            PracticeError::NotSessionOwner(_) => (
                StatusCode::FORBIDDEN,
                Json(ErrorResponse::forbidden(self.to_string())),
            )
                .into_response(),
            PracticeError::Storage(e) => storage_failure(e),
        }
    }
}

fn not_found(message: String) -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::not_found(message))).into_response()
}

fn storage_failure(error: StorageError) -> Response {
    error!(error = %error, "Practice session storage failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::internal("Practice storage unavailable")),
    )
        .into_response()
}

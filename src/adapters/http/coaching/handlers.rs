//! HTTP handlers for the coaching endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::application::{
    GetConversationSummaryHandler, GetConversationSummaryQuery, GetHistoryHandler, GetHistoryQuery,
    IngestCommand, IngestError, IngestEventHandler,
};
use crate::domain::coaching::InboundEvent;
use crate::domain::foundation::ChatId;
use crate::ports::StorageError;

use super::dto::{
    ConversationsResponse, ErrorResponse, HealthResponse, HistoryParams, HistoryResponse,
    IngestPayload, IngestResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct CoachingHandlers {
    ingest_handler: Arc<IngestEventHandler>,
    history_handler: Arc<GetHistoryHandler>,
    summary_handler: Arc<GetConversationSummaryHandler>,
}

impl CoachingHandlers {
    pub fn new(
        ingest_handler: Arc<IngestEventHandler>,
        history_handler: Arc<GetHistoryHandler>,
        summary_handler: Arc<GetConversationSummaryHandler>,
    ) -> Self {
        Self {
            ingest_handler,
            history_handler,
            summary_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /ingest - Answer one transport event
pub async fn ingest(
    State(handlers): State<CoachingHandlers>,
    Json(payload): Json<IngestPayload>,
) -> Response {
    let cmd = IngestCommand::new(InboundEvent::from(payload));

    match handlers.ingest_handler.handle(cmd).await {
        Ok(result) => (
            StatusCode::OK,
            Json(IngestResponse {
                actions: result.actions,
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /health - Liveness probe
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// GET /metrics - Plain-text counters
pub async fn metrics(State(handlers): State<CoachingHandlers>) -> Response {
    let body = format!(
        "ingest_requests {}\n",
        handlers.ingest_handler.request_count()
    );
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

/// GET /conversations/:chat_id - Message log summary
pub async fn get_conversations(
    State(handlers): State<CoachingHandlers>,
    Path(chat_id): Path<ChatId>,
) -> Response {
    let query = GetConversationSummaryQuery {
        chat_id,
    };

    match handlers.summary_handler.handle(query).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(ConversationsResponse {
                conversations: vec![summary],
            }),
        )
            .into_response(),
        Err(e) => handle_storage_error(chat_id, e),
    }
}

/// GET /conversations/:chat_id/history?limit=N - Latest messages, oldest first
pub async fn get_history(
    State(handlers): State<CoachingHandlers>,
    Path(chat_id): Path<ChatId>,
    Query(params): Query<HistoryParams>,
) -> Response {
    let query = GetHistoryQuery {
        chat_id,
        limit: params.limit,
    };

    match handlers.history_handler.handle(query).await {
        Ok(messages) => (StatusCode::OK, Json(HistoryResponse { messages })).into_response(),
        Err(e) => handle_storage_error(chat_id, e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        match self {
            IngestError::Engine(e) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::unavailable(e.to_string())),
            )
                .into_response(),
        }
    }
}

fn handle_storage_error(chat_id: ChatId, error: StorageError) -> Response {
    error!(chat_id = %chat_id, error = %error, "Message log read failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::internal("Message log unavailable")),
    )
        .into_response()
}

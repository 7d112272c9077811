//! Skill practice handlers: serving situations, scoring answers and reading
//! back sessions and progress.

mod queries;
mod start_session;
mod submit_answer;

use thiserror::Error;
use tracing::error;

use crate::domain::foundation::SessionId;
use crate::ports::{LoggedMessage, MessageLog, StorageError};

pub use queries::{
    GetPracticeProgressHandler, GetPracticeSessionHandler, ListPracticeSessionsHandler,
    ListPracticeSessionsQuery, PracticeProgressReport, PracticeSessionDetail, RECENT_SESSIONS,
};
pub use start_session::{StartPracticeCommand, StartPracticeHandler, StartedPractice};
pub use submit_answer::{PracticeFeedback, SubmitPracticeAnswerCommand, SubmitPracticeAnswerHandler};

#[derive(Debug, Error)]
pub enum PracticeError {
    #[error("Skill not found: {block_id}/{skill_id}")]
    SkillNotFound { block_id: String, skill_id: String },

    #[error("Practice session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Practice session {0} belongs to another chat")]
    NotSessionOwner(SessionId),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Appends to the message log; a failure is logged and otherwise ignored.
async fn record(message_log: &dyn MessageLog, message: LoggedMessage) {
    let chat_id = message.chat_id;
    if let Err(err) = message_log.append(message).await {
        error!(chat_id = %chat_id, error = %err, "Failed to record practice message");
    }
}

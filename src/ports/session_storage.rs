//! Practice Session Storage Port - Durable skill practice sessions.

use async_trait::async_trait;

use crate::domain::foundation::{ChatId, SessionId};
use crate::domain::practice::PracticeSession;
use crate::ports::StorageError;

/// Port for persisting practice sessions.
#[async_trait]
pub trait PracticeSessionStorage: Send + Sync {
    /// Insert or replace a session.
    async fn save(&self, session: &PracticeSession) -> Result<(), StorageError>;

    async fn get(&self, id: SessionId) -> Result<Option<PracticeSession>, StorageError>;

    /// All sessions of a chat, newest first.
    async fn list(&self, chat_id: ChatId) -> Result<Vec<PracticeSession>, StorageError>;
}

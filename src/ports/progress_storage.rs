//! Progress Storage Port - Durable conversation progress.
//!
//! The progress store keeps the canonical copy in memory and writes the full
//! record through this port after every mutation.

use async_trait::async_trait;

use crate::domain::coaching::ConversationProgress;
use crate::domain::foundation::ChatId;

/// Errors that can occur in durable storage (progress and message log).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to serialize record: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize record: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Port for persisting and loading conversation progress.
#[async_trait]
pub trait ProgressStorage: Send + Sync {
    /// Load the stored record, `None` if the conversation was never saved.
    async fn load(&self, chat_id: ChatId) -> Result<Option<ConversationProgress>, StorageError>;

    /// Replace the stored record.
    async fn save(
        &self,
        chat_id: ChatId,
        progress: &ConversationProgress,
    ) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_messages() {
        assert!(StorageError::IoError("disk full".into())
            .to_string()
            .contains("disk full"));
        assert!(StorageError::SerializationFailed("bad".into())
            .to_string()
            .contains("serialize"));
    }
}

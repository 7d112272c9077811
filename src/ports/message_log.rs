//! Message Log Port - Conversation history.
//!
//! Records what users sent and what the coach answered. Reads back the tail of
//! a conversation for the history API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{ChatId, Timestamp};
use crate::ports::StorageError;

/// Rows returned by `history` when no limit is given.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Who wrote a logged message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

/// One logged message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedMessage {
    pub chat_id: ChatId,
    pub role: Speaker,
    pub content: String,
    /// Event kind for user rows, `send_message` for coach rows.
    pub message_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    pub created_at: Timestamp,
}

impl LoggedMessage {
    pub fn new(
        chat_id: ChatId,
        role: Speaker,
        content: impl Into<String>,
        message_type: impl Into<String>,
    ) -> Self {
        Self {
            chat_id,
            role,
            content: content.into(),
            message_type: message_type.into(),
            metadata: None,
            created_at: Timestamp::now(),
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Aggregate view of one conversation's log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub chat_id: ChatId,
    pub message_count: usize,
    pub first_message_at: Option<Timestamp>,
    pub last_message_at: Option<Timestamp>,
}

impl ConversationSummary {
    /// Summary of a list of messages in append order.
    pub fn from_messages(chat_id: ChatId, messages: &[LoggedMessage]) -> Self {
        Self {
            chat_id,
            message_count: messages.len(),
            first_message_at: messages.first().map(|m| m.created_at),
            last_message_at: messages.last().map(|m| m.created_at),
        }
    }
}

/// Port for the conversation message log.
#[async_trait]
pub trait MessageLog: Send + Sync {
    async fn append(&self, message: LoggedMessage) -> Result<(), StorageError>;

    /// The last `limit` messages, oldest first.
    async fn history(
        &self,
        chat_id: ChatId,
        limit: usize,
    ) -> Result<Vec<LoggedMessage>, StorageError>;

    async fn summary(&self, chat_id: ChatId) -> Result<ConversationSummary, StorageError>;
}

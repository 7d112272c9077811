//! In-Memory Message Log Adapter

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::ChatId;
use crate::ports::{ConversationSummary, LoggedMessage, MessageLog, StorageError};

/// In-memory conversation history
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageLog {
    messages: Arc<RwLock<HashMap<ChatId, Vec<LoggedMessage>>>>,
}

impl InMemoryMessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of logged messages across all conversations.
    pub async fn len(&self) -> usize {
        self.messages.read().await.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl MessageLog for InMemoryMessageLog {
    async fn append(&self, message: LoggedMessage) -> Result<(), StorageError> {
        self.messages
            .write()
            .await
            .entry(message.chat_id)
            .or_default()
            .push(message);
        Ok(())
    }

    async fn history(
        &self,
        chat_id: ChatId,
        limit: usize,
    ) -> Result<Vec<LoggedMessage>, StorageError> {
        let messages = self.messages.read().await;
        let all = messages.get(&chat_id).map(Vec::as_slice).unwrap_or(&[]);
        let start = all.len().saturating_sub(limit);
        Ok(all[start..].to_vec())
    }

    async fn summary(&self, chat_id: ChatId) -> Result<ConversationSummary, StorageError> {
        let messages = self.messages.read().await;
        let all = messages.get(&chat_id).map(Vec::as_slice).unwrap_or(&[]);
        Ok(ConversationSummary::from_messages(chat_id, all))
    }
}

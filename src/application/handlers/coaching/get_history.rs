//! Query handlers over the message log.

use std::sync::Arc;

use crate::domain::foundation::ChatId;
use crate::ports::{ConversationSummary, LoggedMessage, MessageLog, StorageError, DEFAULT_HISTORY_LIMIT};

/// Query for the tail of a conversation.
#[derive(Debug, Clone)]
pub struct GetHistoryQuery {
    pub chat_id: ChatId,
    pub limit: Option<usize>,
}

pub struct GetHistoryHandler {
    message_log: Arc<dyn MessageLog>,
}

impl GetHistoryHandler {
    pub fn new(message_log: Arc<dyn MessageLog>) -> Self {
        Self { message_log }
    }

    /// Oldest first. A missing or zero limit means the default.
    pub async fn handle(&self, query: GetHistoryQuery) -> Result<Vec<LoggedMessage>, StorageError> {
        let limit = query
            .limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_HISTORY_LIMIT);
        self.message_log.history(query.chat_id, limit).await
    }
}

#[derive(Debug, Clone)]
pub struct GetConversationSummaryQuery {
    pub chat_id: ChatId,
}

pub struct GetConversationSummaryHandler {
    message_log: Arc<dyn MessageLog>,
}

impl GetConversationSummaryHandler {
    pub fn new(message_log: Arc<dyn MessageLog>) -> Self {
        Self { message_log }
    }

    pub async fn handle(
        &self,
        query: GetConversationSummaryQuery,
    ) -> Result<ConversationSummary, StorageError> {
        self.message_log.summary(query.chat_id).await
    }
}

//! Progress Store - cached, durable conversation progress.
//!
//! Every mutation runs inside one process-wide critical section that covers
//! the in-memory update and the synchronous save. A failed save leaves the
//! in-memory update in place; the caller learns about it through
//! [`Mutation::persist_error`] and decides whether to continue degraded.

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::coaching::{AnswerOutcome, ConversationProgress, DiagnosticQuestion};
use crate::domain::foundation::{ChatId, Timestamp};
use crate::ports::{ProgressStorage, StorageError};

/// Errors surfaced by the progress store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record could not be restored. Fatal for the current event.
    #[error("failed to load progress for chat {chat_id}: {source}")]
    Load {
        chat_id: ChatId,
        #[source]
        source: StorageError,
    },

    /// The in-memory update was applied but not saved.
    #[error("failed to persist progress for chat {chat_id}: {source}")]
    Persist {
        chat_id: ChatId,
        #[source]
        source: StorageError,
    },
}

/// Result of a mutation that was applied in memory.
#[derive(Debug)]
#[must_use]
pub struct Mutation<R> {
    pub value: R,
    /// Set when the durable save failed.
    pub persist_error: Option<StoreError>,
}

/// Per-conversation progress cache over a durable backend.
pub struct ProgressStore {
    storage: Arc<dyn ProgressStorage>,
    cache: Mutex<HashMap<ChatId, ConversationProgress>>,
}

impl ProgressStore {
    pub fn new(storage: Arc<dyn ProgressStorage>) -> Self {
        Self {
            storage,
            cache: Mutex::new(HashMap::new()),
        }
    }

    async fn load_into<'a>(
        &self,
        cache: &'a mut HashMap<ChatId, ConversationProgress>,
        chat_id: ChatId,
    ) -> Result<&'a mut ConversationProgress, StoreError> {
        if !cache.contains_key(&chat_id) {
            let restored = self
                .storage
                .load(chat_id)
                .await
                .map_err(|source| StoreError::Load { chat_id, source })?;
            cache.insert(chat_id, restored.unwrap_or_default());
        }
        cache
            .get_mut(&chat_id)
            .ok_or_else(|| StoreError::Load {
                chat_id,
                source: StorageError::Unavailable("cache entry vanished".to_string()),
            })
    }

    /// Snapshot of a conversation's progress, loading or creating it.
    pub async fn get(&self, chat_id: ChatId) -> Result<ConversationProgress, StoreError> {
        let mut cache = self.cache.lock().await;
        let progress = self.load_into(&mut cache, chat_id).await?;
        Ok(progress.clone())
    }

    /// Applies `f` and saves the full record, all under the store lock.
    pub async fn mutate<R, F>(&self, chat_id: ChatId, f: F) -> Result<Mutation<R>, StoreError>
    where
        F: FnOnce(&mut ConversationProgress) -> R,
    {
        let mut cache = self.cache.lock().await;
        let progress = self.load_into(&mut cache, chat_id).await?;
        let value = f(&mut *progress);

        let persist_error = self
            .storage
            .save(chat_id, progress)
            .await
            .err()
            .map(|source| StoreError::Persist { chat_id, source });

        Ok(Mutation {
            value,
            persist_error,
        })
    }

    /// Number of conversations held in memory.
    pub async fn cached(&self) -> usize {
        self.cache.lock().await.len()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Named setters
    // ─────────────────────────────────────────────────────────────────────

    pub async fn reset_diagnostic(&self, chat_id: ChatId) -> Result<Mutation<()>, StoreError> {
        self.mutate(chat_id, ConversationProgress::reset_diagnostic).await
    }

    pub async fn increment_training(
        &self,
        chat_id: ChatId,
    ) -> Result<Mutation<usize>, StoreError> {
        self.mutate(chat_id, ConversationProgress::increment_training).await
    }

    pub async fn set_skill(
        &self,
        chat_id: ChatId,
        skill: impl Into<String>,
    ) -> Result<Mutation<()>, StoreError> {
        let skill = skill.into();
        self.mutate(chat_id, |p| p.set_skill(skill)).await
    }

    pub async fn set_skill_pending(
        &self,
        chat_id: ChatId,
        pending: bool,
    ) -> Result<Mutation<()>, StoreError> {
        self.mutate(chat_id, |p| p.set_skill_pending(pending)).await
    }

    pub async fn set_sphere(
        &self,
        chat_id: ChatId,
        sphere: impl Into<String>,
    ) -> Result<Mutation<()>, StoreError> {
        let sphere = sphere.into();
        self.mutate(chat_id, |p| p.set_sphere(sphere)).await
    }

    pub async fn set_sphere_pending(
        &self,
        chat_id: ChatId,
        pending: bool,
    ) -> Result<Mutation<()>, StoreError> {
        self.mutate(chat_id, |p| p.set_sphere_pending(pending)).await
    }

    pub async fn set_training_pending(
        &self,
        chat_id: ChatId,
        pending: bool,
    ) -> Result<Mutation<()>, StoreError> {
        self.mutate(chat_id, |p| p.set_training_pending(pending)).await
    }

    pub async fn set_diagnostic_questions(
        &self,
        chat_id: ChatId,
        questions: Vec<DiagnosticQuestion>,
    ) -> Result<Mutation<()>, StoreError> {
        self.mutate(chat_id, |p| p.set_diagnostic_questions(questions)).await
    }

    pub async fn record_diagnostic_answer(
        &self,
        chat_id: ChatId,
        question: usize,
        option: usize,
    ) -> Result<Mutation<AnswerOutcome>, StoreError> {
        self.mutate(chat_id, |p| p.record_diagnostic_answer(question, option))
            .await
    }

    pub async fn complete_diagnostic(&self, chat_id: ChatId) -> Result<Mutation<()>, StoreError> {
        self.mutate(chat_id, ConversationProgress::complete_diagnostic).await
    }

    pub async fn set_training_cases(
        &self,
        chat_id: ChatId,
        cases: Vec<String>,
    ) -> Result<Mutation<()>, StoreError> {
        self.mutate(chat_id, |p| p.set_training_cases(cases)).await
    }

    pub async fn restart_training(
        &self,
        chat_id: ChatId,
        clear_cases: bool,
    ) -> Result<Mutation<()>, StoreError> {
        self.mutate(chat_id, |p| p.restart_training(clear_cases)).await
    }

    pub async fn set_last_reminder(
        &self,
        chat_id: ChatId,
        at: Timestamp,
    ) -> Result<Mutation<()>, StoreError> {
        self.mutate(chat_id, |p| p.set_last_reminder(at)).await
    }
}

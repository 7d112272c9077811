//! In-Memory Progress Storage Adapter
//!
//! Keeps progress records in memory. Used for tests and the `memory` storage
//! backend. Saves can be made to fail on demand to exercise degraded mode.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::coaching::ConversationProgress;
use crate::domain::foundation::ChatId;
use crate::ports::{ProgressStorage, StorageError};

/// In-memory storage for conversation progress
#[derive(Debug, Clone, Default)]
pub struct InMemoryProgressStorage {
    records: Arc<RwLock<HashMap<ChatId, ConversationProgress>>>,
    fail_saves: Arc<AtomicBool>,
    fail_loads: Arc<AtomicBool>,
    saves: Arc<AtomicUsize>,
}

impl InMemoryProgressStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent loads fail (or succeed again).
    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Stored copy of a record, bypassing any cache.
    pub async fn stored(&self, chat_id: ChatId) -> Option<ConversationProgress> {
        self.records.read().await.get(&chat_id).cloned()
    }

    /// Seed a record directly.
    pub async fn insert(&self, chat_id: ChatId, progress: ConversationProgress) {
        self.records.write().await.insert(chat_id, progress);
    }
}

#[async_trait]
impl ProgressStorage for InMemoryProgressStorage {
    async fn load(&self, chat_id: ChatId) -> Result<Option<ConversationProgress>, StorageError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("simulated load failure".to_string()));
        }
        Ok(self.records.read().await.get(&chat_id).cloned())
    }

    async fn save(
        &self,
        chat_id: ChatId,
        progress: &ConversationProgress,
    ) -> Result<(), StorageError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("simulated save failure".to_string()));
        }
        self.records.write().await.insert(chat_id, progress.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_then_load() {
        let storage = InMemoryProgressStorage::new();
        let mut progress = ConversationProgress::default();
        progress.set_skill("idp");

        storage.save(ChatId::new(1), &progress).await.unwrap();

        assert_eq!(storage.load(ChatId::new(1)).await.unwrap(), Some(progress));
        assert_eq!(storage.save_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_chat_is_none() {
        let storage = InMemoryProgressStorage::new();
        assert!(storage.load(ChatId::new(9)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_simulated_failures() {
        let storage = InMemoryProgressStorage::new();
        storage.set_fail_saves(true);
        storage.set_fail_loads(true);

        assert!(storage
            .save(ChatId::new(1), &ConversationProgress::default())
            .await
            .is_err());
        assert!(storage.load(ChatId::new(1)).await.is_err());
        assert_eq!(storage.save_count(), 0);

        storage.set_fail_loads(false);
        assert!(storage.load(ChatId::new(1)).await.unwrap().is_none());
    }
}

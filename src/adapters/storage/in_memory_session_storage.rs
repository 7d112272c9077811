//! In-Memory Practice Session Storage Adapter

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{ChatId, SessionId};
use crate::domain::practice::PracticeSession;
use crate::ports::{PracticeSessionStorage, StorageError};

#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStorage {
    sessions: Arc<RwLock<HashMap<SessionId, PracticeSession>>>,
    fail_all: Arc<AtomicBool>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail (or succeed again).
    pub fn set_unavailable(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("simulated session storage failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PracticeSessionStorage for InMemorySessionStorage {
    async fn save(&self, session: &PracticeSession) -> Result<(), StorageError> {
        self.check()?;
        self.sessions.write().await.insert(session.id, session.clone());
        Ok(())
    }

    async fn get(&self, id: SessionId) -> Result<Option<PracticeSession>, StorageError> {
        self.check()?;
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn list(&self, chat_id: ChatId) -> Result<Vec<PracticeSession>, StorageError> {
        self.check()?;
        let mut sessions: Vec<PracticeSession> = self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| s.chat_id == chat_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }
}

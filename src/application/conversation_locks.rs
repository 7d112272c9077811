//! Per-conversation serialization.
//!
//! The ingest handler holds a conversation's lock for the whole event, so at
//! most one state transition per conversation is in flight while slow
//! generator calls are awaited.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::ChatId;

/// Idle locks are pruned once the table grows past this size.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Default)]
pub struct ConversationLocks {
    locks: Mutex<HashMap<ChatId, Arc<AsyncMutex<()>>>>,
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to a conversation.
    pub async fn acquire(&self, chat_id: ChatId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            let lock = Arc::clone(locks.entry(chat_id).or_default());
            if locks.len() > PRUNE_THRESHOLD {
                locks.retain(|_, l| Arc::strong_count(l) > 1);
            }
            lock
        };
        lock.lock_owned().await
    }

    /// Number of tracked conversations.
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

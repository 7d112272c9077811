//! Replay guard - at-least-once delivery without repeated side effects.
//!
//! Remembers the response for recently answered events in a bounded FIFO
//! cache. A redelivered event gets the cached response and never reaches the
//! dialogue engine again. Entries are keyed by conversation and event id, so
//! transports that number events per chat never see another chat's answer.

use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;

use crate::domain::coaching::OutputAction;
use crate::domain::foundation::{ChatId, EventId};

type ReplayKey = (ChatId, EventId);

#[derive(Debug, Default)]
struct Entries {
    responses: HashMap<ReplayKey, Vec<OutputAction>>,
    order: VecDeque<ReplayKey>,
}

#[derive(Debug)]
pub struct ReplayGuard {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl ReplayGuard {
    /// A capacity of zero disables the guard.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(Entries::default()),
        }
    }

    /// Cached response for an event already answered.
    pub async fn replay(&self, chat_id: ChatId, event_id: &EventId) -> Option<Vec<OutputAction>> {
        let key = (chat_id, event_id.clone());
        self.entries.lock().await.responses.get(&key).cloned()
    }

    /// Remembers a response, evicting the oldest entries past capacity.
    pub async fn remember(&self, chat_id: ChatId, event_id: EventId, actions: Vec<OutputAction>) {
        if self.capacity == 0 {
            return;
        }
        let key = (chat_id, event_id);
        let mut entries = self.entries.lock().await;
        if entries.responses.insert(key.clone(), actions).is_none() {
            entries.order.push_back(key);
        }
        while entries.order.len() > self.capacity {
            if let Some(oldest) = entries.order.pop_front() {
                entries.responses.remove(&oldest);
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.order.len()
    }
}

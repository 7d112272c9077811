//! Recording Reminder Push - keeps pushed actions in memory for tests.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::coaching::OutputAction;
use crate::ports::{PushError, ReminderPush};

/// Records every push instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct RecordingReminderPush {
    pushed: Arc<Mutex<Vec<Vec<OutputAction>>>>,
    fail_with: Option<u16>,
}

impl RecordingReminderPush {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every push fails with the given status after being recorded.
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Self::default()
        }
    }

    pub async fn pushed(&self) -> Vec<Vec<OutputAction>> {
        self.pushed.lock().await.clone()
    }
}

#[async_trait]
impl ReminderPush for RecordingReminderPush {
    async fn push(&self, actions: Vec<OutputAction>) -> Result<(), PushError> {
        self.pushed.lock().await.push(actions);
        match self.fail_with {
            Some(status) => Err(PushError::Status(status)),
            None => Ok(()),
        }
    }
}

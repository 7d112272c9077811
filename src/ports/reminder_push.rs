//! Reminder Push Port - Out-of-band delivery of reminder actions.

use async_trait::async_trait;

use crate::domain::coaching::OutputAction;

/// Errors delivering a push.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("push endpoint returned status {0}")]
    Status(u16),

    #[error("push request failed: {0}")]
    Network(String),
}

/// Port for pushing actions to the transport outside a request/response.
#[async_trait]
pub trait ReminderPush: Send + Sync {
    async fn push(&self, actions: Vec<OutputAction>) -> Result<(), PushError>;
}

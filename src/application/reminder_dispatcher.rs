//! Reminder Dispatcher - deferred, best-effort reminders.
//!
//! A reminder is a detached task: sleep for the configured delay, push one
//! reminder message, log the outcome. No retries, no cancellation. With
//! `at_most_one_pending`, a second request for a conversation whose reminder
//! has not fired yet is acknowledged but not scheduled.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::application::ProgressStore;
use crate::domain::coaching::replies;
use crate::domain::foundation::{ChatId, Timestamp};
use crate::ports::ReminderPush;

/// What happened to a reminder request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Scheduled { due: Timestamp },
    /// A reminder scheduled at `since` is still waiting.
    AlreadyPending { since: Timestamp },
    /// No push target is configured.
    Disabled,
}

pub struct ReminderDispatcher {
    push: Option<Arc<dyn ReminderPush>>,
    store: Arc<ProgressStore>,
    delay: Duration,
    at_most_one_pending: bool,
    pending: Arc<Mutex<HashMap<ChatId, Timestamp>>>,
}

impl ReminderDispatcher {
    pub fn new(
        push: Option<Arc<dyn ReminderPush>>,
        store: Arc<ProgressStore>,
        delay: Duration,
        at_most_one_pending: bool,
    ) -> Self {
        Self {
            push,
            store,
            delay,
            at_most_one_pending,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Dispatcher that never schedules anything.
    pub fn disabled(store: Arc<ProgressStore>) -> Self {
        Self::new(None, store, Duration::ZERO, true)
    }

    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Schedules a reminder for `chat_id` and returns immediately.
    pub async fn schedule(&self, chat_id: ChatId) -> ScheduleOutcome {
        let Some(push) = self.push.clone() else {
            info!(chat_id = %chat_id, "No push URL configured, reminder skipped");
            return ScheduleOutcome::Disabled;
        };

        let now = Timestamp::now();
        {
            let mut pending = self.pending.lock().await;
            if self.at_most_one_pending {
                if let Some(since) = pending.get(&chat_id) {
                    info!(chat_id = %chat_id, since = %since, "Reminder already pending");
                    return ScheduleOutcome::AlreadyPending { since: *since };
                }
            }
            pending.insert(chat_id, now);
        }

        match self.store.set_last_reminder(chat_id, now).await {
            Ok(mutation) => {
                if let Some(e) = mutation.persist_error {
                    error!(chat_id = %chat_id, error = %e, "Reminder time not persisted");
                }
            }
            Err(e) => error!(chat_id = %chat_id, error = %e, "Reminder time not recorded"),
        }

        let delay = self.delay;
        let pending = Arc::clone(&self.pending);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match push.push(vec![replies::reminder(chat_id)]).await {
                Ok(()) => info!(chat_id = %chat_id, "Reminder sent"),
                Err(e) => warn!(chat_id = %chat_id, error = %e, "Reminder push failed"),
            }
            let mut pending = pending.lock().await;
            if pending.get(&chat_id) == Some(&now) {
                pending.remove(&chat_id);
            }
        });

        let due = now.plus_secs(delay.as_secs());
        info!(chat_id = %chat_id, due = %due, "Reminder scheduled");
        ScheduleOutcome::Scheduled { due }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::push::RecordingReminderPush;
    use crate::adapters::storage::InMemoryProgressStorage;

    fn store() -> Arc<ProgressStore> {
        Arc::new(ProgressStore::new(Arc::new(InMemoryProgressStorage::new())))
    }

    fn dispatcher(push: &RecordingReminderPush, at_most_one: bool) -> ReminderDispatcher {
        ReminderDispatcher::new(
            Some(Arc::new(push.clone())),
            store(),
            Duration::from_millis(20),
            at_most_one,
        )
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(150)).await;
    }

    #[tokio::test]
    async fn disabled_without_push_target() {
        let dispatcher = ReminderDispatcher::disabled(store());

        assert_eq!(dispatcher.schedule(ChatId::new(1)).await, ScheduleOutcome::Disabled);
        assert_eq!(dispatcher.pending_count().await, 0);
    }

    #[tokio::test]
    async fn reminder_is_pushed_after_delay() {
        let push = RecordingReminderPush::new();
        let dispatcher = dispatcher(&push, true);

        let outcome = dispatcher.schedule(ChatId::new(9)).await;

        assert!(matches!(outcome, ScheduleOutcome::Scheduled { .. }));
        assert!(push.pushed().await.is_empty());
        settle().await;
        let pushed = push.pushed().await;
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0][0].as_message().unwrap().chat_id, ChatId::new(9));
        assert_eq!(dispatcher.pending_count().await, 0);
    }

    #[tokio::test]
    async fn second_request_while_pending_is_not_scheduled() {
        let push = RecordingReminderPush::new();
        let dispatcher = dispatcher(&push, true);

        let first = dispatcher.schedule(ChatId::new(2)).await;
        let second = dispatcher.schedule(ChatId::new(2)).await;

        assert!(matches!(first, ScheduleOutcome::Scheduled { .. }));
        assert!(matches!(second, ScheduleOutcome::AlreadyPending { .. }));
        settle().await;
        assert_eq!(push.pushed().await.len(), 1);
    }

    #[tokio::test]
    async fn duplicates_allowed_when_dedup_disabled() {
        let push = RecordingReminderPush::new();
        let dispatcher = dispatcher(&push, false);

        dispatcher.schedule(ChatId::new(3)).await;
        dispatcher.schedule(ChatId::new(3)).await;
        settle().await;

        assert_eq!(push.pushed().await.len(), 2);
    }

    #[tokio::test]
    async fn push_failure_is_swallowed_and_clears_pending() {
        let push = RecordingReminderPush::failing(502);
        let dispatcher = dispatcher(&push, true);

        dispatcher.schedule(ChatId::new(4)).await;
        settle().await;

        assert_eq!(push.pushed().await.len(), 1);
        assert_eq!(dispatcher.pending_count().await, 0);
        assert!(matches!(
            dispatcher.schedule(ChatId::new(4)).await,
            ScheduleOutcome::Scheduled { .. }
        ));
    }

    #[tokio::test]
    async fn scheduling_records_last_reminder() {
        let push = RecordingReminderPush::new();
        let store = store();
        let dispatcher = ReminderDispatcher::new(
            Some(Arc::new(push)),
            store.clone(),
            Duration::from_secs(60),
            true,
        );

        dispatcher.schedule(ChatId::new(5)).await;

        assert!(store.get(ChatId::new(5)).await.unwrap().last_reminder.is_some());
    }
}

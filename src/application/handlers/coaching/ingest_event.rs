//! IngestEventHandler - Command handler answering one inbound event.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::application::{ConversationLocks, DialogueEngine, EngineError, ReplayGuard};
use crate::domain::coaching::{dedup_actions, InboundEvent, OutputAction};
use crate::domain::foundation::ChatId;
use crate::ports::{LoggedMessage, MessageLog, Speaker};

/// Command to answer an inbound event.
#[derive(Debug, Clone)]
pub struct IngestCommand {
    pub event: InboundEvent,
}

impl IngestCommand {
    pub fn new(event: InboundEvent) -> Self {
        Self { event }
    }
}

/// Actions to deliver for an event.
#[derive(Debug, Clone)]
pub struct IngestResult {
    pub actions: Vec<OutputAction>,
    /// True when the answer came from the replay cache.
    pub replayed: bool,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Handler for inbound events.
///
/// Events of one conversation are processed one at a time; events of
/// different conversations run concurrently. Redelivered events get the
/// answer they got the first time.
pub struct IngestEventHandler {
    engine: Arc<DialogueEngine>,
    locks: ConversationLocks,
    replay: ReplayGuard,
    message_log: Arc<dyn MessageLog>,
    requests: AtomicU64,
}

impl IngestEventHandler {
    pub fn new(
        engine: Arc<DialogueEngine>,
        replay: ReplayGuard,
        message_log: Arc<dyn MessageLog>,
    ) -> Self {
        Self {
            engine,
            locks: ConversationLocks::new(),
            replay,
            message_log,
            requests: AtomicU64::new(0),
        }
    }

    /// Number of events received, replays included.
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub async fn handle(&self, cmd: IngestCommand) -> Result<IngestResult, IngestError> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        let event = cmd.event;
        let chat_id = event.chat_id();

        if let Some(actions) = self.replay.replay(chat_id, &event.event_id).await {
            return Ok(Self::replayed(chat_id, actions));
        }

        let _guard = self.locks.acquire(chat_id).await;
        // A duplicate may have finished while this one waited for the lock.
        if let Some(actions) = self.replay.replay(chat_id, &event.event_id).await {
            return Ok(Self::replayed(chat_id, actions));
        }

        self.record_inbound(&event).await;

        let actions = self.engine.handle(&event).await.map_err(|err| {
            error!(chat_id = %chat_id, event_id = %event.event_id, error = %err, "Event failed");
            err
        })?;

        self.record_outbound(chat_id, &actions).await;

        let actions = dedup_actions(actions);
        self.replay
            .remember(chat_id, event.event_id.clone(), actions.clone())
            .await;

        info!(
            chat_id = %chat_id,
            kind = event.kind.as_str(),
            actions = actions.len(),
            "Event answered"
        );
        Ok(IngestResult {
            actions,
            replayed: false,
        })
    }

    fn replayed(chat_id: ChatId, actions: Vec<OutputAction>) -> IngestResult {
        debug!(chat_id = %chat_id, "Replaying cached answer");
        IngestResult {
            actions,
            replayed: true,
        }
    }

    async fn record_inbound(&self, event: &InboundEvent) {
        let Some(content) = event.user_content() else {
            return;
        };
        let message = LoggedMessage::new(
            event.chat_id(),
            Speaker::User,
            content,
            event.kind.as_str(),
        )
        .with_metadata(json!({
            "event_id": event.event_id.as_str(),
            "username": event.user.username,
        }));
        self.append(message).await;
    }

    async fn record_outbound(&self, chat_id: ChatId, actions: &[OutputAction]) {
        for text in actions
            .iter()
            .filter_map(OutputAction::as_message)
            .map(|m| m.text.as_str())
            .filter(|t| !t.is_empty())
        {
            let message = LoggedMessage::new(
                chat_id,
                Speaker::Assistant,
                text,
                OutputAction::SEND_MESSAGE,
            );
            self.append(message).await;
        }
    }

    async fn append(&self, message: LoggedMessage) {
        let chat_id = message.chat_id;
        if let Err(err) = self.message_log.append(message).await {
            error!(chat_id = %chat_id, error = %err, "Failed to record message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::{InMemoryMessageLog, InMemoryProgressStorage};
    use crate::application::{
        AnswerEvaluator, ContentProvider, ProgressStore, ReminderDispatcher,
    };
    use crate::domain::coaching::{AnswerHeuristics, Catalog};
    use crate::domain::foundation::EventId;

    struct Fixture {
        handler: Arc<IngestEventHandler>,
        storage: InMemoryProgressStorage,
        log: Arc<InMemoryMessageLog>,
    }

    fn fixture() -> Fixture {
        let storage = InMemoryProgressStorage::new();
        let store = Arc::new(ProgressStore::new(Arc::new(storage.clone())));
        let engine = DialogueEngine::new(
            store.clone(),
            Arc::new(ContentProvider::static_only(Arc::new(Catalog::builtin()))),
            Arc::new(AnswerEvaluator::new(None, AnswerHeuristics::default())),
            Arc::new(ReminderDispatcher::disabled(store)),
        );
        let log = Arc::new(InMemoryMessageLog::new());
        let handler = IngestEventHandler::new(Arc::new(engine), ReplayGuard::new(16), log.clone());
        Fixture {
            handler: Arc::new(handler),
            storage,
            log,
        }
    }

    #[tokio::test]
    async fn answers_and_logs_both_directions() {
        let f = fixture();
        let event = InboundEvent::action(ChatId::new(1), "start");

        let result = f.handler.handle(IngestCommand::new(event)).await.unwrap();

        assert_eq!(result.actions.len(), 1);
        assert!(!result.replayed);
        let history = f.log.history(ChatId::new(1), 10).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Speaker::User);
        assert_eq!(history[0].content, "start");
        assert_eq!(history[1].role, Speaker::Assistant);
    }

    #[tokio::test]
    async fn redelivered_event_is_replayed_without_side_effects() {
        let f = fixture();
        let event = InboundEvent::callback(ChatId::new(2), "diag:0:0")
            .with_event_id(EventId::from_string("evt-1"));

        let first = f.handler.handle(IngestCommand::new(event.clone())).await.unwrap();
        let second = f.handler.handle(IngestCommand::new(event)).await.unwrap();

        assert!(second.replayed);
        assert_eq!(first.actions, second.actions);
        let progress = f.storage.stored(ChatId::new(2)).await.unwrap();
        assert_eq!(progress.diagnostic_answers, vec!["0:0"]);
        assert_eq!(f.handler.request_count(), 2);
        assert_eq!(f.log.len().await, 2);
    }

    #[tokio::test]
    async fn shared_event_id_across_chats_reaches_each_engine() {
        let f = fixture();
        let id = EventId::from_string("1");
        let first = InboundEvent::action(ChatId::new(111), "start").with_event_id(id.clone());
        let second = InboundEvent::action(ChatId::new(222), "menu:toc").with_event_id(id);

        f.handler.handle(IngestCommand::new(first)).await.unwrap();
        let result = f.handler.handle(IngestCommand::new(second)).await.unwrap();

        assert!(!result.replayed);
        assert!(!result.actions.is_empty());
        assert!(result
            .actions
            .iter()
            .filter_map(OutputAction::as_message)
            .all(|m| m.chat_id == ChatId::new(222)));
    }

    #[tokio::test]
    async fn concurrent_events_of_one_chat_are_serialized() {
        let f = fixture();
        let chat = ChatId::new(3);
        f.handler
            .handle(IngestCommand::new(InboundEvent::action(chat, "sphere:it")))
            .await
            .unwrap();
        f.handler
            .handle(IngestCommand::new(InboundEvent::action(chat, "diagnostic:start")))
            .await
            .unwrap();

        let tasks: Vec<_> = (0..3)
            .map(|q| {
                let handler = f.handler.clone();
                tokio::spawn(async move {
                    let event = InboundEvent::callback(chat, format!("diag:{q}:0"));
                    handler.handle(IngestCommand::new(event)).await.unwrap()
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let progress = f.storage.stored(chat).await.unwrap();
        let mut answers = progress.diagnostic_answers.clone();
        answers.dedup();
        assert_eq!(answers, progress.diagnostic_answers);
        assert!(progress.diagnostic_answers.len() <= 3);
        assert!(progress
            .diagnostic_answers
            .iter()
            .enumerate()
            .all(|(i, a)| a.starts_with(&format!("{i}:"))));
    }

    #[tokio::test]
    async fn load_failure_is_returned_and_not_cached() {
        let f = fixture();
        f.storage.set_fail_loads(true);
        let event = InboundEvent::action(ChatId::new(4), "start")
            .with_event_id(EventId::from_string("evt-2"));

        let failed = f.handler.handle(IngestCommand::new(event.clone())).await;
        assert!(matches!(failed, Err(IngestError::Engine(_))));

        f.storage.set_fail_loads(false);
        let retried = f.handler.handle(IngestCommand::new(event)).await.unwrap();
        assert!(!retried.replayed);
    }
}

//! Dialogue Engine - routes one inbound event to its output actions.
//!
//! The engine reads and mutates progress through the [`ProgressStore`],
//! asks the [`ContentProvider`] and [`AnswerEvaluator`] for content, and
//! returns the actions in the order they should be delivered. The caller is
//! expected to hold the conversation's lock for the whole call.
//!
//! Only a failure to load a conversation's progress fails an event. Generator
//! failures degrade to catalog content or heuristics, and failed saves are
//! logged while the in-memory state carries on.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

use crate::application::{
    AnswerEvaluator, ContentProvider, Mutation, ProgressStore, ReminderDispatcher, StoreError,
};
use crate::domain::coaching::{
    replies, ActionCommand, CallbackCommand, Catalog, EventKind, InboundEvent, OutputAction,
};
use crate::domain::foundation::ChatId;

/// Errors that fail a whole event.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("conversation progress unavailable: {0}")]
    ProgressUnavailable(#[source] StoreError),
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        EngineError::ProgressUnavailable(err)
    }
}

pub type EngineResult = Result<Vec<OutputAction>, EngineError>;

pub struct DialogueEngine {
    pub(super) store: Arc<ProgressStore>,
    pub(super) content: Arc<ContentProvider>,
    pub(super) evaluator: Arc<AnswerEvaluator>,
    pub(super) reminders: Arc<ReminderDispatcher>,
}

impl DialogueEngine {
    pub fn new(
        store: Arc<ProgressStore>,
        content: Arc<ContentProvider>,
        evaluator: Arc<AnswerEvaluator>,
        reminders: Arc<ReminderDispatcher>,
    ) -> Self {
        Self {
            store,
            content,
            evaluator,
            reminders,
        }
    }

    pub fn store(&self) -> &Arc<ProgressStore> {
        &self.store
    }

    pub(super) fn catalog(&self) -> &Catalog {
        self.content.catalog()
    }

    /// Produces the actions answering `event`.
    pub async fn handle(&self, event: &InboundEvent) -> EngineResult {
        let chat_id = event.chat_id();
        // Restore (or create) the record first: this is the one fatal failure.
        self.store.get(chat_id).await?;

        debug!(chat_id = %chat_id, kind = event.kind.as_str(), "Handling event");
        match (&event.kind, event.payload()) {
            (EventKind::Action, Some(name)) => self.on_action(chat_id, ActionCommand::parse(name)).await,
            (EventKind::Callback, Some(data)) => {
                self.on_callback(chat_id, CallbackCommand::parse(data)).await
            }
            (EventKind::Text, Some(text)) => self.on_text(chat_id, text).await,
            (kind, _) => {
                debug!(chat_id = %chat_id, kind = kind.as_str(), "Event without usable payload");
                Ok(vec![replies::event_acknowledged(chat_id)])
            }
        }
    }

    /// Unwraps a store mutation, logging a failed save and carrying on with
    /// the in-memory state.
    pub(super) fn settle<R>(
        &self,
        chat_id: ChatId,
        result: Result<Mutation<R>, StoreError>,
    ) -> Result<R, EngineError> {
        let mutation = result?;
        if let Some(err) = mutation.persist_error {
            error!(chat_id = %chat_id, error = %err, "Progress kept in memory only");
        }
        Ok(mutation.value)
    }

    /// Serves the case at the current training index, fetching and storing
    /// the case list first if needed.
    pub(super) async fn serve_training_case(&self, chat_id: ChatId) -> EngineResult {
        let progress = self.store.get(chat_id).await?;
        let cases = self
            .content
            .ensure_training_cases(chat_id, &progress, &progress.skill)
            .await;

        if cases.is_empty() {
            self.settle(chat_id, self.store.set_training_pending(chat_id, false).await)?;
            return Ok(vec![replies::no_cases(chat_id)]);
        }
        if progress.training_cases.is_empty() {
            self.settle(
                chat_id,
                self.store.set_training_cases(chat_id, cases.clone()).await,
            )?;
        }

        let index = progress.training_index;
        if index >= cases.len() {
            self.settle(chat_id, self.store.set_training_pending(chat_id, false).await)?;
        }
        Ok(vec![replies::training_case(chat_id, index, &cases)])
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::domain::coaching::EventKind;

    #[tokio::test]
    async fn unknown_event_kind_is_acknowledged() {
        let harness = Harness::new();
        let event = InboundEvent::new(harness.chat, EventKind::parse("voice"));

        let actions = harness.engine.handle(&event).await.unwrap();

        assert_eq!(texts(&actions), vec!["Событие принято."]);
    }

    #[tokio::test]
    async fn event_missing_its_payload_is_acknowledged() {
        let harness = Harness::new();
        harness.action("sphere:custom").await;

        let actions = harness
            .engine
            .handle(&InboundEvent::new(harness.chat, EventKind::Text))
            .await
            .unwrap();

        assert_eq!(texts(&actions), vec!["Событие принято."]);
        assert!(harness.progress().await.sphere_pending);
    }

    #[tokio::test]
    async fn load_failure_fails_the_event() {
        let harness = Harness::new();
        harness.storage.set_fail_loads(true);

        let result = harness
            .engine
            .handle(&InboundEvent::action(harness.chat, "start"))
            .await;

        assert!(matches!(result, Err(EngineError::ProgressUnavailable(_))));
    }

    #[tokio::test]
    async fn save_failure_degrades_to_memory() {
        let harness = Harness::new();
        harness.storage.set_fail_saves(true);

        let actions = harness.action("sphere:it").await;

        assert_eq!(actions.len(), 1);
        assert!(harness.progress().await.sphere_chosen);
        assert!(harness.storage.stored(harness.chat).await.is_none());
    }

    fn empty_catalog() -> Catalog {
        Catalog::from_yaml_str(
            "spheres: []\nskills: []\ndiagnostic: []\ncases: {}\nfallback_skill: none\n",
        )
        .unwrap()
    }

    async fn with_typed_sphere(catalog: Catalog) -> Harness {
        let harness = Harness::with_catalog(catalog);
        harness.action("sphere:custom").await;
        harness.text("IT").await;
        harness
    }

    #[tokio::test]
    async fn training_without_any_cases_points_back_to_menu() {
        let harness = with_typed_sphere(empty_catalog()).await;
        harness.action("training:start").await;
        harness.text("feedback").await;

        let actions = harness.action("training:start").await;

        assert_eq!(actions.len(), 1);
        assert!(data(&actions).contains(&"action:start".to_string()));
        assert!(!harness.progress().await.training_case_pending);
    }

    #[tokio::test]
    async fn skill_text_without_any_cases_explains_and_stays_idle() {
        let harness = with_typed_sphere(empty_catalog()).await;
        harness.action("training:start").await;

        let actions = harness.text("feedback").await;

        assert_eq!(actions.len(), 2);
        assert!(data(&actions).contains(&"action:start".to_string()));
        assert!(!harness.progress().await.training_case_pending);
    }

    #[tokio::test]
    async fn diagnostic_without_any_questions_points_back_to_menu() {
        let harness = with_typed_sphere(empty_catalog()).await;

        let started = harness.action("diagnostic:start").await;
        let answered = harness.callback("diag:0:0").await;

        for actions in [started, answered] {
            assert_eq!(actions.len(), 1);
            assert!(texts(&actions)[0].starts_with("Не удалось подготовить вопросы"));
            assert!(data(&actions).contains(&"action:start".to_string()));
        }
        let progress = harness.progress().await;
        assert!(progress.diagnostic_answers.is_empty());
        assert!(!progress.training_case_pending);
    }

    #[tokio::test]
    async fn every_event_answers_with_actions() {
        let harness = Harness::new();
        for event in [
            InboundEvent::action(harness.chat, ""),
            InboundEvent::callback(harness.chat, ""),
            InboundEvent::text(harness.chat, ""),
        ] {
            let actions = harness.engine.handle(&event).await.unwrap();
            assert!(!actions.is_empty());
        }
    }
}

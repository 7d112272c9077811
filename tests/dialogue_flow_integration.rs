//! Integration tests for complete coaching dialogues.
//!
//! These tests drive the ingest handler the way the chat transport does:
//! 1. Menu, sphere, diagnostic and training flows against in-memory adapters
//! 2. Generated content from a scripted provider, with fallbacks on failure
//! 3. Behaviour when progress storage fails

use std::sync::Arc;
use std::time::Duration;

use skill_coach::adapters::ai::{LlmContentGenerator, MockAIProvider, MockError};
use skill_coach::adapters::push::RecordingReminderPush;
use skill_coach::adapters::storage::{
    FileProgressStorage, InMemoryMessageLog, InMemoryProgressStorage,
};
use skill_coach::application::{
    AnswerEvaluator, ContentLimits, ContentProvider, DialogueEngine, IngestCommand, IngestError,
    IngestEventHandler, ProgressStore, ReminderDispatcher, ReplayGuard,
};
use skill_coach::domain::coaching::{
    AnswerHeuristics, Catalog, ConversationProgress, InboundEvent, OutputAction,
};
use skill_coach::domain::foundation::ChatId;
use skill_coach::ports::{ContentGenerator, MessageLog, ProgressStorage};

// =============================================================================
// Test Infrastructure
// =============================================================================

const CHAT: ChatId = ChatId::new(7001);

struct Coach {
    handler: IngestEventHandler,
    log: Arc<InMemoryMessageLog>,
    push: RecordingReminderPush,
}

impl Coach {
    fn new(storage: Arc<dyn ProgressStorage>, provider: Option<&MockAIProvider>) -> Self {
        let generator: Option<Arc<dyn ContentGenerator>> = provider.map(|p| {
            Arc::new(LlmContentGenerator::new(Arc::new(p.clone()), 0.3)) as Arc<dyn ContentGenerator>
        });
        let push = RecordingReminderPush::new();
        let store = Arc::new(ProgressStore::new(storage));
        let engine = DialogueEngine::new(
            store.clone(),
            Arc::new(ContentProvider::new(
                generator.clone(),
                Arc::new(Catalog::builtin()),
                ContentLimits::default(),
            )),
            Arc::new(AnswerEvaluator::new(generator, AnswerHeuristics::default())),
            Arc::new(ReminderDispatcher::new(
                Some(Arc::new(push.clone())),
                store,
                Duration::from_millis(20),
                true,
            )),
        );
        let log = Arc::new(InMemoryMessageLog::new());
        Self {
            handler: IngestEventHandler::new(Arc::new(engine), ReplayGuard::new(64), log.clone()),
            log,
            push,
        }
    }

    fn in_memory() -> (Self, InMemoryProgressStorage) {
        let storage = InMemoryProgressStorage::new();
        (Self::new(Arc::new(storage.clone()), None), storage)
    }

    async fn send(&self, event: InboundEvent) -> Vec<OutputAction> {
        self.handler
            .handle(IngestCommand::new(event))
            .await
            .expect("event should be answered")
            .actions
    }

    async fn action(&self, name: &str) -> Vec<OutputAction> {
        self.send(InboundEvent::action(CHAT, name)).await
    }

    async fn callback(&self, data: &str) -> Vec<OutputAction> {
        self.send(InboundEvent::callback(CHAT, data)).await
    }

    async fn text(&self, text: &str) -> Vec<OutputAction> {
        self.send(InboundEvent::text(CHAT, text)).await
    }
}

fn texts(actions: &[OutputAction]) -> Vec<String> {
    actions
        .iter()
        .filter_map(OutputAction::as_message)
        .map(|m| m.text.clone())
        .collect()
}

fn data(actions: &[OutputAction]) -> Vec<String> {
    actions
        .iter()
        .filter_map(OutputAction::as_message)
        .filter_map(|m| m.keyboard.as_ref())
        .flat_map(|k| k.buttons().map(|b| b.data.clone()).collect::<Vec<_>>())
        .collect()
}

const GOOD_ANSWER: &str =
    "Давай обсудим конкретные действия и ожидания с примерами уже на следующей неделе";

// =============================================================================
// Static content flows
// =============================================================================

#[tokio::test]
async fn start_offers_the_diagnostic() {
    let (coach, _) = Coach::in_memory();

    let actions = coach.action("start").await;

    assert_eq!(actions.len(), 1);
    assert!(actions[0].as_message().is_some());
    assert!(data(&actions).contains(&"action:diagnostic:start".to_string()));
}

#[tokio::test]
async fn diagnostic_without_sphere_asks_for_sphere_text() {
    let (coach, _) = Coach::in_memory();

    let actions = coach.action("diagnostic:start").await;

    assert!(texts(&actions)[0].contains("введи её вручную"));
    assert!(data(&actions).iter().all(|d| !d.starts_with("diag:")));
}

#[tokio::test]
async fn full_static_journey() {
    let (coach, storage) = Coach::in_memory();

    // Sphere by free text, then the diagnostic.
    coach.action("sphere:custom").await;
    coach.text("Логистика").await;
    let first = coach.action("diagnostic:start").await;
    assert!(texts(&first)[0].starts_with("Диагностика, вопрос 1/3"));
    coach.callback("diag:0:0").await;
    coach.callback("diag:1:1").await;
    let done = coach.callback("diag:2:2").await;
    assert!(texts(&done)[0].starts_with("Диагностика завершена."));

    // Skill by free text, then a case and a good answer.
    let prompt = coach.action("training:start").await;
    assert!(texts(&prompt)[0].contains("навык"));
    let served = coach.text("обратная связь").await;
    assert_eq!(served.len(), 2);
    assert!(texts(&served)[1].starts_with("Кейс 1:"));

    let feedback = coach.text(GOOD_ANSWER).await;
    assert_eq!(data(&feedback), vec!["case:next"]);
    let next = coach.callback("case:next").await;
    assert!(texts(&next)[0].starts_with("Кейс 2:"));

    let progress = storage.stored(CHAT).await.unwrap();
    assert_eq!(progress.sphere, "Логистика");
    assert!(progress.diagnostic_done);
    assert_eq!(progress.skill, "обратная связь");
    assert_eq!(progress.training_index, 1);
    assert!(progress.training_case_pending);
}

#[tokio::test]
async fn weak_answer_can_be_retried() {
    let (coach, storage) = Coach::in_memory();
    coach.action("sphere:hr").await;
    coach.action("skill:feedback").await;
    coach.text("feedback").await;

    let weak = coach.text("ну не знаю").await;
    assert!(data(&weak).contains(&"case:retry".to_string()));
    assert!(storage.stored(CHAT).await.unwrap().training_case_pending);

    let retry = coach.callback("case:retry").await;
    assert!(texts(&retry)[0].starts_with("Кейс 1:"));
}

#[tokio::test]
async fn index_past_the_end_serves_exhausted_prompt() {
    let (coach, storage) = Coach::in_memory();
    let cases: Vec<String> = (1..=5).map(|i| format!("case {i}")).collect();
    let progress = ConversationProgress {
        sphere_chosen: true,
        skill_chosen: true,
        training_cases: cases,
        training_index: 4,
        training_case_pending: true,
        ..ConversationProgress::default()
    };
    storage.insert(CHAT, progress).await;

    let actions = coach.callback("case:next").await;

    let buttons = data(&actions);
    assert!(buttons.contains(&"training:restart".to_string()));
    assert!(buttons.contains(&"action:start".to_string()));
    assert!(buttons.iter().any(|d| d.starts_with("action:skill:")));
    assert_eq!(storage.stored(CHAT).await.unwrap().training_index, 5);
}

#[tokio::test]
async fn reminder_is_pushed_once_while_pending() {
    let (coach, storage) = Coach::in_memory();

    coach.callback("remind:later").await;
    let second = coach.callback("remind:later").await;
    assert_eq!(texts(&second), vec!["Хорошо, напомню позже."]);
    tokio::time::sleep(Duration::from_millis(150)).await;

    let pushed = coach.push.pushed().await;
    assert_eq!(pushed.len(), 1);
    assert!(data(&pushed[0]).contains(&"resume:yes".to_string()));
    assert!(storage.stored(CHAT).await.unwrap().last_reminder.is_some());
}

#[tokio::test]
async fn every_exchange_is_logged() {
    let (coach, _) = Coach::in_memory();

    coach.action("start").await;
    coach.text("привет").await;

    let history = coach.log.history(CHAT, 50).await.unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history[2].content, "привет");
}

// =============================================================================
// Generated content
// =============================================================================

#[tokio::test]
async fn generated_diagnostic_and_summary() {
    let provider = MockAIProvider::new()
        .with_response(
            r#"```json
{"questions":[{"question":"Как ты даёшь обратную связь?","options":["Редко","Иногда","Регулярно","Всегда"]},{"text":"Как ты планируешь?","options":["Никак","По ситуации"]}]}
```"#,
        )
        .with_response("Ты уверенно работаешь с обратной связью.");
    let coach = Coach::new(Arc::new(InMemoryProgressStorage::new()), Some(&provider));
    coach.action("sphere:it").await;

    let first = coach.action("diagnostic:start").await;
    assert!(texts(&first)[0].contains("Как ты даёшь обратную связь?"));
    // Options beyond the configured three are dropped.
    assert_eq!(data(&first), vec!["diag:0:0", "diag:0:1", "diag:0:2"]);

    coach.callback("diag:0:2").await;
    let done = coach.callback("diag:1:1").await;

    assert!(texts(&done)[0].contains("Ты уверенно работаешь с обратной связью."));
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn malformed_evaluation_falls_back_for_one_turn() {
    let provider = MockAIProvider::new()
        .with_response(r#"{"cases":["Первый кейс","Второй кейс"]}"#)
        .with_response("not json at all")
        .with_response(
            r#"{"actions":[{"type":"send_message","text":"Сильный ответ","keyboard":{"inline":[[{"text":"Дальше","data":"case:next"}]]}}]}"#,
        );
    let coach = Coach::new(Arc::new(InMemoryProgressStorage::new()), Some(&provider));
    coach.action("sphere:it").await;
    coach.action("skill:feedback").await;
    coach.text("переговоры").await;

    let heuristic = coach.text("не знаю").await;
    assert!(data(&heuristic).contains(&"case:retry".to_string()));

    let generated = coach.text("другой ответ").await;
    assert_eq!(texts(&generated), vec!["Сильный ответ"]);
    let buttons = data(&generated);
    assert!(buttons.contains(&"case:next".to_string()));
    assert!(buttons.contains(&"action:start".to_string()));
}

#[tokio::test]
async fn provider_outage_serves_catalog_content() {
    let provider = MockAIProvider::new().failing(MockError::Unavailable {
        message: "maintenance".to_string(),
    });
    let coach = Coach::new(Arc::new(InMemoryProgressStorage::new()), Some(&provider));
    coach.action("sphere:it").await;

    let question = coach.action("diagnostic:start").await;

    assert!(texts(&question)[0].starts_with("Диагностика, вопрос 1/3"));
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn progress_survives_a_restart_with_file_storage() {
    let dir = tempfile::tempdir().unwrap();

    let coach = Coach::new(Arc::new(FileProgressStorage::new(dir.path())), None);
    coach.action("sphere:sales").await;
    coach.action("diagnostic:start").await;
    coach.callback("diag:0:1").await;
    drop(coach);

    let restarted = Coach::new(Arc::new(FileProgressStorage::new(dir.path())), None);
    let actions = restarted.callback("diag:1:0").await;

    assert!(texts(&actions)[0].starts_with("Диагностика, вопрос 3/3"));
}

#[tokio::test]
async fn failing_saves_keep_the_dialogue_going() {
    let (coach, storage) = Coach::in_memory();
    storage.set_fail_saves(true);

    coach.action("sphere:it").await;
    let question = coach.action("diagnostic:start").await;

    assert!(texts(&question)[0].starts_with("Диагностика, вопрос 1/3"));
    assert!(storage.stored(CHAT).await.is_none());
}

#[tokio::test]
async fn failing_loads_fail_the_event() {
    let (coach, storage) = Coach::in_memory();
    storage.set_fail_loads(true);

    let result = coach
        .handler
        .handle(IngestCommand::new(InboundEvent::action(CHAT, "start")))
        .await;

    assert!(matches!(result, Err(IngestError::Engine(_))));
}

//! skill-coach server binary.
//!
//! Loads configuration from the environment, wires adapters into the
//! application layer and serves the HTTP API until Ctrl-C.

use std::error::Error;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use skill_coach::adapters::ai::{LlmContentGenerator, OpenAIConfig, OpenAIProvider};
use skill_coach::adapters::http::{router, CoachingHandlers, PracticeHandlers};
use skill_coach::adapters::push::HttpReminderPush;
use skill_coach::adapters::storage::{
    FileMessageLog, FileProgressStorage, FileSessionStorage, InMemoryMessageLog,
    InMemoryProgressStorage, InMemorySessionStorage,
};
use skill_coach::application::{
    AnswerEvaluator, ContentLimits, ContentProvider, DialogueEngine, GetConversationSummaryHandler,
    GetHistoryHandler, GetPracticeProgressHandler, GetPracticeSessionHandler, IngestEventHandler,
    ListPracticeSessionsHandler, ProgressStore, ReminderDispatcher, ReplayGuard,
    StartPracticeHandler, SubmitPracticeAnswerHandler,
};
use skill_coach::config::{AppConfig, StorageBackend};
use skill_coach::domain::coaching::{AnswerHeuristics, Catalog};
use skill_coach::domain::practice::SkillLibrary;
use skill_coach::ports::{
    AIProvider, ContentGenerator, MessageLog, PracticeSessionStorage, ProgressStorage,
    ReminderPush,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let catalog = Arc::new(match &config.training.catalog_path {
        Some(path) => {
            info!(path = %path, "Loading catalog");
            Catalog::from_yaml_file(path)?
        }
        None => Catalog::builtin(),
    });

    let library = Arc::new(match &config.training.skill_library_path {
        Some(path) => {
            info!(path = %path, "Loading skill library");
            SkillLibrary::from_yaml_file(path)?
        }
        None => SkillLibrary::builtin(),
    });

    let (progress_storage, message_log, practice_sessions): (
        Arc<dyn ProgressStorage>,
        Arc<dyn MessageLog>,
        Arc<dyn PracticeSessionStorage>,
    ) = match config.storage.backend {
        StorageBackend::File => (
            Arc::new(FileProgressStorage::new(config.storage.progress_dir())),
            Arc::new(FileMessageLog::new(config.storage.messages_dir())),
            Arc::new(FileSessionStorage::new(config.storage.sessions_dir())),
        ),
        StorageBackend::Memory => {
            warn!("In-memory storage: progress is lost on restart");
            (
                Arc::new(InMemoryProgressStorage::new()),
                Arc::new(InMemoryMessageLog::new()),
                Arc::new(InMemorySessionStorage::new()),
            )
        }
    };

    let generator: Option<Arc<dyn ContentGenerator>> = match OpenAIConfig::from_settings(&config.ai)
    {
        Some(ai_config) => {
            let provider = OpenAIProvider::new(ai_config)?;
            let provider_info = provider.provider_info();
            info!(
                provider = %provider_info.name,
                model = %provider_info.model,
                "Content generation enabled"
            );
            Some(Arc::new(LlmContentGenerator::new(
                Arc::new(provider),
                config.ai.temperature,
            )))
        }
        None => {
            info!("No AI key configured, using static content and heuristics");
            None
        }
    };

    let push: Option<Arc<dyn ReminderPush>> = match config.reminder.push_url() {
        Some(url) => Some(Arc::new(HttpReminderPush::new(
            url,
            config.reminder.push_token.clone(),
        )?)),
        None => None,
    };

    let store = Arc::new(ProgressStore::new(progress_storage));
    let content = ContentProvider::new(
        generator.clone(),
        catalog,
        ContentLimits {
            diagnostic_questions: config.ai.diagnostic_questions,
            options_per_question: config.ai.options_per_question,
            training_cases: config.ai.training_cases,
        },
    );
    let evaluator = AnswerEvaluator::new(
        generator.clone(),
        AnswerHeuristics::new(
            config.training.positive_keywords_list(),
            config.training.good_score,
            config.training.long_answer_words,
        ),
    );
    let reminders = ReminderDispatcher::new(
        push,
        store.clone(),
        config.reminder.delay(),
        config.reminder.at_most_one_pending,
    );
    let engine = DialogueEngine::new(
        store,
        Arc::new(content),
        Arc::new(evaluator),
        Arc::new(reminders),
    );

    let coaching = CoachingHandlers::new(
        Arc::new(IngestEventHandler::new(
            Arc::new(engine),
            ReplayGuard::new(config.training.replay_cache_size),
            message_log.clone(),
        )),
        Arc::new(GetHistoryHandler::new(message_log.clone())),
        Arc::new(GetConversationSummaryHandler::new(message_log.clone())),
    );
    let practice = PracticeHandlers::new(
        library.clone(),
        Arc::new(StartPracticeHandler::new(
            library.clone(),
            generator.clone(),
            practice_sessions.clone(),
            message_log.clone(),
        )),
        Arc::new(SubmitPracticeAnswerHandler::new(
            library.clone(),
            generator,
            practice_sessions.clone(),
            message_log,
        )),
        Arc::new(GetPracticeProgressHandler::new(practice_sessions.clone())),
        Arc::new(ListPracticeSessionsHandler::new(practice_sessions.clone())),
        Arc::new(GetPracticeSessionHandler::new(library, practice_sessions)),
    );
    let app = router(coaching, practice, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, environment = ?config.server.environment, "skill-coach listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shut down");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if config.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Ctrl-C received, draining connections");
}

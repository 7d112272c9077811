//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! The dialogue engine decides what to answer; the handlers wrap it with
//! per-conversation ordering, replay protection and the message log.

mod answer_evaluator;
mod content_provider;
mod conversation_locks;
pub mod dialogue;
pub mod handlers;
mod progress_store;
mod reminder_dispatcher;
mod replay_guard;

pub use answer_evaluator::{AnswerContext, AnswerEvaluator, Evaluation, EvaluationSource};
pub use content_provider::{ContentLimits, ContentProvider};
pub use conversation_locks::ConversationLocks;
pub use dialogue::{DialogueEngine, EngineError, EngineResult};
pub use handlers::{
    GetConversationSummaryHandler, GetConversationSummaryQuery, GetHistoryHandler, GetHistoryQuery,
    GetPracticeProgressHandler, GetPracticeSessionHandler, IngestCommand, IngestError,
    IngestEventHandler, IngestResult, ListPracticeSessionsHandler, ListPracticeSessionsQuery,
    PracticeError, PracticeFeedback, PracticeProgressReport, PracticeSessionDetail,
    StartPracticeCommand, StartPracticeHandler, StartedPractice, SubmitPracticeAnswerCommand,
    SubmitPracticeAnswerHandler,
};
pub use progress_store::{Mutation, ProgressStore, StoreError};
pub use reminder_dispatcher::{ReminderDispatcher, ScheduleOutcome};
pub use replay_guard::ReplayGuard;

//! Command and query handlers.

pub mod coaching;
pub mod practice;

pub use coaching::{
    GetConversationSummaryHandler, GetConversationSummaryQuery, GetHistoryHandler, GetHistoryQuery,
    IngestCommand, IngestError, IngestEventHandler, IngestResult,
};
pub use practice::{
    GetPracticeProgressHandler, GetPracticeSessionHandler, ListPracticeSessionsHandler,
    ListPracticeSessionsQuery, PracticeError, PracticeFeedback, PracticeProgressReport,
    PracticeSessionDetail, StartPracticeCommand, StartPracticeHandler, StartedPractice,
    SubmitPracticeAnswerCommand, SubmitPracticeAnswerHandler,
};

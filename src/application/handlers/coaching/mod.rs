//! Coaching handlers.

mod get_history;
mod ingest_event;

pub use get_history::{
    GetConversationSummaryHandler, GetConversationSummaryQuery, GetHistoryHandler, GetHistoryQuery,
};
pub use ingest_event::{IngestCommand, IngestError, IngestEventHandler, IngestResult};

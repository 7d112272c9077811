//! Coaching domain: conversation progress, commands, output actions and the
//! static content that backs the dialogue.

mod action;
mod catalog;
mod command;
mod dedup;
mod event;
mod heuristics;
mod progress;
pub mod replies;

pub use action::{Button, Keyboard, OutputAction, SendMessage, DEFAULT_PARSE_MODE};
pub use catalog::{Catalog, CatalogEntry, CatalogError};
pub use command::{ActionCommand, CallbackCommand};
pub use dedup::dedup_actions;
pub use event::{EventKind, EventUser, InboundEvent};
pub use heuristics::{interpret_diagnostic, AnswerHeuristics, Verdict, DEFAULT_POSITIVE_KEYWORDS};
pub use progress::{
    AnswerOutcome, ConversationProgress, DiagnosticQuestion, DEFAULT_SKILL, DEFAULT_SPHERE,
};

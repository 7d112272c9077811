//! Foundation module - Shared domain primitives.
//!
//! Identifiers and time values used across the coaching domain.

mod ids;
mod timestamp;

pub use ids::{ChatId, EventId, SessionId};
pub use timestamp::Timestamp;

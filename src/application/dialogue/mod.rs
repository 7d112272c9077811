//! Dialogue orchestration.
//!
//! [`DialogueEngine::handle`] dispatches on the event kind; the handlers for
//! each kind live in their own module.

mod action_events;
mod callback_events;
mod engine;
mod text_events;

pub use engine::{DialogueEngine, EngineError, EngineResult};

//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (identifiers, timestamps)
//! - `coaching` - Conversation progress, command grammar, output actions,
//!   static catalog, answer heuristics and action de-duplication
//! - `practice` - Skill library, practice sessions and answer scoring
//!
//! Nothing in this layer performs I/O.

pub mod coaching;
pub mod foundation;
pub mod practice;

//! Adapters - Implementations of port interfaces.
//!
//! - `ai` - OpenAI-compatible provider, mock provider and the LLM content generator
//! - `http` - axum router for event ingestion and history
//! - `push` - Reminder delivery to the transport
//! - `storage` - File and in-memory progress storage and message logs

pub mod ai;
pub mod http;
pub mod push;
pub mod storage;

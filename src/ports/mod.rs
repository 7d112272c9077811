//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the coaching logic and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `ProgressStorage` - Durable per-conversation progress
//! - `MessageLog` - Conversation history
//! - `PracticeSessionStorage` - Skill practice sessions
//!
//! ## AI Ports
//!
//! - `AIProvider` - Raw chat-completion backend
//! - `ContentGenerator` - Questions, cases, summaries and feedback built on a provider
//!
//! ## Delivery Ports
//!
//! - `ReminderPush` - Deferred reminder delivery to the transport

mod ai_provider;
mod content_generator;
mod message_log;
mod progress_storage;
mod reminder_push;
mod session_storage;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, RequestPurpose, TokenUsage,
};
pub use content_generator::{ContentGenerator, GenerationContext, GenerationResult};
pub use message_log::{
    ConversationSummary, LoggedMessage, MessageLog, Speaker, DEFAULT_HISTORY_LIMIT,
};
pub use progress_storage::{ProgressStorage, StorageError};
pub use reminder_push::{PushError, ReminderPush};
pub use session_storage::PracticeSessionStorage;

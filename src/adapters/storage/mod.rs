//! Storage Adapters
//!
//! Implementations of the `ProgressStorage`, `MessageLog` and
//! `PracticeSessionStorage` ports.
//!
//! ## Available Adapters
//!
//! - **FileProgressStorage** - One YAML document per conversation
//! - **InMemoryProgressStorage** - Progress in memory (testing/development)
//! - **FileMessageLog** - JSON lines per conversation
//! - **InMemoryMessageLog** - History in memory (testing/development)
//! - **FileSessionStorage** - One YAML document per practice session
//! - **InMemorySessionStorage** - Practice sessions in memory
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileProgressStorage, FileMessageLog};
//!
//! let progress = FileProgressStorage::new("./data/progress");
//! let messages = FileMessageLog::new("./data/messages");
//! ```

mod file_message_log;
mod file_progress_storage;
mod file_session_storage;
mod in_memory_message_log;
mod in_memory_progress_storage;
mod in_memory_session_storage;

pub use file_message_log::FileMessageLog;
pub use file_progress_storage::FileProgressStorage;
pub use file_session_storage::FileSessionStorage;
pub use in_memory_message_log::InMemoryMessageLog;
pub use in_memory_progress_storage::InMemoryProgressStorage;
pub use in_memory_session_storage::InMemorySessionStorage;

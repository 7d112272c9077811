//! File-based Message Log Adapter
//!
//! Appends one JSON object per line to `<base>/<chat_id>.jsonl`.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::foundation::ChatId;
use crate::ports::{ConversationSummary, LoggedMessage, MessageLog, StorageError};

/// JSON-lines conversation history on disk
#[derive(Debug, Clone)]
pub struct FileMessageLog {
    base_path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileMessageLog {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn file_path(&self, chat_id: ChatId) -> PathBuf {
        self.base_path.join(format!("{chat_id}.jsonl"))
    }

    async fn read_all(&self, chat_id: ChatId) -> Result<Vec<LoggedMessage>, StorageError> {
        let raw = match fs::read_to_string(self.file_path(chat_id)).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::IoError(e.to_string())),
        };

        let messages = raw
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str(line) {
                Ok(message) => Some(message),
                Err(e) => {
                    warn!(chat_id = %chat_id, error = %e, "Skipping unreadable history line");
                    None
                }
            })
            .collect();

        Ok(messages)
    }
}

#[async_trait]
impl MessageLog for FileMessageLog {
    async fn append(&self, message: LoggedMessage) -> Result<(), StorageError> {
        let mut line = serde_json::to_string(&message)
            .map_err(|e| StorageError::SerializationFailed(e.to_string()))?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.file_path(message.chat_id))
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        Ok(())
    }

    async fn history(
        &self,
        chat_id: ChatId,
        limit: usize,
    ) -> Result<Vec<LoggedMessage>, StorageError> {
        let mut messages = self.read_all(chat_id).await?;
        let start = messages.len().saturating_sub(limit);
        Ok(messages.split_off(start))
    }

    async fn summary(&self, chat_id: ChatId) -> Result<ConversationSummary, StorageError> {
        let messages = self.read_all(chat_id).await?;
        Ok(ConversationSummary::from_messages(chat_id, &messages))
    }
}

//! File-based Progress Storage Adapter
//!
//! Stores each conversation's progress as one YAML document under
//! `<base>/<chat_id>.yaml`. Writes go through a temporary file and a rename
//! so a crash never leaves a half-written record.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::coaching::ConversationProgress;
use crate::domain::foundation::ChatId;
use crate::ports::{ProgressStorage, StorageError};

/// File-based storage for conversation progress
#[derive(Debug, Clone)]
pub struct FileProgressStorage {
    base_path: PathBuf,
}

impl FileProgressStorage {
    /// Create a new file storage with a base directory
    ///
    /// # Example
    /// ```ignore
    /// let storage = FileProgressStorage::new("./data/progress");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn file_path(&self, chat_id: ChatId) -> PathBuf {
        self.base_path.join(format!("{chat_id}.yaml"))
    }

    async fn ensure_dir(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))
    }
}

#[async_trait]
impl ProgressStorage for FileProgressStorage {
    async fn load(&self, chat_id: ChatId) -> Result<Option<ConversationProgress>, StorageError> {
        let yaml = match fs::read_to_string(self.file_path(chat_id)).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::IoError(e.to_string())),
        };

        let progress = serde_yaml::from_str(&yaml)
            .map_err(|e| StorageError::DeserializationFailed(e.to_string()))?;

        Ok(Some(progress))
    }

    async fn save(
        &self,
        chat_id: ChatId,
        progress: &ConversationProgress,
    ) -> Result<(), StorageError> {
        self.ensure_dir().await?;

        let yaml = serde_yaml::to_string(progress)
            .map_err(|e| StorageError::SerializationFailed(e.to_string()))?;

        let path = self.file_path(chat_id);
        let tmp = path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        Ok(())
    }
}

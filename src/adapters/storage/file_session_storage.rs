//! File-based Practice Session Storage Adapter
//!
//! One YAML document per session under `<base>/<session_id>.yaml`, written
//! through a temporary file and a rename. Listing a chat's sessions reads
//! the whole directory.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

use crate::domain::foundation::{ChatId, SessionId};
use crate::domain::practice::PracticeSession;
use crate::ports::{PracticeSessionStorage, StorageError};

#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    base_path: PathBuf,
}

impl FileSessionStorage {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn file_path(&self, id: SessionId) -> PathBuf {
        self.base_path.join(format!("{id}.yaml"))
    }

    async fn read(path: &Path) -> Result<Option<PracticeSession>, StorageError> {
        let yaml = match fs::read_to_string(path).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::IoError(e.to_string())),
        };
        serde_yaml::from_str(&yaml)
            .map(Some)
            .map_err(|e| StorageError::DeserializationFailed(e.to_string()))
    }
}

#[async_trait]
impl PracticeSessionStorage for FileSessionStorage {
    async fn save(&self, session: &PracticeSession) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        let yaml = serde_yaml::to_string(session)
            .map_err(|e| StorageError::SerializationFailed(e.to_string()))?;

        let path = self.file_path(session.id);
        let tmp = path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))
    }

    async fn get(&self, id: SessionId) -> Result<Option<PracticeSession>, StorageError> {
        Self::read(&self.file_path(id)).await
    }

    async fn list(&self, chat_id: ChatId) -> Result<Vec<PracticeSession>, StorageError> {
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::IoError(e.to_string())),
        };

        let mut sessions = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            match Self::read(&path).await {
                Ok(Some(session)) if session.chat_id == chat_id => sessions.push(session),
                Ok(_) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable session"),
            }
        }
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::practice::{FeedbackSource, ScoredFeedback};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_saved_session_survives_a_new_adapter() {
        let temp_dir = TempDir::new().unwrap();
        let mut session = PracticeSession::start(ChatId::new(5), "management", "feedback", "ситуация");
        session.record_answer("ответ", ScoredFeedback::new(6, "хорошо"), FeedbackSource::Generated);

        FileSessionStorage::new(temp_dir.path()).save(&session).await.unwrap();
        let loaded = FileSessionStorage::new(temp_dir.path())
            .get(session.id)
            .await
            .unwrap();

        assert_eq!(loaded, Some(session));
    }

    #[tokio::test]
    async fn test_list_filters_by_chat_and_skips_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileSessionStorage::new(temp_dir.path());
        let mine = PracticeSession::start(ChatId::new(1), "b", "s", "mine");
        storage.save(&mine).await.unwrap();
        storage
            .save(&PracticeSession::start(ChatId::new(2), "b", "s", "theirs"))
            .await
            .unwrap();
        std::fs::write(temp_dir.path().join("broken.yaml"), "id: [").unwrap();

        let listed = storage.list(ChatId::new(1)).await.unwrap();

        assert_eq!(listed, vec![mine]);
    }

    #[tokio::test]
    async fn test_missing_directory_lists_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileSessionStorage::new(temp_dir.path().join("absent"));

        assert!(storage.list(ChatId::new(1)).await.unwrap().is_empty());
        assert_eq!(storage.get(SessionId::new()).await.unwrap(), None);
    }
}

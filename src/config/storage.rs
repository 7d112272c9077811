//! Durable storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Which adapter backs the progress store, message log and practice sessions.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Root directory for file-backed storage
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl StorageConfig {
    pub fn progress_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("progress")
    }

    pub fn messages_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("messages")
    }

    pub fn sessions_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("sessions")
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == StorageBackend::File && self.data_dir.trim().is_empty() {
            return Err(ValidationError::EmptyDataDir);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> String {
    "./data".to_string()
}

//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SKILL_COACH` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment yields a working
//! heuristic-only coach with file storage under `./data`.
//!
//! # Example
//!
//! ```no_run
//! use skill_coach::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod ai;
mod error;
mod reminder;
mod server;
mod storage;
mod training;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use reminder::ReminderConfig;
pub use server::{Environment, ServerConfig};
pub use storage::{StorageBackend, StorageConfig};
pub use training::TrainingConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Chat completion backend used for content generation and evaluation
    #[serde(default)]
    pub ai: AiConfig,

    /// Durable progress and message log storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Deferred reminder pushes
    #[serde(default)]
    pub reminder: ReminderConfig,

    /// Heuristic scoring, catalog override and replay cache
    #[serde(default)]
    pub training: TrainingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variable Format
    ///
    /// - `SKILL_COACH__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `SKILL_COACH__AI__API_KEY=...` -> `ai.api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SKILL_COACH")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.storage.validate()?;
        self.reminder.validate()?;
        self.training.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const KEYS: &[&str] = &[
        "SKILL_COACH__SERVER__PORT",
        "SKILL_COACH__SERVER__ENVIRONMENT",
        "SKILL_COACH__AI__API_KEY",
        "SKILL_COACH__AI__TEMPERATURE",
        "SKILL_COACH__STORAGE__BACKEND",
        "SKILL_COACH__REMINDER__PUSH_URL",
        "SKILL_COACH__REMINDER__DELAY_SECS",
        "SKILL_COACH__TRAINING__POSITIVE_KEYWORDS",
        "SKILL_COACH__TRAINING__SKILL_LIBRARY_PATH",
    ];

    fn clear_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_with_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config.server.port, 8000);
        assert!(!config.ai.is_enabled());
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert!(config.reminder.push_url().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_nested_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("SKILL_COACH__SERVER__PORT", "3000");
        env::set_var("SKILL_COACH__AI__API_KEY", "sk-test");
        env::set_var("SKILL_COACH__STORAGE__BACKEND", "memory");
        env::set_var("SKILL_COACH__REMINDER__PUSH_URL", "http://frontend/push");
        env::set_var("SKILL_COACH__REMINDER__DELAY_SECS", "5");
        env::set_var("SKILL_COACH__TRAINING__POSITIVE_KEYWORDS", "alpha,beta");
        env::set_var("SKILL_COACH__TRAINING__SKILL_LIBRARY_PATH", "/etc/coach/skills.yaml");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.ai.is_enabled());
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.reminder.push_url(), Some("http://frontend/push"));
        assert_eq!(config.reminder.delay_secs, 5);
        assert_eq!(config.training.positive_keywords_list(), vec!["alpha", "beta"]);
        assert_eq!(
            config.training.skill_library_path.as_deref(),
            Some("/etc/coach/skills.yaml")
        );
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("SKILL_COACH__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().is_production());
    }

    #[test]
    fn test_validate_reports_bad_section() {
        let mut config = AppConfig::default();
        config.ai.temperature = -1.0;
        assert_eq!(config.validate(), Err(ValidationError::InvalidTemperature));
    }
}

//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("AI temperature must be within 0.0..=2.0")]
    InvalidTemperature,

    #[error("Count '{0}' must be greater than zero")]
    ZeroCount(&'static str),

    #[error("Invalid AI base URL")]
    InvalidAiBaseUrl,

    #[error("Reminder push URL must use http or https")]
    InvalidPushUrl,

    #[error("Data directory must not be empty for file storage")]
    EmptyDataDir,
}

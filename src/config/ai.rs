//! AI generator configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Configuration of the OpenAI-compatible chat completion backend.
///
/// The backend is optional: without an API key the content provider serves
/// the static catalog and answers are scored heuristically.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Bearer key for the completion endpoint
    pub api_key: Option<String>,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL; `/chat/completions` is appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Number of diagnostic questions requested from the generator
    #[serde(default = "default_diagnostic_questions")]
    pub diagnostic_questions: usize,

    /// Options kept per generated diagnostic question
    #[serde(default = "default_options_per_question")]
    pub options_per_question: usize,

    /// Number of training cases requested from the generator
    #[serde(default = "default_training_cases")]
    pub training_cases: usize,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// True when an API key is configured
    pub fn is_enabled(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.diagnostic_questions == 0 {
            return Err(ValidationError::ZeroCount("ai.diagnostic_questions"));
        }
        if self.options_per_question == 0 {
            return Err(ValidationError::ZeroCount("ai.options_per_question"));
        }
        if self.training_cases == 0 {
            return Err(ValidationError::ZeroCount("ai.training_cases"));
        }
        if self.is_enabled()
            && !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://"))
        {
            return Err(ValidationError::InvalidAiBaseUrl);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            temperature: default_temperature(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            diagnostic_questions: default_diagnostic_questions(),
            options_per_question: default_options_per_question(),
            training_cases: default_training_cases(),
        }
    }
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_timeout() -> u64 {
    60
}

fn default_retries() -> u32 {
    1
}

fn default_diagnostic_questions() -> usize {
    3
}

fn default_options_per_question() -> usize {
    3
}

fn default_training_cases() -> usize {
    10
}

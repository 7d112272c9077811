//! Reminder push configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Configuration for deferred reminder pushes to the chat front end.
#[derive(Debug, Clone, Deserialize)]
pub struct ReminderConfig {
    /// Front-end endpoint accepting `{actions: [...]}`; reminders are skipped when unset
    pub push_url: Option<String>,

    /// Optional bearer token sent with each push
    pub push_token: Option<String>,

    /// Delay before the reminder fires
    #[serde(default = "default_delay")]
    pub delay_secs: u64,

    /// Keep at most one pending reminder per conversation
    #[serde(default = "default_at_most_one_pending")]
    pub at_most_one_pending: bool,
}

impl ReminderConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }

    /// Push URL, ignoring blank values
    pub fn push_url(&self) -> Option<&str> {
        self.push_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(url) = self.push_url() {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ValidationError::InvalidPushUrl);
            }
        }
        Ok(())
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            push_url: None,
            push_token: None,
            delay_secs: default_delay(),
            at_most_one_pending: default_at_most_one_pending(),
        }
    }
}

fn default_delay() -> u64 {
    300
}

fn default_at_most_one_pending() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reminder_defaults() {
        let config = ReminderConfig::default();
        assert_eq!(config.delay(), Duration::from_secs(300));
        assert!(config.push_url().is_none());
        assert!(config.at_most_one_pending);
    }

    #[test]
    fn test_blank_push_url_is_unset() {
        let config = ReminderConfig {
            push_url: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(config.push_url().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_push_url_scheme_is_checked() {
        let config = ReminderConfig {
            push_url: Some("tcp://frontend".to_string()),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPushUrl));
    }
}

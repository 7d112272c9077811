//! HTTP Reminder Push - delivers reminder actions to the chat transport.
//!
//! Posts `{"actions":[...]}` to the configured push URL, optionally with a
//! bearer token.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use std::time::Duration;

use crate::domain::coaching::OutputAction;
use crate::ports::{PushError, ReminderPush};

#[derive(Serialize)]
struct PushBody<'a> {
    actions: &'a [OutputAction],
}

/// Pushes reminder actions over HTTP.
pub struct HttpReminderPush {
    client: Client,
    url: String,
    token: Option<Secret<String>>,
}

impl HttpReminderPush {
    pub fn new(url: impl Into<String>, token: Option<String>) -> Result<Self, PushError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| PushError::Network(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            token: token.filter(|t| !t.is_empty()).map(Secret::new),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ReminderPush for HttpReminderPush {
    async fn push(&self, actions: Vec<OutputAction>) -> Result<(), PushError> {
        let mut request = self.client.post(&self.url).json(&PushBody { actions: &actions });
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| PushError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(PushError::Status(status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::coaching::SendMessage;
    use crate::domain::foundation::ChatId;

    #[test]
    fn body_wraps_actions() {
        let actions: Vec<OutputAction> = vec![SendMessage::new(ChatId::new(3), "Напоминание").into()];

        let body = serde_json::to_value(PushBody { actions: &actions }).unwrap();

        assert_eq!(body["actions"][0]["type"], "send_message");
        assert_eq!(body["actions"][0]["chat_id"], 3);
    }

    #[test]
    fn empty_token_is_ignored() {
        let push = HttpReminderPush::new("http://localhost/push", Some(String::new())).unwrap();
        assert!(push.token.is_none());
        assert_eq!(push.url(), "http://localhost/push");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_network_error() {
        let push = HttpReminderPush::new("http://127.0.0.1:9/push", None).unwrap();

        let err = push.push(Vec::new()).await.unwrap_err();

        assert!(matches!(err, PushError::Network(_)));
    }
}

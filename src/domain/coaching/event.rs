//! Inbound events from the chat transport.

use serde_json::Value;

use crate::domain::foundation::{ChatId, EventId};

/// Kind of inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A named menu action (`/start`, a menu entry).
    Action,
    /// A button press carrying callback data.
    Callback,
    /// Free text typed (or transcribed) by the user.
    Text,
    /// Anything else; answered with a generic acknowledgment.
    Unknown(String),
}

impl EventKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "action" => Self::Action,
            "callback" => Self::Callback,
            "text" => Self::Text,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Action => "action",
            Self::Callback => "callback",
            Self::Text => "text",
            Self::Unknown(raw) => raw,
        }
    }
}

/// Sender of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventUser {
    pub user_id: Option<i64>,
    pub chat_id: ChatId,
    pub username: Option<String>,
}

/// One event to be answered by the dialogue engine.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub event_id: EventId,
    pub user: EventUser,
    pub kind: EventKind,
    pub text: Option<String>,
    pub data: Option<String>,
    pub action: Option<String>,
    pub meta: Option<Value>,
}

impl InboundEvent {
    /// Event of the given kind for a chat, with a fresh id and no payload.
    pub fn new(chat_id: ChatId, kind: EventKind) -> Self {
        Self {
            event_id: EventId::new(),
            user: EventUser {
                user_id: None,
                chat_id,
                username: None,
            },
            kind,
            text: None,
            data: None,
            action: None,
            meta: None,
        }
    }

    pub fn action(chat_id: ChatId, name: impl Into<String>) -> Self {
        Self {
            action: Some(name.into()),
            ..Self::new(chat_id, EventKind::Action)
        }
    }

    pub fn callback(chat_id: ChatId, data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
            ..Self::new(chat_id, EventKind::Callback)
        }
    }

    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(chat_id, EventKind::Text)
        }
    }

    pub fn with_event_id(mut self, event_id: EventId) -> Self {
        self.event_id = event_id;
        self
    }

    pub fn chat_id(&self) -> ChatId {
        self.user.chat_id
    }

    /// The field the kind routes on: the action name, callback data or text.
    /// `None` for unknown kinds and for events missing that field.
    pub fn payload(&self) -> Option<&str> {
        match self.kind {
            EventKind::Action => self.action.as_deref(),
            EventKind::Callback => self.data.as_deref(),
            EventKind::Text => self.text.as_deref(),
            EventKind::Unknown(_) => None,
        }
    }

    /// What the user sent: text, else callback data, else action name.
    pub fn user_content(&self) -> Option<&str> {
        [&self.text, &self.data, &self.action]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.is_empty())
    }
}

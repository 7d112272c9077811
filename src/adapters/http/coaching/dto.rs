//! HTTP DTOs for the coaching endpoints.
//!
//! The ingest payload is lenient: every field except the chat id has a
//! default and mistyped values are dropped, so partial or odd transport
//! payloads still get an answer.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::coaching::{EventKind, EventUser, InboundEvent, OutputAction};
use crate::domain::foundation::{ChatId, EventId};
use crate::ports::{ConversationSummary, LoggedMessage};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /ingest`.
///
/// Values of the wrong JSON type are dropped rather than rejected; an event
/// that ends up without a usable type is acknowledged by the engine.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestPayload {
    #[serde(default, deserialize_with = "lenient_id")]
    pub event_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub telegram_update_id: Option<i64>,
    pub user: UserDto,
    #[serde(default, deserialize_with = "lenient_event")]
    pub event: EventDto,
    #[serde(default)]
    pub meta: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserDto {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub user_id: Option<i64>,
    pub chat_id: ChatId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventDto {
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub data: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub action: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|v| v.as_i64()))
}

/// Event ids arrive as strings or numbers.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_event<'de, D>(deserializer: D) -> Result<EventDto, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(EventDto::deserialize(value).unwrap_or_default())
}

impl From<IngestPayload> for InboundEvent {
    fn from(payload: IngestPayload) -> Self {
        let event_id = payload
            .event_id
            .map(EventId::from_string)
            .unwrap_or_default();
        InboundEvent {
            event_id,
            user: EventUser {
                user_id: payload.user.user_id,
                chat_id: payload.user.chat_id,
                username: payload.user.username,
            },
            kind: EventKind::parse(payload.event.kind.as_deref().unwrap_or_default()),
            text: payload.event.text,
            data: payload.event.data,
            action: payload.event.action,
            meta: payload.meta,
        }
    }
}

/// Query parameters for the history endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryParams {
    #[serde(default)]
    pub limit: Option<usize>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct IngestResponse {
    pub actions: Vec<OutputAction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationsResponse {
    pub conversations: Vec<ConversationSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub messages: Vec<LoggedMessage>,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            code: "SERVICE_UNAVAILABLE".to_string(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            code: "FORBIDDEN".to_string(),
            message: message.into(),
        }
    }
}

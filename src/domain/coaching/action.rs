//! Output actions returned to the chat transport.
//!
//! The transport understands `send_message`; anything else is passed through
//! untouched as raw JSON so actions produced by a generator are never lost.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::domain::foundation::ChatId;

/// Markup mode for message text (b, i, code, ul, li).
pub const DEFAULT_PARSE_MODE: &str = "HTML";

fn default_parse_mode() -> String {
    DEFAULT_PARSE_MODE.to_string()
}

/// One inline button. `data` follows the command grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub text: String,
    #[serde(default, alias = "callback_data")]
    pub data: String,
}

impl Button {
    pub fn new(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            data: data.into(),
        }
    }
}

/// Inline keyboard: rows of buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
    #[serde(default)]
    pub inline: Vec<Vec<Button>>,
}

impl Keyboard {
    /// Keyboard with one button per row.
    pub fn column(buttons: impl IntoIterator<Item = Button>) -> Self {
        Self {
            inline: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Button>) {
        self.inline.push(row);
    }

    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.inline.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons().next().is_none()
    }

    /// True if any button's data starts with `prefix`.
    pub fn has_data_prefix(&self, prefix: &str) -> bool {
        self.buttons().any(|b| b.data.starts_with(prefix))
    }
}

/// A `send_message` action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessage {
    #[serde(default)]
    pub chat_id: ChatId,
    pub text: String,
    #[serde(default = "default_parse_mode")]
    pub parse_mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard: Option<Keyboard>,
}

impl SendMessage {
    pub fn new(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            parse_mode: default_parse_mode(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    /// True if the message carries at least one interactive control.
    pub fn has_controls(&self) -> bool {
        self.keyboard.as_ref().is_some_and(|k| !k.is_empty())
    }
}

/// Action emitted by the dialogue engine.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputAction {
    SendMessage(SendMessage),
    /// Any other action kind, kept verbatim.
    Other(Value),
}

impl OutputAction {
    pub const SEND_MESSAGE: &'static str = "send_message";

    pub fn as_message(&self) -> Option<&SendMessage> {
        match self {
            OutputAction::SendMessage(m) => Some(m),
            OutputAction::Other(_) => None,
        }
    }

    pub fn as_message_mut(&mut self) -> Option<&mut SendMessage> {
        match self {
            OutputAction::SendMessage(m) => Some(m),
            OutputAction::Other(_) => None,
        }
    }
}

impl From<SendMessage> for OutputAction {
    fn from(message: SendMessage) -> Self {
        OutputAction::SendMessage(message)
    }
}

#[derive(Serialize)]
struct TaggedMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    message: &'a SendMessage,
}

impl Serialize for OutputAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OutputAction::SendMessage(message) => TaggedMessage {
                kind: Self::SEND_MESSAGE,
                message,
            }
            .serialize(serializer),
            OutputAction::Other(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for OutputAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if value.get("type").and_then(Value::as_str) == Some(Self::SEND_MESSAGE) {
            let message = serde_json::from_value(value).map_err(D::Error::custom)?;
            Ok(OutputAction::SendMessage(message))
        } else {
            Ok(OutputAction::Other(value))
        }
    }
}

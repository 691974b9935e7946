//! Wire messages exchanged with the backend.
//!
//! Every frame is a JSON object discriminated by its `type` field.

use crate::error::Result;
use crate::session::MessageRole;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Client to backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// User chat input.
    Message { content: String },
    /// Command invocation; `data` is only present for `load`.
    Command {
        command: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
    },
}

impl OutboundMessage {
    /// Serializes the message to its JSON text frame.
    pub fn to_wire(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Backend to client.
///
/// Timestamps are optional on the wire; the session fills in the client
/// clock when one is missing. Text fields tolerate `null` and non-string
/// values, since `session_loaded` echoes user-supplied files unchecked.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    Init {
        #[serde(default, deserialize_with = "lenient_text")]
        content: String,
        #[serde(default, deserialize_with = "lenient_timestamp")]
        timestamp: Option<String>,
        #[serde(default)]
        rag_enabled: Option<bool>,
    },
    Response {
        #[serde(default, deserialize_with = "lenient_text")]
        content: String,
        #[serde(default, deserialize_with = "lenient_timestamp")]
        timestamp: Option<String>,
    },
    Error {
        #[serde(default, deserialize_with = "lenient_text")]
        content: String,
    },
    System {
        #[serde(default, deserialize_with = "lenient_text")]
        content: String,
        #[serde(default, deserialize_with = "lenient_timestamp")]
        timestamp: Option<String>,
    },
    RagStatus {
        #[serde(default, deserialize_with = "lenient_text")]
        content: String,
        #[serde(default, deserialize_with = "lenient_timestamp")]
        timestamp: Option<String>,
        #[serde(default)]
        enabled: Option<bool>,
    },
    SessionLoaded {
        #[serde(default, deserialize_with = "lenient_timestamp")]
        timestamp: Option<String>,
        #[serde(default)]
        session_info: Option<SessionInfo>,
        #[serde(default, deserialize_with = "lenient_list")]
        messages: Vec<LoadedMessage>,
    },
    /// Any `type` this client does not handle.
    #[serde(other)]
    Unknown,
}

impl InboundEvent {
    /// Decodes one text frame.
    pub fn decode(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Wire name of the event kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::Init { .. } => "init",
            InboundEvent::Response { .. } => "response",
            InboundEvent::Error { .. } => "error",
            InboundEvent::System { .. } => "system",
            InboundEvent::RagStatus { .. } => "rag_status",
            InboundEvent::SessionLoaded { .. } => "session_loaded",
            InboundEvent::Unknown => "unknown",
        }
    }
}

/// Metadata about a session restored by the backend.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SessionInfo {
    /// Whatever the backend echoes from the loaded file; usually a string.
    #[serde(default)]
    pub session_id: Option<Value>,
}

impl SessionInfo {
    /// The id as shown to the user, or `None` when absent, null or empty.
    pub fn display_id(&self) -> Option<String> {
        match self.session_id.as_ref()? {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }
}

/// A transcript entry carried by `session_loaded`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoadedMessage {
    #[serde(default = "unknown_role", deserialize_with = "lenient_role")]
    pub role: MessageRole,
    #[serde(default, deserialize_with = "lenient_text")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<String>,
}

const UNKNOWN_ROLE: &str = "unknown";

fn unknown_role() -> MessageRole {
    MessageRole::from(UNKNOWN_ROLE.to_string())
}

/// `null` becomes empty text, strings pass through, anything else is kept as its JSON text.
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    })
}

fn lenient_role<'de, D>(deserializer: D) -> std::result::Result<MessageRole, D::Error>
where
    D: Deserializer<'de>,
{
    let role = lenient_text(deserializer)?;
    if role.is_empty() {
        return Ok(unknown_role());
    }
    Ok(MessageRole::from(role))
}

/// Only a non-empty string counts; anything else is treated as missing.
fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(timestamp) if !timestamp.is_empty() => Ok(Some(timestamp)),
        _ => Ok(None),
    }
}

fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

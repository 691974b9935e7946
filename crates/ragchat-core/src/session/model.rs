//! Session domain model.
//!
//! The `Session` record and its two transition functions: `apply_inbound`
//! for backend events and `apply_outbound` for user actions. Neither touches
//! the network; the controller wires them to a channel.

use super::message::{ConversationMessage, MessageRole};
use crate::channel::{CHANNEL_ERROR_MESSAGE, CONNECTION_LOST_MESSAGE, ChannelEvent};
use crate::protocol::{InboundEvent, OutboundMessage};
use serde::Serialize;
use serde_json::Value;

/// Returns the current client time as an ISO 8601 string.
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Generates a session identifier: milliseconds since the Unix epoch.
pub fn generate_session_id() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

/// A user action that may produce an outbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundAction {
    /// Chat input; recorded locally with `timestamp`.
    SendMessage { content: String, timestamp: String },
    /// A named command with optional payload.
    SendCommand {
        command: String,
        data: Option<Value>,
    },
}

impl OutboundAction {
    /// Chat input stamped with the current client time.
    pub fn message(content: impl Into<String>) -> Self {
        Self::SendMessage {
            content: content.into(),
            timestamp: now_timestamp(),
        }
    }

    pub fn command(command: impl Into<String>, data: Option<Value>) -> Self {
        Self::SendCommand {
            command: command.into(),
            data,
        }
    }
}

/// Client-side state of one chat session.
///
/// A session contains:
/// - The identifier used in the channel address
/// - The transcript, append-only except for a wholesale replace on `session_loaded`
/// - Connectivity, retrieval-mode and in-flight flags
/// - The latest error, shown as a banner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    id: String,
    messages: Vec<ConversationMessage>,
    connected: bool,
    rag_enabled: bool,
    in_flight: bool,
    error: Option<String>,
}

impl Session {
    /// Creates a disconnected session with an empty transcript.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            messages: Vec::new(),
            connected: false,
            rag_enabled: true,
            in_flight: false,
            error: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn rag_enabled(&self) -> bool {
        self.rag_enabled
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a message or command may be dispatched right now.
    pub fn can_dispatch(&self) -> bool {
        self.connected && !self.in_flight
    }

    /// Sets the banner error without touching any other state.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Applies one backend event.
    pub fn apply_inbound(&mut self, event: InboundEvent) {
        match event {
            InboundEvent::Init {
                content,
                timestamp,
                rag_enabled,
            } => {
                self.connected = true;
                self.error = None;
                if let Some(enabled) = rag_enabled {
                    self.rag_enabled = enabled;
                }
                self.push(MessageRole::System, content, timestamp);
                self.in_flight = false;
            }
            InboundEvent::Response { content, timestamp } => {
                self.push(MessageRole::Assistant, content, timestamp);
                self.in_flight = false;
            }
            InboundEvent::Error { content } => {
                self.error = Some(content);
                self.in_flight = false;
            }
            InboundEvent::System { content, timestamp } => {
                self.push(MessageRole::System, content, timestamp);
                self.in_flight = false;
            }
            InboundEvent::RagStatus {
                content,
                timestamp,
                enabled,
            } => {
                if let Some(enabled) = enabled {
                    self.rag_enabled = enabled;
                }
                self.push(MessageRole::System, content, timestamp);
                self.in_flight = false;
            }
            InboundEvent::SessionLoaded {
                timestamp,
                session_info,
                messages,
            } => {
                let timestamp = timestamp.unwrap_or_else(now_timestamp);
                let loaded_id = session_info
                    .and_then(|info| info.display_id())
                    .unwrap_or_else(|| "unknown".to_string());

                let mut transcript = Vec::with_capacity(messages.len() + 1);
                transcript.push(ConversationMessage::system(
                    format!("Loaded session {}", loaded_id),
                    timestamp.clone(),
                ));
                transcript.extend(messages.into_iter().map(|msg| {
                    ConversationMessage::new(
                        msg.role,
                        msg.content,
                        msg.timestamp.unwrap_or_else(|| timestamp.clone()),
                    )
                }));

                self.messages = transcript;
                self.in_flight = false;
                self.error = None;
            }
            InboundEvent::Unknown => {
                tracing::debug!("Ignoring inbound event of unknown type");
            }
        }
    }

    /// Applies one user action, returning the message to transmit.
    ///
    /// Returns `None` (and leaves the session untouched) when disconnected,
    /// while a request is in flight, or for blank chat input.
    pub fn apply_outbound(&mut self, action: OutboundAction) -> Option<OutboundMessage> {
        if !self.can_dispatch() {
            return None;
        }

        let outbound = match action {
            OutboundAction::SendMessage { content, timestamp } => {
                if content.trim().is_empty() {
                    return None;
                }
                self.messages.push(ConversationMessage::new(
                    MessageRole::User,
                    content.clone(),
                    timestamp,
                ));
                OutboundMessage::Message { content }
            }
            OutboundAction::SendCommand { command, data } => {
                OutboundMessage::Command { command, data }
            }
        };

        self.in_flight = true;
        self.error = None;
        Some(outbound)
    }

    /// Applies a channel lifecycle event.
    ///
    /// Returns the decoded inbound event for `MessageReceived` so the caller
    /// can observe what was applied.
    pub fn apply_channel_event(&mut self, event: ChannelEvent) -> Option<InboundEvent> {
        match event {
            ChannelEvent::Opened => {
                self.connected = true;
                self.error = None;
                None
            }
            ChannelEvent::Closed => {
                self.connected = false;
                self.error = Some(CONNECTION_LOST_MESSAGE.to_string());
                self.in_flight = false;
                None
            }
            ChannelEvent::Errored(detail) => {
                tracing::warn!("Channel error: {}", detail);
                self.error = Some(CHANNEL_ERROR_MESSAGE.to_string());
                self.in_flight = false;
                None
            }
            ChannelEvent::MessageReceived(payload) => match InboundEvent::decode(&payload) {
                Ok(inbound) => {
                    tracing::debug!("Applying inbound '{}' event", inbound.kind());
                    self.apply_inbound(inbound.clone());
                    Some(inbound)
                }
                Err(e) => {
                    tracing::warn!("Dropping undecodable frame: {}", e);
                    None
                }
            },
        }
    }

    fn push(&mut self, role: MessageRole, content: String, timestamp: Option<String>) {
        self.messages.push(ConversationMessage::new(
            role,
            content,
            timestamp.unwrap_or_else(now_timestamp),
        ));
    }
}

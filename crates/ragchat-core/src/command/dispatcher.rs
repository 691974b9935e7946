use super::builtin::LOAD;
use crate::channel::Channel;
use crate::session::{OutboundAction, Session};
use serde_json::Value;
use std::path::Path;

/// Banner text when a session file is not valid JSON.
pub const INVALID_SESSION_FILE: &str = "Invalid session file format";

/// What happened to a dispatch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The message was handed to the channel.
    Sent,
    /// Disconnected, already in flight, or blank input. Nothing changed.
    Skipped,
    /// A local error was recorded instead of sending.
    Rejected,
}

impl DispatchOutcome {
    pub fn is_sent(self) -> bool {
        self == DispatchOutcome::Sent
    }
}

/// Turns user actions into outbound protocol messages on a channel.
///
/// Command names are forwarded verbatim; their meaning belongs to the
/// backend. Every path goes through `Session::apply_outbound`, so the
/// connectivity and in-flight gate is shared with chat input.
pub struct CommandDispatcher<C: Channel> {
    channel: C,
}

impl<C: Channel> CommandDispatcher<C> {
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Sends chat input, recording it in the transcript first.
    pub fn send_message(&self, session: &mut Session, content: &str) -> DispatchOutcome {
        self.transmit(session, OutboundAction::message(content))
    }

    /// Sends `{"type":"command","command":name,"data"?:data}`.
    pub fn dispatch(
        &self,
        session: &mut Session,
        command: &str,
        data: Option<Value>,
    ) -> DispatchOutcome {
        self.transmit(session, OutboundAction::command(command, data))
    }

    /// Forwards the parsed contents of a session file as the `load` payload.
    ///
    /// Contents that are not JSON never reach the channel: the banner error
    /// is set and the in-flight flag is left alone.
    pub fn load_session_contents(&self, session: &mut Session, contents: &str) -> DispatchOutcome {
        match serde_json::from_str::<Value>(contents) {
            Ok(data) => self.dispatch(session, LOAD, Some(data)),
            Err(e) => {
                tracing::warn!("Rejected session file: {}", e);
                session.set_error(INVALID_SESSION_FILE);
                DispatchOutcome::Rejected
            }
        }
    }

    /// Reads `path` and forwards it like [`Self::load_session_contents`].
    pub fn load_session_file(&self, session: &mut Session, path: &Path) -> DispatchOutcome {
        match std::fs::read_to_string(path) {
            Ok(contents) => self.load_session_contents(session, &contents),
            Err(e) => {
                tracing::warn!("Failed to read session file {}: {}", path.display(), e);
                session.set_error(format!("Failed to read session file: {}", e));
                DispatchOutcome::Rejected
            }
        }
    }

    fn transmit(&self, session: &mut Session, action: OutboundAction) -> DispatchOutcome {
        let Some(message) = session.apply_outbound(action) else {
            tracing::debug!(
                connected = session.is_connected(),
                in_flight = session.is_in_flight(),
                "Dispatch skipped"
            );
            return DispatchOutcome::Skipped;
        };

        if let Err(e) = self.channel.send(&message) {
            // The channel reports the failure through its own events.
            tracing::warn!("Channel rejected outbound message: {}", e);
        }
        DispatchOutcome::Sent
    }
}

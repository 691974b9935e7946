use super::model::Session;
use crate::channel::{Channel, ChannelEvent};
use crate::command::{CommandDispatcher, DispatchOutcome};
use crate::protocol::InboundEvent;
use serde_json::Value;
use std::path::Path;

/// Owns one session and the channel it talks over.
///
/// `SessionController` is responsible for:
/// - Feeding channel events into the session state
/// - Routing user actions through the command dispatcher
/// - Closing the channel exactly once when the controller goes away
///
/// All methods take `&mut self`; the owner processes one event at a time.
pub struct SessionController<C: Channel> {
    session: Session,
    dispatcher: CommandDispatcher<C>,
}

impl<C: Channel> SessionController<C> {
    /// Creates a controller for `session` over an already opened channel.
    pub fn new(session: Session, channel: C) -> Self {
        tracing::info!("Session {} created", session.id());
        Self {
            session,
            dispatcher: CommandDispatcher::new(channel),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn channel(&self) -> &C {
        self.dispatcher.channel()
    }

    /// Applies a lifecycle or data event from the channel.
    pub fn handle_channel_event(&mut self, event: ChannelEvent) -> Option<InboundEvent> {
        match &event {
            ChannelEvent::Opened => tracing::info!("Connected to server"),
            ChannelEvent::Closed => tracing::info!("Disconnected from server"),
            ChannelEvent::Errored(_) | ChannelEvent::MessageReceived(_) => {}
        }
        self.session.apply_channel_event(event)
    }

    /// Applies an already decoded backend event.
    pub fn apply_inbound(&mut self, event: InboundEvent) {
        self.session.apply_inbound(event);
    }

    pub fn send_message(&mut self, content: &str) -> DispatchOutcome {
        self.dispatcher.send_message(&mut self.session, content)
    }

    pub fn send_command(&mut self, command: &str, data: Option<Value>) -> DispatchOutcome {
        self.dispatcher.dispatch(&mut self.session, command, data)
    }

    /// Sends the `load` command with the given file contents as its payload.
    pub fn load_session_contents(&mut self, contents: &str) -> DispatchOutcome {
        self.dispatcher
            .load_session_contents(&mut self.session, contents)
    }

    pub fn load_session_file(&mut self, path: &Path) -> DispatchOutcome {
        self.dispatcher.load_session_file(&mut self.session, path)
    }

    /// Records a client-side error in the banner.
    pub fn set_local_error(&mut self, message: impl Into<String>) {
        self.session.set_error(message);
    }
}

impl<C: Channel> Drop for SessionController<C> {
    fn drop(&mut self) {
        tracing::debug!("Closing channel for session {}", self.session.id());
        self.dispatcher.channel().close();
    }
}

//! The connection channel seam.
//!
//! The session never talks to a socket directly: it is handed a [`Channel`]
//! for outbound frames and is fed [`ChannelEvent`]s for everything that
//! comes back. Tests substitute a recording channel.

use crate::error::Result;
use crate::protocol::OutboundMessage;

/// Generic message surfaced when the transport reports a failure.
pub const CHANNEL_ERROR_MESSAGE: &str = "WebSocket error occurred";

/// Message surfaced when the channel closes.
pub const CONNECTION_LOST_MESSAGE: &str = "Connection lost";

/// Lifecycle and data events emitted by a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// The handshake completed.
    Opened,
    /// The connection ended. Emitted once per channel.
    Closed,
    /// The transport failed; a `Closed` usually follows.
    Errored(String),
    /// One text frame from the backend.
    MessageReceived(String),
}

/// A persistent bidirectional connection owned by one session.
pub trait Channel: Send + Sync {
    /// Queues a message for transmission. Fire-and-forget: delivery failures
    /// after queueing surface later as channel events.
    fn send(&self, message: &OutboundMessage) -> Result<()>;

    /// Closes the channel. Calling it more than once has no further effect.
    fn close(&self);
}

impl<C: Channel + ?Sized> Channel for std::sync::Arc<C> {
    fn send(&self, message: &OutboundMessage) -> Result<()> {
        (**self).send(message)
    }

    fn close(&self) {
        (**self).close()
    }
}

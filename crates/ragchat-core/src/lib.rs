//! Client core for ragchat.
//!
//! - [`session`]: session state, transitions and the channel-owning controller
//! - [`command`]: gated dispatch of messages and named commands
//! - [`render`]: markdown and reasoning-block rendering
//! - [`protocol`]: JSON wire messages
//! - [`channel`]: the transport seam

pub mod channel;
pub mod command;
pub mod config;
pub mod error;
pub mod protocol;
pub mod render;
pub mod session;

// Re-export common types
pub use channel::{Channel, ChannelEvent};
pub use error::{RagchatError, Result};
pub use session::{Session, SessionController};

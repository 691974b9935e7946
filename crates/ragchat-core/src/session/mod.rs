//! Session domain module.
//!
//! This module contains the client-side session state, the conversation
//! message types and the controller that binds a session to its channel.
//!
//! # Module Structure
//!
//! - `message`: Conversation message types (`MessageRole`, `ConversationMessage`)
//! - `model`: The `Session` record and its transitions (`apply_inbound`, `apply_outbound`)
//! - `controller`: Channel-owning wrapper (`SessionController`)
//!
//! # Usage
//!
//! ```ignore
//! use ragchat_core::session::{Session, SessionController, generate_session_id};
//! use ragchat_core::session::{ConversationMessage, MessageRole};
//! ```

mod controller;
mod message;
mod model;

#[cfg(test)]
mod controller_test;

// Re-export public API
pub use controller::SessionController;
pub use message::{ConversationMessage, MessageRole};
pub use model::{OutboundAction, Session, generate_session_id, now_timestamp};

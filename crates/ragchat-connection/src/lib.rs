//! Network channel for ragchat sessions.

mod websocket;

pub use websocket::{WebSocketChannel, endpoint_for_session};

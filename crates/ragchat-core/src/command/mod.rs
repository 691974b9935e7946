//! Command dispatch.
//!
//! - `builtin`: the backend's known commands (`help`, `refresh`, `save`, `load`, `debug`, `toggle_rag`)
//! - `dispatcher`: gated translation of user actions into outbound messages

pub mod builtin;
mod dispatcher;

pub use builtin::{BuiltinCommand, builtin_commands, find_builtin_command};
pub use dispatcher::{CommandDispatcher, DispatchOutcome, INVALID_SESSION_FILE};

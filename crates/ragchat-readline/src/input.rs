//! Interpretation of REPL input lines.

use ragchat_core::command::builtin::LOAD;
use std::path::PathBuf;

/// Commands handled by the REPL itself rather than the backend.
pub const LOCAL_COMMANDS: &[&str] = &["/status", "/quit"];

/// What a line of input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplAction {
    /// Blank line.
    Empty,
    /// Leave the REPL.
    Quit,
    /// Print the status line.
    Status,
    /// Chat input, sent as typed.
    Message(String),
    /// A backend command, forwarded verbatim.
    Command(String),
    /// `/load <path>`; `None` when the path is missing.
    Load(Option<PathBuf>),
}

/// Parses one line of input.
///
/// `/name args` is a command; everything else is chat input. `quit` and
/// `exit` work with or without the slash.
pub fn parse_input(line: &str) -> ReplAction {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplAction::Empty;
    }
    if trimmed == "quit" || trimmed == "exit" {
        return ReplAction::Quit;
    }

    let Some(command_line) = trimmed.strip_prefix('/') else {
        return ReplAction::Message(line.to_string());
    };
    let (name, rest) = match command_line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command_line, ""),
    };

    match name {
        "" => ReplAction::Message(line.to_string()),
        "quit" | "exit" => ReplAction::Quit,
        "status" => ReplAction::Status,
        LOAD if rest.is_empty() => ReplAction::Load(None),
        LOAD => ReplAction::Load(Some(PathBuf::from(rest))),
        other => ReplAction::Command(other.to_string()),
    }
}

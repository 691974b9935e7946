//! Builtin commands understood by the backend.
//!
//! The client forwards command names verbatim; this table only feeds help
//! text, completion and button-style labels in front ends.

use serde::Serialize;
use std::sync::OnceLock;

/// A command the backend is known to implement.
#[derive(Debug, Clone, Serialize)]
pub struct BuiltinCommand {
    /// Wire name sent in `{"type":"command","command":...}`
    pub name: &'static str,
    /// Short label for buttons and status output
    pub label: &'static str,
    /// Usage format (e.g., "/load <path>")
    pub usage: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Whether the command carries a payload (`data`)
    pub takes_data: bool,
}

impl BuiltinCommand {
    pub const fn new(
        name: &'static str,
        label: &'static str,
        usage: &'static str,
        description: &'static str,
        takes_data: bool,
    ) -> Self {
        Self {
            name,
            label,
            usage,
            description,
            takes_data,
        }
    }
}

pub const HELP: &str = "help";
pub const REFRESH: &str = "refresh";
pub const SAVE: &str = "save";
pub const LOAD: &str = "load";
pub const DEBUG: &str = "debug";
pub const TOGGLE_RAG: &str = "toggle_rag";

static BUILTIN_COMMANDS: OnceLock<Vec<BuiltinCommand>> = OnceLock::new();

/// Returns all builtin commands in display order.
pub fn builtin_commands() -> &'static [BuiltinCommand] {
    BUILTIN_COMMANDS.get_or_init(|| {
        vec![
            BuiltinCommand::new(HELP, "Help", "/help", "Ask the backend for its command list", false),
            BuiltinCommand::new(
                REFRESH,
                "Refresh DB",
                "/refresh",
                "Re-index the codebase with its latest changes",
                false,
            ),
            BuiltinCommand::new(SAVE, "Save", "/save", "Save the chat session on the backend", false),
            BuiltinCommand::new(
                LOAD,
                "Load",
                "/load <path>",
                "Restore a session from a saved JSON file",
                true,
            ),
            BuiltinCommand::new(DEBUG, "Debug", "/debug", "Show backend debug information", false),
            BuiltinCommand::new(
                TOGGLE_RAG,
                "RAG Mode",
                "/toggle_rag",
                "Switch between code-context (RAG) and chat-only answers",
                false,
            ),
        ]
    })
}

/// Find a builtin command by name.
pub fn find_builtin_command(name: &str) -> Option<&'static BuiltinCommand> {
    builtin_commands().iter().find(|cmd| cmd.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_commands_initialized() {
        let names: Vec<&str> = builtin_commands().iter().map(|c| c.name).collect();
        assert_eq!(names, vec![HELP, REFRESH, SAVE, LOAD, DEBUG, TOGGLE_RAG]);
    }

    #[test]
    fn test_only_load_takes_data() {
        let with_data: Vec<&str> = builtin_commands()
            .iter()
            .filter(|c| c.takes_data)
            .map(|c| c.name)
            .collect();
        assert_eq!(with_data, vec![LOAD]);
    }

    #[test]
    fn test_find_builtin_command() {
        assert_eq!(find_builtin_command("toggle_rag").unwrap().label, "RAG Mode");
        assert!(find_builtin_command("nonexistent").is_none());
    }
}

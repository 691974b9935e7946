use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use ragchat_core::command::{BuiltinCommand, builtin_commands, find_builtin_command};
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::input::LOCAL_COMMANDS;

/// rustyline helper for the chat prompt.
///
/// Completes `/command` names and, for commands that carry a payload
/// (`/load`), file paths. Hints show the rest of a command name or the
/// expected argument.
pub struct CliHelper {
    commands: Vec<String>,
    files: FilenameCompleter,
}

impl CliHelper {
    pub fn new() -> Self {
        let mut commands: Vec<String> = builtin_commands()
            .iter()
            .map(|command| format!("/{}", command.name))
            .collect();
        commands.extend(LOCAL_COMMANDS.iter().map(|command| command.to_string()));
        Self {
            commands,
            files: FilenameCompleter::new(),
        }
    }
}

/// A backend command typed so far: its builtin entry and whether an argument has started.
fn typed_command(line: &str) -> Option<(&'static BuiltinCommand, bool)> {
    let rest = line.strip_prefix('/')?;
    let (name, has_argument) = match rest.split_once(' ') {
        Some((name, _)) => (name, true),
        None => (rest, false),
    };
    find_builtin_command(name).map(|command| (command, has_argument))
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let typed = &line[..pos];
        if !typed.starts_with('/') {
            return Ok((0, vec![]));
        }

        if typed.contains(' ') {
            return match typed_command(typed) {
                Some((command, true)) if command.takes_data => self.files.complete(line, pos, ctx),
                _ => Ok((pos, vec![])),
            };
        }

        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(typed))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd.clone(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !line.starts_with('/') {
            return Borrowed(line);
        }
        match line.split_once(' ') {
            Some((name, argument)) => Owned(format!(
                "{} {}",
                name.bright_cyan(),
                argument.yellow()
            )),
            None => Owned(line.bright_cyan().to_string()),
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let typed = &line[..pos];
        if pos < line.len() || !typed.starts_with('/') || typed.contains(' ') {
            return None;
        }

        // A complete name of a payload command: show its argument.
        if let Some((command, false)) = typed_command(typed) {
            if command.takes_data {
                return command
                    .usage
                    .strip_prefix(typed)
                    .filter(|argument| !argument.is_empty())
                    .map(str::to_string);
            }
        }

        self.commands
            .iter()
            .find(|cmd| cmd.starts_with(typed) && cmd.len() > typed.len())
            .map(|cmd| cmd[typed.len()..].to_string())
    }
}

impl Validator for CliHelper {}

#[cfg(test)]
mod tests {
    use super::*;
    use rustyline::history::DefaultHistory;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_commands_include_backend_and_local() {
        let helper = CliHelper::new();
        for command in ["/help", "/refresh", "/save", "/load", "/debug", "/toggle_rag"] {
            assert!(helper.commands.iter().any(|c| c == command), "{command}");
        }
        assert!(helper.commands.iter().any(|c| c == "/status"));
        assert!(helper.commands.iter().any(|c| c == "/quit"));
    }

    #[test]
    fn test_hint_completes_command_name() {
        let helper = CliHelper::new();
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        assert_eq!(helper.hint("/tog", 4, &ctx), Some("gle_rag".to_string()));
        assert_eq!(helper.hint("hello", 5, &ctx), None);
        assert_eq!(helper.hint("/help", 5, &ctx), None);
    }

    #[test]
    fn test_hint_shows_argument_for_payload_command() {
        let helper = CliHelper::new();
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        assert_eq!(helper.hint("/load", 5, &ctx), Some(" <path>".to_string()));
        assert_eq!(helper.hint("/load x", 7, &ctx), None);
    }

    #[test]
    fn test_completion_candidates() {
        let helper = CliHelper::new();
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        let (start, candidates) = helper.complete("/s", 2, &ctx).unwrap();
        assert_eq!(start, 0);
        let names: Vec<_> = candidates.iter().map(|p| p.replacement.as_str()).collect();
        assert_eq!(names, vec!["/save", "/status"]);
    }

    #[test]
    fn test_load_completes_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("session_1.json"), "{}").unwrap();
        let helper = CliHelper::new();
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);

        let line = format!("/load {}/sess", temp_dir.path().display());
        let (start, candidates) = helper.complete(&line, line.len(), &ctx).unwrap();

        assert_eq!(start, "/load ".len());
        assert!(
            candidates
                .iter()
                .any(|pair| pair.replacement.ends_with("session_1.json"))
        );
    }

    #[test]
    fn test_arguments_of_plain_commands_are_not_completed() {
        let helper = CliHelper::new();
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        let (_, candidates) = helper.complete("/help me", 8, &ctx).unwrap();
        assert!(candidates.is_empty());
    }
}

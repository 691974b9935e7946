//! Terminal presentation of a session.

use chrono::{DateTime, Local, NaiveDateTime};
use colored::Colorize;
use ragchat_core::render::{REASONING_TITLE, Segment, render};
use ragchat_core::session::{ConversationMessage, MessageRole, Session};

/// Local wall-clock rendering of a message timestamp.
///
/// RFC 3339 timestamps are converted to local time; naive ISO-8601 ones are
/// taken as already local. Anything else is shown as received.
pub fn format_time(timestamp: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return parsed.with_timezone(&Local).format("%H:%M:%S").to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format("%H:%M:%S").to_string();
    }
    timestamp.to_string()
}

/// Uncoloured status line text.
pub fn status_text(session: &Session) -> String {
    let mut status = format!(
        "{} | RAG: {} | Session ID: {}",
        if session.is_connected() {
            "Connected"
        } else {
            "Disconnected"
        },
        if session.rag_enabled() {
            "Code Context"
        } else {
            "Chat Only"
        },
        session.id()
    );
    if session.is_in_flight() {
        status.push_str(" | working...");
    }
    status
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StatusSnapshot {
    connected: bool,
    rag_enabled: bool,
    in_flight: bool,
}

impl StatusSnapshot {
    fn of(session: &Session) -> Self {
        Self {
            connected: session.is_connected(),
            rag_enabled: session.rag_enabled(),
            in_flight: session.is_in_flight(),
        }
    }
}

/// Prints what changed in a session since the last refresh.
pub struct TranscriptView {
    html: bool,
    shown: usize,
    status: Option<StatusSnapshot>,
    error: Option<String>,
}

impl TranscriptView {
    pub fn new(html: bool) -> Self {
        Self {
            html,
            shown: 0,
            status: None,
            error: None,
        }
    }

    /// Forgets printed messages so the next refresh prints the whole transcript.
    pub fn transcript_replaced(&mut self) {
        println!("{}", "--- session loaded ---".bright_magenta());
        self.shown = 0;
    }

    pub fn refresh(&mut self, session: &Session) {
        let messages = session.messages();
        if messages.len() < self.shown {
            self.shown = 0;
        }
        for message in &messages[self.shown..] {
            self.print_message(message);
        }
        self.shown = messages.len();

        if let Some(banner) = self.pending_error_banner(session) {
            println!("{}", banner.red().bold());
        }

        let status = StatusSnapshot::of(session);
        if self.status.as_ref() != Some(&status) {
            self.print_status(session);
            self.status = Some(status);
        }
    }

    /// Makes the next refresh show the error banner even if its text is unchanged.
    pub fn error_raised(&mut self) {
        self.error = None;
    }

    /// The banner to print, if the session error differs from the last one shown.
    fn pending_error_banner(&mut self, session: &Session) -> Option<String> {
        let error = session.error().map(str::to_string);
        if error == self.error {
            return None;
        }
        self.error = error;
        self.error.as_ref().map(|message| format!("Error: {}", message))
    }

    pub fn print_status(&self, session: &Session) {
        let dot = if session.is_connected() {
            "●".green()
        } else {
            "●".red()
        };
        println!("{} {}", dot, status_text(session).bright_black());
    }

    fn print_message(&self, message: &ConversationMessage) {
        let header = format!("[{} {}]", message.role, format_time(&message.timestamp));
        let header = match &message.role {
            MessageRole::User => header.green(),
            MessageRole::Assistant => header.bright_blue(),
            MessageRole::System => header.bright_black(),
            MessageRole::Other(_) => header.bright_magenta(),
        };
        println!("{}", header);

        let rendered = render(&message.content);
        if self.html {
            print!("{}", rendered.html);
        } else {
            for segment in &rendered.segments {
                match segment {
                    Segment::Text(text) => {
                        for line in text.trim_matches('\n').lines() {
                            println!("{}", line);
                        }
                    }
                    Segment::Reasoning(body) => {
                        println!("{}", REASONING_TITLE.bright_yellow().bold());
                        for line in body.lines() {
                            println!("{} {}", "│".yellow(), line.yellow());
                        }
                    }
                }
            }
        }
        println!();
    }
}

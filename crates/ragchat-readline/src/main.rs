mod display;
mod helper;
mod input;
mod logging;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tokio::sync::mpsc;
use tokio::time::timeout;

use ragchat_connection::{WebSocketChannel, endpoint_for_session};
use ragchat_core::channel::ChannelEvent;
use ragchat_core::command::{DispatchOutcome, builtin_commands};
use ragchat_core::config::ClientConfig;
use ragchat_core::protocol::InboundEvent;
use ragchat_core::session::{Session, SessionController, generate_session_id};

use display::TranscriptView;
use helper::CliHelper;
use input::{ReplAction, parse_input};

const PROMPT: &str = ">> ";
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Terminal chat client for a retrieval-augmented code assistant.
#[derive(Parser, Debug)]
#[command(name = "ragchat", version, about)]
struct Cli {
    /// Backend WebSocket URL (overrides the config file)
    #[arg(long, env = "RAGCHAT_SERVER_URL")]
    server_url: Option<String>,

    /// Path to config.toml (defaults to ~/.config/ragchat/config.toml)
    #[arg(long, env = "RAGCHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Print messages as rendered HTML instead of plain text
    #[arg(long)]
    html: bool,
}

/// What the input thread reports.
enum InputEvent {
    Line(String),
    Interrupted,
    Eof,
}

/// Runs rustyline on its own thread so the event loop never blocks on input.
fn spawn_input_thread(tx: mpsc::UnboundedSender<InputEvent>) {
    std::thread::spawn(move || {
        let mut rl: Editor<CliHelper, DefaultHistory> = match Editor::new() {
            Ok(rl) => rl,
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                let _ = tx.send(InputEvent::Eof);
                return;
            }
        };
        rl.set_helper(Some(CliHelper::new()));

        loop {
            let event = match rl.readline(PROMPT) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = rl.add_history_entry(line.as_str());
                    }
                    let quit = parse_input(&line) == ReplAction::Quit;
                    let sent = tx.send(InputEvent::Line(line)).is_ok();
                    if quit || !sent {
                        break;
                    }
                    continue;
                }
                Err(ReadlineError::Interrupted) => InputEvent::Interrupted,
                Err(ReadlineError::Eof) => InputEvent::Eof,
                Err(err) => {
                    tracing::error!("Readline failed: {:?}", err);
                    InputEvent::Eof
                }
            };
            let eof = matches!(event, InputEvent::Eof);
            if tx.send(event).is_err() || eof {
                break;
            }
        }
    });
}

fn print_command_row(usage: &str, label: &str, description: &str) {
    println!(
        "  {} {} {}",
        format!("{:<14}", usage).bright_cyan(),
        format!("{:<11}", label).bold(),
        description.bright_black()
    );
}

fn print_banner(server_url: &str, session_id: &str) {
    println!("{}", "=== ragchat ===".bright_magenta().bold());
    println!(
        "{}",
        format!("Server: {}  Session: {}", server_url, session_id).bright_black()
    );
    for command in builtin_commands() {
        print_command_row(command.usage, command.label, command.description);
    }
    print_command_row("/status", "Status", "Show connection and retrieval mode");
    print_command_row("/quit", "Quit", "Exit");
    println!();
}

fn report_outcome(view: &mut TranscriptView, outcome: DispatchOutcome, session: &Session) {
    match outcome {
        DispatchOutcome::Sent => return,
        DispatchOutcome::Rejected => {
            view.error_raised();
            return;
        }
        DispatchOutcome::Skipped => {}
    }
    let reason = if !session.is_connected() {
        "Not connected; input was not sent."
    } else if session.is_in_flight() {
        "Still waiting for the previous response; input was not sent."
    } else {
        return;
    };
    println!("{}", reason.yellow());
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ClientConfig::load_from(path)?,
        None => ClientConfig::load()?,
    };
    if let Some(url) = cli.server_url {
        config.server_url = url;
    }
    let _log_guard = logging::init_logging(&config)?;

    let session = Session::new(generate_session_id());
    let endpoint = endpoint_for_session(&config.server_url, session.id())?;
    tracing::info!("Starting session {} against {}", session.id(), endpoint);
    print_banner(&config.server_url, session.id());

    let (event_tx, mut channel_events) = mpsc::unbounded_channel();
    let channel = WebSocketChannel::open(endpoint, event_tx);
    let mut controller = SessionController::new(session, channel);
    let mut view = TranscriptView::new(cli.html);

    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    spawn_input_thread(input_tx);

    // ===== Event Loop =====
    loop {
        tokio::select! {
            Some(event) = channel_events.recv() => {
                let applied = controller.handle_channel_event(event);
                match applied {
                    Some(InboundEvent::SessionLoaded { .. }) => view.transcript_replaced(),
                    Some(InboundEvent::Error { .. }) => view.error_raised(),
                    _ => {}
                }
                view.refresh(controller.session());
            }
            input = input_rx.recv() => {
                match input {
                    Some(InputEvent::Line(line)) => match parse_input(&line) {
                        ReplAction::Empty => {}
                        ReplAction::Quit => {
                            println!("{}", "Goodbye!".bright_green());
                            break;
                        }
                        ReplAction::Status => view.print_status(controller.session()),
                        ReplAction::Message(text) => {
                            let outcome = controller.send_message(&text);
                            report_outcome(&mut view, outcome, controller.session());
                        }
                        ReplAction::Command(name) => {
                            let outcome = controller.send_command(&name, None);
                            report_outcome(&mut view, outcome, controller.session());
                        }
                        ReplAction::Load(None) => {
                            println!("{}", "Usage: /load <path>".yellow());
                        }
                        ReplAction::Load(Some(path)) => {
                            let outcome = controller.load_session_file(&path);
                            report_outcome(&mut view, outcome, controller.session());
                        }
                    },
                    Some(InputEvent::Interrupted) => {
                        println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                    }
                    Some(InputEvent::Eof) | None => {
                        println!("{}", "CTRL-D detected. Exiting...".bright_green());
                        break;
                    }
                }
                view.refresh(controller.session());
            }
        }
    }

    // Dropping the controller closes the channel; wait briefly for the socket to finish.
    drop(controller);
    let closed = timeout(SHUTDOWN_GRACE, async {
        while let Some(event) = channel_events.recv().await {
            if event == ChannelEvent::Closed {
                break;
            }
        }
    })
    .await;
    if closed.is_err() {
        tracing::warn!("Channel did not close within {:?}", SHUTDOWN_GRACE);
    }
    tracing::info!("Session ended");

    Ok(())
}

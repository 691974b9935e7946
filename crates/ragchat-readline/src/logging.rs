use anyhow::{Context, Result, anyhow};
use ragchat_core::config::ClientConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "ragchat.log";

/// Installs the global subscriber, writing to a daily log file.
///
/// `RUST_LOG` takes precedence over the configured level. The returned guard
/// flushes buffered lines on drop and must outlive the REPL.
pub fn init_logging(config: &ClientConfig) -> Result<WorkerGuard> {
    let directory = config.log_directory()?;
    std::fs::create_dir_all(&directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    let appender = tracing_appender::rolling::daily(&directory, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::info!("Logging to {}", directory.display());
    Ok(guard)
}

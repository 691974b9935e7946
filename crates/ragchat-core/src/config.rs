//! Configuration file management for ragchat.
//!
//! Reads client settings from `~/.config/ragchat/config.toml`. Every field
//! has a default, so a missing file (or a partial one) is not an error.

use crate::error::{RagchatError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default backend address; the channel path `/ws/{session_id}` is appended.
pub const DEFAULT_SERVER_URL: &str = "ws://localhost:8000";

/// Root configuration structure for config.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base WebSocket URL of the backend
    pub server_url: String,
    pub logging: LoggingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. "info", "ragchat_core=debug")
    pub level: String,
    /// Directory for log files; defaults to `<config dir>/logs`
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl ClientConfig {
    /// Loads the configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&default_config_path()?)
    }

    /// Loads the configuration from `path`, falling back to defaults when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No configuration file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            RagchatError::config(format!(
                "Failed to read configuration file at {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            RagchatError::config(format!(
                "Failed to parse configuration file at {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Directory log files are written to.
    pub fn log_directory(&self) -> Result<PathBuf> {
        match &self.logging.directory {
            Some(dir) => Ok(dir.clone()),
            None => Ok(config_dir()?.join("logs")),
        }
    }
}

/// Returns the ragchat configuration directory: ~/.config/ragchat
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| RagchatError::config("Could not determine home directory"))?;
    Ok(home.join(".config").join("ragchat"))
}

/// Returns the path to the configuration file: ~/.config/ragchat/config.toml
pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

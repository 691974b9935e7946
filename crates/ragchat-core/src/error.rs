//! Error types for the ragchat client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the ragchat crates.
///
/// Display-only session errors (the banner text) are plain strings on the
/// `Session`; this type covers failures of the client machinery itself.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum RagchatError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The channel could not accept a message (not open, or its task is gone)
    #[error("Channel error: {0}")]
    Channel(String),

    /// The server address could not be turned into a channel endpoint
    #[error("Invalid endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

impl RagchatError {
    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Channel error
    pub fn channel(message: impl Into<String>) -> Self {
        Self::Channel(message.into())
    }

    /// Creates an InvalidEndpoint error
    pub fn invalid_endpoint(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for RagchatError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for RagchatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for RagchatError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, RagchatError>`.
pub type Result<T> = std::result::Result<T, RagchatError>;

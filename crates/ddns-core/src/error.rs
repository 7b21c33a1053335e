//! Error types for the DDNS updater
//!
//! Every error aborts the current update cycle only. The engine logs it and
//! the scheduler moves on to the next tick.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS updater
#[derive(Error, Debug)]
pub enum Error {
    /// Connection, DNS, timeout or body-read failures
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response body could not be parsed as the expected JSON
    #[error("Parse error: {message} (body: {body})")]
    Parse {
        /// Parser message
        message: String,
        /// Raw response body that failed to parse
        body: String,
    },

    /// A JSON key path did not resolve to a value
    #[error("No value found at '{path}' (body: {body})")]
    NotFound {
        /// The dotted key path that was looked up
        path: String,
        /// Raw response body the path was applied to
        body: String,
    },

    /// The provider reported a failure
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message, usually including the raw response body
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a parse error carrying the offending body
    pub fn parse(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: body.into(),
        }
    }

    /// Create a "not found" error for a key path
    pub fn not_found(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self::NotFound {
            path: path.into(),
            body: body.into(),
        }
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

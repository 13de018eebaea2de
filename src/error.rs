//! Error types for cloudstore-core
//!
//! This module defines the error hierarchy for the crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! HTTP error statuses (4xx/5xx) are deliberately absent: the transports
//! return them as ordinary [`UnifiedResponse`](crate::http::UnifiedResponse)
//! values and leave interpretation to the caller.

use thiserror::Error;

/// The main error type for cloudstore-core
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Caller Errors
    // ============================================================================
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Paginator already consumed: a paginated sequence can only be traversed once")]
    IllegalReuse,

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True for connection-level failures that produced no response
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// True when the call was stopped by its cancellation signal
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

/// Result type alias for cloudstore-core
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_argument("request target is missing");
        assert_eq!(
            err.to_string(),
            "Invalid argument: request target is missing"
        );

        let err = Error::config("bad timeout");
        assert_eq!(err.to_string(), "Configuration error: bad timeout");

        assert_eq!(Error::Cancelled.to_string(), "Operation cancelled");
        assert!(Error::IllegalReuse.to_string().contains("only be traversed once"));
    }

    #[test]
    fn test_classification() {
        assert!(Error::Cancelled.is_cancelled());
        assert!(!Error::IllegalReuse.is_cancelled());
        assert!(!Error::invalid_argument("x").is_transport());
        assert!(!Error::Io(std::io::Error::other("boom")).is_transport());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }

    #[test]
    fn test_result_with_context_from_io() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::other("disk gone"));
        let err = result
            .with_context(|| "reading options".to_string())
            .unwrap_err();
        assert_eq!(err.to_string(), "reading options: IO error: disk gone");
    }
}

//! Transport error types.

use thiserror::Error;

/// Errors that can occur in transport operations.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Binding the listen socket failed.
    #[error("failed to bind {addr}: {reason}")]
    BindFailed {
        /// The address that could not be bound.
        addr: String,
        /// Reason for failure.
        reason: String,
    },

    /// The request never produced a response (connect error, timeout, ...).
    #[error("request to {url} failed: {reason}")]
    RequestFailed {
        /// The target URL.
        url: String,
        /// Reason for failure.
        reason: String,
    },

    /// The peer answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {body}")]
    Status {
        /// The target URL.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// The response body, for diagnostics.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("invalid response body from {url}: {reason}")]
    Decode {
        /// The target URL.
        url: String,
        /// Reason for failure.
        reason: String,
    },

    /// Invalid configuration.
    #[error("invalid transport configuration: {0}")]
    InvalidConfig(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

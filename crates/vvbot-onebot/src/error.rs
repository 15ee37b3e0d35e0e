//! OneBot API error types.

use thiserror::Error;
use vvbot_transport::TransportError;

/// Error type for API calls.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The gateway accepted the request but reported a failure.
    #[error("API error ({retcode}): {message}")]
    Failed {
        /// OneBot return code.
        retcode: i64,
        /// Human-readable reason.
        message: String,
    },
    /// Failed to serialize/deserialize.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// Transport error.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

//! Runtime error types.

use thiserror::Error;
use vvbot_transport::TransportError;

use crate::config::ConfigError;

/// Errors that stop the process before or while serving.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The webhook listener could not be started.
    #[error("Failed to start webhook listener: {0}")]
    Transport(#[from] TransportError),

    /// A shutdown signal handler could not be installed.
    #[error("Failed to install signal handler: {0}")]
    Signal(String),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

//! vvbot runtime: configuration, logging and process lifecycle.
//!
//! - [`config`]: layered figment loading (`vvbot.yml`, `VVBOT_*`, `NAPCAT_API_HOST`) and validation
//! - [`logging`]: `tracing-subscriber` setup driven by the `logging` section
//! - [`VvRuntime`]: binds the webhook listener and waits for Ctrl+C or SIGTERM

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

pub use config::{ConfigError, ConfigLoader, ConfigResult, VvConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::LoggingBuilder;
pub use runtime::{RuntimeBuilder, VvRuntime};

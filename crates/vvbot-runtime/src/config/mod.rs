//! Configuration for vvbot.
//!
//! Layered loading (defaults, files, environment) lives in [`loader`],
//! the schema in [`schema`] and the startup checks in [`validation`].

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile};
pub use schema::{
    BotConfig, LogFormat, LogLevel, LogOutput, LoggingConfig, NapCatConfig, SearchConfig,
    ServerConfig, VvConfig,
};
pub use validation::validate_config;

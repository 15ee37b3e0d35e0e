//! Configuration schema definitions.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use vvbot_transport::http::HttpClientConfig;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VvConfig {
    /// The bot's own account.
    #[serde(default)]
    pub bot: BotConfig,

    /// Inbound webhook listener.
    #[serde(default)]
    pub server: ServerConfig,

    /// Outbound gateway API.
    #[serde(default)]
    pub napcat: NapCatConfig,

    /// Image search API.
    #[serde(default)]
    pub search: SearchConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The bot account the relay answers for.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BotConfig {
    /// QQ number used to build the mention token.
    #[serde(default, deserialize_with = "string_or_number")]
    pub qq: String,
}

/// Webhook listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_server_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Path that accepts event posts.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            path: default_path(),
        }
    }
}

impl ServerConfig {
    /// Returns the `host:port` pair to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_path() -> String {
    "/".to_string()
}

/// NapCat (OneBot v11 HTTP API) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NapCatConfig {
    /// API host.
    #[serde(default = "default_napcat_host", deserialize_with = "string_or_number")]
    pub host: String,

    /// API port.
    #[serde(default = "default_napcat_port")]
    pub port: u16,

    /// Bearer token; empty disables the header.
    #[serde(default, deserialize_with = "string_or_number")]
    pub access_token: String,

    /// Request timeout in milliseconds.
    #[serde(default = "default_napcat_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for NapCatConfig {
    fn default() -> Self {
        Self {
            host: default_napcat_host(),
            port: default_napcat_port(),
            access_token: String::new(),
            timeout_ms: default_napcat_timeout_ms(),
        }
    }
}

impl NapCatConfig {
    /// Base URL of the HTTP API, e.g. `http://127.0.0.1:3000`.
    pub fn api_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Builds the transport-level client configuration.
    pub fn to_client_config(&self) -> HttpClientConfig {
        HttpClientConfig::new(self.api_url())
            .with_access_token(self.access_token.clone())
            .with_timeout(self.timeout())
    }
}

fn default_napcat_host() -> String {
    "127.0.0.1".to_string()
}

fn default_napcat_port() -> u16 {
    3000
}

fn default_napcat_timeout_ms() -> u64 {
    30000
}

/// Image search API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search endpoint URL.
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,

    /// Request timeout in milliseconds.
    #[serde(default = "default_search_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            timeout_ms: default_search_timeout_ms(),
        }
    }
}

impl SearchConfig {
    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_search_endpoint() -> String {
    "https://api.zvv.quest/search".to_string()
}

fn default_search_timeout_ms() -> u64 {
    10000
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Returns the level as a filter directive string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts to a `tracing::Level`.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature; falls back to `full` without it.
    Json,
}

/// Log destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub output: LogOutput,

    /// Target file when `output` is `file`.
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    #[serde(default)]
    pub thread_ids: bool,

    /// Include source file and line number.
    #[serde(default)]
    pub file_location: bool,

    /// Per-module levels, e.g. `vvbot_transport: debug`.
    #[serde(default)]
    pub filters: HashMap<String, LogLevel>,
}

/// Accepts a string or an integer and yields a string.
///
/// QQ numbers and tokens are often written unquoted in YAML or env vars.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;

    impl serde::de::Visitor<'_> for Visitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or an integer")
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: serde::de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(Visitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VvConfig::default();
        assert_eq!(config.server.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.server.path, "/");
        assert_eq!(config.napcat.api_url(), "http://127.0.0.1:3000");
        assert_eq!(config.napcat.timeout(), Duration::from_secs(30));
        assert_eq!(config.search.endpoint, "https://api.zvv.quest/search");
        assert_eq!(config.search.timeout(), Duration::from_secs(10));
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.bot.qq.is_empty());
    }

    #[test]
    fn test_qq_accepts_number() {
        let bot: BotConfig = serde_json::from_str(r#"{"qq": 123456789}"#).unwrap();
        assert_eq!(bot.qq, "123456789");

        let bot: BotConfig = serde_json::from_str(r#"{"qq": "42"}"#).unwrap();
        assert_eq!(bot.qq, "42");
    }

    #[test]
    fn test_log_level_parsing() {
        let logging: LoggingConfig =
            serde_json::from_str(r#"{"level": "debug", "filters": {"vvbot": "trace"}}"#).unwrap();
        assert_eq!(logging.level.to_tracing_level(), tracing::Level::DEBUG);
        assert_eq!(logging.filters["vvbot"], LogLevel::Trace);
        assert_eq!(logging.format, LogFormat::Compact);
        assert_eq!(logging.output, LogOutput::Stdout);
    }
}

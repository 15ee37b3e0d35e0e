//! Configuration validation utilities.

use url::Url;

use super::error::{ConfigError, ConfigResult};
use super::schema::{NapCatConfig, SearchConfig, ServerConfig, VvConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &VvConfig) -> ConfigResult<()> {
    validate_bot_qq(&config.bot.qq)?;
    validate_server_config(&config.server)?;
    validate_napcat_config(&config.napcat)?;
    validate_search_config(&config.search)?;
    Ok(())
}

fn validate_bot_qq(qq: &str) -> ConfigResult<()> {
    if qq.is_empty() {
        return Err(ConfigError::missing_field("bot.qq"));
    }
    if !qq.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConfigError::validation(format!(
            "bot.qq must contain only digits, got {qq:?}"
        )));
    }
    Ok(())
}

fn validate_server_config(server: &ServerConfig) -> ConfigResult<()> {
    validate_port(server.port, "server.port")?;
    if !server.path.starts_with('/') {
        return Err(ConfigError::validation(format!(
            "server.path must start with '/', got {:?}",
            server.path
        )));
    }
    Ok(())
}

fn validate_napcat_config(napcat: &NapCatConfig) -> ConfigResult<()> {
    if napcat.host.trim().is_empty() {
        return Err(ConfigError::missing_field("napcat.host"));
    }
    validate_port(napcat.port, "napcat.port")?;
    if napcat.timeout_ms == 0 {
        return Err(ConfigError::validation(
            "napcat.timeout_ms must be greater than 0",
        ));
    }
    Ok(())
}

fn validate_search_config(search: &SearchConfig) -> ConfigResult<()> {
    let url = Url::parse(&search.endpoint)
        .map_err(|e| ConfigError::invalid_url(&search.endpoint, e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::invalid_url(
            &search.endpoint,
            "scheme must be http or https",
        ));
    }
    if search.timeout_ms == 0 {
        return Err(ConfigError::validation(
            "search.timeout_ms must be greater than 0",
        ));
    }
    Ok(())
}

fn validate_port(port: u16, field: &str) -> ConfigResult<()> {
    if port == 0 {
        return Err(ConfigError::InvalidPort {
            field: field.to_string(),
        });
    }
    Ok(())
}

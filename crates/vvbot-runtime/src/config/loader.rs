//! Configuration loader using figment.
//!
//! # Feature Flags
//!
//! - `yaml-config` *(default)*: YAML files (`vvbot.yaml`, `vvbot.yml`, `config.yaml`, `config.yml`)
//! - `toml-config`: TOML files (`vvbot.toml`, `config.toml`)
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. Profile-specific config file (`vvbot.{profile}.yml`)
//! 3. Main config file (explicit path, or the first one found in the search paths)
//! 4. Flat keys from older config files, see below
//! 5. Environment variables (`VVBOT_*`)
//! 6. `NAPCAT_API_HOST`, which overrides `napcat.host`
//!
//! # Flat Keys
//!
//! Older deployments keep every setting at the top level of `config.yml`.
//! These keys are still read (case-insensitively) and mapped onto sections:
//!
//! | Flat key            | Section key           |
//! |---------------------|-----------------------|
//! | `QQ`                | `bot.qq`              |
//! | `napcatAccessToken` | `napcat.access_token` |
//! | `napcatAPIHost`     | `napcat.host`         |
//! | `napcatAPIPort`     | `napcat.port`         |
//! | `goListenPort`      | `server.port`         |
//!
//! # Environment Variable Mapping
//!
//! Environment variables use the `VVBOT_` prefix with `__` as separator:
//!
//! - `VVBOT_BOT__QQ=123456789` → `bot.qq = "123456789"`
//! - `VVBOT_NAPCAT__PORT=3001` → `napcat.port = 3001`
//! - `VVBOT_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//!
//! # Example
//!
//! ```rust,ignore
//! use vvbot_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .file("./deploy/vvbot.yml")
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "yaml-config", feature = "toml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use serde::Deserialize;
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::VvConfig;

/// Environment variable that selects the profile.
pub const PROFILE_ENV: &str = "VVBOT_PROFILE";

/// Compatibility variable that overrides `napcat.host`.
pub const NAPCAT_HOST_ENV: &str = "NAPCAT_API_HOST";

/// A flat-key value; YAML may give it as a string or a bare number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(u64),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }

    fn into_port(self, key: &str) -> ConfigResult<u16> {
        let port = match self {
            Self::Text(s) => s.trim().parse().ok(),
            Self::Number(n) => u16::try_from(n).ok(),
        };
        port.ok_or_else(|| ConfigError::validation(format!("{key} must be a port number")))
    }
}

#[derive(Debug, Default, Deserialize)]
struct FlatKeys {
    #[serde(default, rename = "QQ", alias = "qq")]
    qq: Option<Scalar>,
    #[serde(default, rename = "napcatAccessToken", alias = "napcataccesstoken")]
    access_token: Option<Scalar>,
    #[serde(default, rename = "napcatAPIHost", alias = "napcatapihost")]
    napcat_host: Option<Scalar>,
    #[serde(default, rename = "napcatAPIPort", alias = "napcatapiport")]
    napcat_port: Option<Scalar>,
    #[serde(default, rename = "goListenPort", alias = "golistenport")]
    listen_port: Option<Scalar>,
}

/// Configuration profile for environment-specific settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    /// Development profile (default).
    #[default]
    Development,
    /// Production profile.
    Production,
    /// Custom profile name.
    Custom(String),
}

impl Profile {
    /// Returns the profile name as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Parses a profile name; `prod` and `dev` are accepted as short forms.
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Reads the profile from `VVBOT_PROFILE`, defaulting to Development.
    pub fn from_env() -> Self {
        std::env::var(PROFILE_ENV)
            .map(|p| Self::parse(&p))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration loader with figment-based multi-source support.
pub struct ConfigLoader {
    /// Configuration profile.
    profile: Profile,
    /// Search paths for configuration files.
    search_paths: Vec<PathBuf>,
    /// Whether to load environment variables.
    load_env: bool,
    /// Specific config file to load (overrides search).
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a new configuration loader with defaults.
    pub fn new() -> Self {
        Self {
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    /// Sets the configuration profile.
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::parse(profile.as_ref());
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Adds current directory to search paths.
    pub fn with_current_dir(self) -> Self {
        if let Ok(cwd) = std::env::current_dir() {
            self.search_path(cwd)
        } else {
            self
        }
    }

    /// Adds user config directory to search paths.
    pub fn with_user_config_dir(self) -> Self {
        if let Some(config_dir) = dirs::config_dir() {
            self.search_path(config_dir.join("vvbot"))
        } else {
            self
        }
    }

    /// Sets a specific configuration file to load.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Loads and returns the configuration. Validation is left to the caller.
    pub fn load(self) -> ConfigResult<VvConfig> {
        let profile = self.profile.clone();
        let figment = self.build_figment()?;

        let config: VvConfig = figment.extract()?;

        debug!(
            profile = %profile,
            napcat = %config.napcat.api_url(),
            logging_level = %config.logging.level,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Builds the figment instance with all sources.
    fn build_figment(self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(VvConfig::default()));

        if let Some(path) = &self.config_file {
            if path.exists() {
                info!(path = %path.display(), "Loading configuration file");
                figment = Self::merge_config_file(figment, path)?;
            } else {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
        } else {
            figment = self.load_config_files(figment);
        }

        figment = Self::merge_flat_keys(figment)?;

        if self.load_env {
            trace!("Loading environment variables with VVBOT_ prefix");
            figment = figment
                .merge(Env::prefixed("VVBOT_").split("__"))
                .merge(
                    Env::raw()
                        .only(&[NAPCAT_HOST_ENV])
                        .map(|_| "napcat.host".into()),
                );
        }

        Ok(figment)
    }

    /// Moves top-level flat keys into their sections.
    fn merge_flat_keys(mut figment: Figment) -> ConfigResult<Figment> {
        let flat: FlatKeys = figment.extract()?;

        if let Some(qq) = flat.qq {
            figment = figment.merge(Serialized::default("bot.qq", qq.into_string()));
        }
        if let Some(token) = flat.access_token {
            figment = figment.merge(Serialized::default(
                "napcat.access_token",
                token.into_string(),
            ));
        }
        if let Some(host) = flat.napcat_host {
            figment = figment.merge(Serialized::default("napcat.host", host.into_string()));
        }
        if let Some(port) = flat.napcat_port {
            let port = port.into_port("napcatAPIPort")?;
            figment = figment.merge(Serialized::default("napcat.port", port));
        }
        if let Some(port) = flat.listen_port {
            let port = port.into_port("goListenPort")?;
            debug!(port, "Using flat goListenPort for server.port");
            figment = figment.merge(Serialized::default("server.port", port));
        }

        Ok(figment)
    }

    /// Merges a single config file into the figment, dispatching on file extension.
    fn merge_config_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            #[cfg(feature = "toml-config")]
            "toml" => Ok(figment.merge(Toml::file(path))),
            #[cfg(feature = "yaml-config")]
            "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
            _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
        }
    }

    /// Resolves the effective list of search paths.
    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if self.search_paths.is_empty() {
            let mut paths = Vec::new();
            if let Ok(cwd) = std::env::current_dir() {
                paths.push(cwd);
            }
            if let Some(config_dir) = dirs::config_dir() {
                paths.push(config_dir.join("vvbot"));
            }
            paths
        } else {
            self.search_paths.clone()
        }
    }

    /// Searches `search_paths × base_names` for one format.
    ///
    /// A profile-specific variant is merged before its base file. Returns as
    /// soon as a base file is found.
    #[cfg(any(feature = "toml-config", feature = "yaml-config"))]
    fn load_format_files<F>(
        &self,
        mut figment: Figment,
        search_paths: &[PathBuf],
        base_names: &[&str],
        merge_fn: F,
    ) -> (Figment, bool)
    where
        F: Fn(Figment, &Path) -> Figment,
    {
        for search_path in search_paths {
            for base_name in base_names {
                let Some((stem, ext)) = base_name.rsplit_once('.') else {
                    continue;
                };

                let profile_path =
                    search_path.join(format!("{stem}.{}.{ext}", self.profile.as_str()));
                if profile_path.exists() {
                    debug!(path = %profile_path.display(), "Loading profile-specific config");
                    figment = merge_fn(figment, &profile_path);
                }

                let base_path = search_path.join(base_name);
                if base_path.exists() {
                    info!(path = %base_path.display(), "Loading configuration file");
                    figment = merge_fn(figment, &base_path);
                    return (figment, true);
                }
            }
        }
        (figment, false)
    }

    /// Searches for and loads configuration files from search paths.
    #[allow(unused_mut)]
    fn load_config_files(&self, mut figment: Figment) -> Figment {
        let search_paths = self.resolve_search_paths();
        let mut found = false;

        #[cfg(feature = "toml-config")]
        {
            let (f, ok) = self.load_format_files(
                figment,
                &search_paths,
                &["vvbot.toml", "config.toml"],
                |fig, path| fig.merge(Toml::file(path)),
            );
            figment = f;
            found |= ok;
        }

        #[cfg(feature = "yaml-config")]
        {
            let (f, ok) = self.load_format_files(
                figment,
                &search_paths,
                &["vvbot.yaml", "vvbot.yml", "config.yaml", "config.yml"],
                |fig, path| fig.merge(Yaml::file(path)),
            );
            figment = f;
            found |= ok;
        }

        if !found {
            warn!(paths = ?search_paths, "No configuration file found, using defaults");
        }
        figment
    }
}

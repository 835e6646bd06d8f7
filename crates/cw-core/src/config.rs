//! Configuration management
//!
//! Settings are resolved in this order (first wins):
//! 1. command-line flags (applied by the binary)
//! 2. environment variables
//! 3. `cw-bridge.toml` or the file given with `--config`
//! 4. defaults
//!
//! `${VAR_NAME}` inside the TOML file is expanded from the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const DEFAULT_CONFIG_FILE: &str = "cw-bridge.toml";

/// HTTP API configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// API root, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.chatwork.com/v2".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_env_file() -> PathBuf {
    PathBuf::from(".env")
}

/// Main configuration for cw-bridge
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    /// Dotenv-style file consulted for the API token
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            env_file: default_env_file(),
        }
    }
}

impl Config {
    /// Replace `${VAR_NAME}` with the variable's value, or nothing when unset.
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut rest = value;

        while let Some(start) = rest.find("${") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find('}') {
                Some(end) => {
                    let var_name = &after[..end];
                    if !var_name.is_empty() {
                        result.push_str(&std::env::var(var_name).unwrap_or_default());
                    }
                    rest = &after[end + 1..];
                }
                None => {
                    // unterminated: keep verbatim
                    result.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }

        result.push_str(rest);
        result
    }

    /// Load settings from a TOML file, then apply environment overrides.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;

        let mut config = Self::from_toml_str(&content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn from_toml_str(content: &str) -> Result<Self> {
        let expanded = Self::expand_env_vars(content);
        let mut config: Config = toml::from_str(&expanded)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;
        config.api.base_url = config.api.base_url.trim_end_matches('/').to_string();
        Ok(config)
    }

    /// Use the explicit file if given, else `cw-bridge.toml` when present,
    /// else environment and defaults only.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_toml_file(path);
        }

        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::from_toml_file(DEFAULT_CONFIG_FILE);
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup("CHATWORK_API_BASE_URL") {
            self.api.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(timeout) = lookup("CHATWORK_TIMEOUT_SECS") {
            match timeout.trim().parse() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => tracing::warn!("Ignoring invalid CHATWORK_TIMEOUT_SECS: {}", timeout),
            }
        }
        if let Some(path) = lookup("CHATWORK_ENV_FILE") {
            self.env_file = PathBuf::from(path);
        }
    }
}

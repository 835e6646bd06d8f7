//! API token resolution
//!
//! The token is taken from the first non-empty source in this order:
//! 1. explicit value (`--token`)
//! 2. `CHATWORK_API_TOKEN` environment variable
//! 3. `CHATWORK_TOKEN` environment variable
//! 4. `CHATWORK_API_TOKEN` in the env file
//! 5. `CHATWORK_TOKEN` in the env file
//!
//! The env file is parsed into a map and never exported into the process
//! environment, so real environment variables always win over file values.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// Token variable names, in precedence order.
pub const TOKEN_KEYS: [&str; 2] = ["CHATWORK_API_TOKEN", "CHATWORK_TOKEN"];

/// Every place a token may come from for one invocation
#[derive(Debug, Clone, Default)]
pub struct CredentialSources {
    pub explicit: Option<String>,
    pub env: [Option<String>; 2],
    pub file: HashMap<String, String>,
}

impl CredentialSources {
    /// Capture the environment variables alongside an explicit value and an
    /// already-loaded env file map.
    pub fn from_env(explicit: Option<String>, file: HashMap<String, String>) -> Self {
        Self {
            explicit,
            env: TOKEN_KEYS.map(|key| std::env::var(key).ok()),
            file,
        }
    }

    /// First non-empty token, trimmed.
    pub fn resolve(&self) -> Option<String> {
        let candidates = [
            ("explicit", self.explicit.as_deref()),
            (TOKEN_KEYS[0], self.env[0].as_deref()),
            (TOKEN_KEYS[1], self.env[1].as_deref()),
            ("env file", self.file.get(TOKEN_KEYS[0]).map(String::as_str)),
            ("env file", self.file.get(TOKEN_KEYS[1]).map(String::as_str)),
        ];

        candidates.into_iter().find_map(|(source, value)| {
            let token = value?.trim();
            if token.is_empty() {
                return None;
            }
            debug!("Using API token from {}", source);
            Some(token.to_string())
        })
    }
}

/// Parse a dotenv-style file into a map.
///
/// A missing file is not an error and yields an empty map.
pub fn load_env_file<P: AsRef<Path>>(path: P) -> Result<HashMap<String, String>> {
    let path = path.as_ref();
    if !path.exists() {
        debug!("Env file {} not found, skipping", path.display());
        return Ok(HashMap::new());
    }

    let iter = dotenvy::from_path_iter(path)
        .map_err(|e| Error::Config(format!("Failed to read env file {}: {}", path.display(), e)))?;

    let mut map = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(|e| {
            Error::Config(format!("Failed to parse env file {}: {}", path.display(), e))
        })?;
        map.insert(key, value);
    }

    debug!("Loaded {} entries from {}", map.len(), path.display());
    Ok(map)
}

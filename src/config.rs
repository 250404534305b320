//! Client configuration
//!
//! Settings come from an optional TOML file in the platform config directory,
//! with the token overridable from the environment:
//! - `GITHUB_FORGE_TOKEN` (checked first)
//! - `GITHUB_TOKEN`

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::{DEFAULT_TTL, paths};
use crate::error::{ForgeError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Environment variables consulted for the token, in priority order.
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_FORGE_TOKEN", "GITHUB_TOKEN"];

/// Which cache store the client is built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Every call goes to the API
    #[default]
    None,
    /// Per-process in-memory cache
    Memory,
    /// JSON files under the platform cache directory
    Disk,
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bearer token sent with every request
    #[serde(default)]
    pub token: Option<String>,

    /// API root, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub cache: CacheBackend,

    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Request timeout; unset means the HTTP client default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_cache_ttl() -> u64 {
    DEFAULT_TTL.as_secs()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            base_url: default_base_url(),
            cache: CacheBackend::default(),
            cache_ttl_secs: default_cache_ttl(),
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Load the config file from the default location (if present) and apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match paths::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Config::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load configuration from a specific TOML file, without environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }

    /// Overwrite the token with the first non-empty environment value.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = TOKEN_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|value| !value.trim().is_empty())
        {
            self.token = Some(token);
        }
    }

    /// The configured token, or `MissingToken` if none was set.
    pub fn token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ForgeError::MissingToken)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

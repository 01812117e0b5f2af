//! Configuration file parser for ~/.config/newsfeed/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`,
//! which points at the Guardian content API with its public developer key.
use crate::util::{validate_url, UrlError};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Environment variable that overrides `api_key` from the config file.
pub const API_KEY_ENV: &str = "NEWSFEED_API_KEY";

/// Guardian content API search endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://content.guardianapis.com/search";

/// The Guardian's rate-limited public developer key.
const DEFAULT_API_KEY: &str = "test";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid endpoint in config file: {0}")]
    Endpoint(#[from] UrlError),
}

// ============================================================================
// Configuration
// ============================================================================

/// Application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// `Debug` masks `api_key`.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feed endpoint, without the `api-key` query parameter.
    pub endpoint: String,

    /// API key appended as `api-key=`. `NEWSFEED_API_KEY` takes precedence.
    pub api_key: Option<String>,

    /// Upper bound on establishing the TCP/TLS connection.
    pub connect_timeout_secs: u64,

    /// Upper bound on waiting for response data once connected.
    pub read_timeout_secs: u64,

    /// Optional `page-size` query parameter.
    pub page_size: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            connect_timeout_secs: 15,
            read_timeout_secs: 10,
            page_size: None,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("read_timeout_secs", &self.read_timeout_secs)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl Config {
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 5] = [
        "endpoint",
        "api_key",
        "connect_timeout_secs",
        "read_timeout_secs",
        "page_size",
    ];

    /// Default config location: `$HOME/.config/newsfeed/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(
            PathBuf::from(home)
                .join(".config")
                .join("newsfeed")
                .join("config.toml"),
        )
    }

    /// Load configuration from a TOML file.
    ///
    /// - Missing or empty file → `Ok(Config::default())`
    /// - Invalid TOML or wrong value types → `Err(ConfigError::Parse)`
    /// - Unknown keys → accepted, logged as a warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), endpoint = %config.endpoint, "Loaded configuration");
        Ok(config)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs.max(1))
    }

    /// Resolves the API key: environment, then config file, then the public key.
    pub fn api_key(&self) -> SecretString {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone())
            .unwrap_or_else(|| DEFAULT_API_KEY.to_string())
            .into()
    }

    /// Full request URL: `endpoint` plus `api-key` and optional `page-size`.
    pub fn request_url(&self) -> Result<Url, ConfigError> {
        self.request_url_with_key(&self.api_key())
    }

    fn request_url_with_key(&self, key: &SecretString) -> Result<Url, ConfigError> {
        let mut url = validate_url(&self.endpoint)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api-key", key.expose_secret());
            if let Some(size) = self.page_size {
                query.append_pair("page-size", &size.to_string());
            }
        }
        Ok(url)
    }
}

// ============================================================================
// Tests
// ============================================================================

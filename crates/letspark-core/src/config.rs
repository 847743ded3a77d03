//! Application configuration management.
//!
//! This module handles loading and saving the client configuration: the
//! backend base URL, request timeout, which token store to use, and what
//! to do with stored credentials when a refresh is rejected.
//!
//! Configuration is stored at `~/.config/letspark/config.json`. The
//! `LETSPARK_BASE_URL` and `LETSPARK_TOKEN_STORE` environment variables
//! override the file.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth::RefreshFailurePolicy;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "letspark";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// HTTP request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Protected endpoint used to probe whether an access token is still accepted
pub const DEFAULT_PROBE_PATH: &str = "/api/bookings/user-bookings/";

pub const ENV_BASE_URL: &str = "LETSPARK_BASE_URL";
pub const ENV_TOKEN_STORE: &str = "LETSPARK_TOKEN_STORE";

/// Where access and refresh tokens are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStoreKind {
    /// `session.json` in the cache directory
    #[default]
    File,
    /// OS keychain
    Keyring,
    /// Process memory only; nothing survives exit
    Memory,
}

impl FromStr for TokenStoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(TokenStoreKind::File),
            "keyring" => Ok(TokenStoreKind::Keyring),
            "memory" => Ok(TokenStoreKind::Memory),
            other => Err(anyhow::anyhow!("Unknown token store: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub token_store: TokenStoreKind,
    pub refresh_failure: RefreshFailurePolicy,
    pub probe_path: String,
    pub last_username: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            token_store: TokenStoreKind::default(),
            refresh_failure: RefreshFailurePolicy::default(),
            probe_path: DEFAULT_PROBE_PATH.to_string(),
            last_username: None,
        }
    }
}

impl Config {
    /// Load the config file (or defaults) and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_BASE_URL).ok(),
            std::env::var(ENV_TOKEN_STORE).ok(),
        );
    }

    /// Apply base URL and token store overrides. A blank URL and an
    /// unknown store name are ignored.
    pub fn apply_overrides(&mut self, base_url: Option<String>, token_store: Option<String>) {
        if let Some(url) = base_url {
            if !url.trim().is_empty() {
                self.base_url = url.trim().to_string();
            }
        }
        if let Some(kind) = token_store {
            match kind.parse() {
                Ok(kind) => self.token_store = kind,
                Err(e) => warn!(error = %e, "Ignoring {}", ENV_TOKEN_STORE),
            }
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.token_store, TokenStoreKind::File);
        assert_eq!(config.refresh_failure, RefreshFailurePolicy::Retain);
        assert_eq!(config.probe_path, DEFAULT_PROBE_PATH);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let config = Config {
            base_url: "https://park.example.com".to_string(),
            token_store: TokenStoreKind::Keyring,
            refresh_failure: RefreshFailurePolicy::Clear,
            last_username: Some("alice".to_string()),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.base_url, "https://park.example.com");
        assert_eq!(loaded.token_store, TokenStoreKind::Keyring);
        assert_eq!(loaded.refresh_failure, RefreshFailurePolicy::Clear);
        assert_eq!(loaded.last_username.as_deref(), Some("alice"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{"token_store": "memory"}"#).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.token_store, TokenStoreKind::Memory);
        assert_eq!(loaded.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_token_store_kind_from_str() {
        assert_eq!("File".parse::<TokenStoreKind>().unwrap(), TokenStoreKind::File);
        assert_eq!(" keyring ".parse::<TokenStoreKind>().unwrap(), TokenStoreKind::Keyring);
        assert!("vault".parse::<TokenStoreKind>().is_err());
    }

    #[test]
    fn test_overrides_replace_url_and_store() {
        let mut config = Config::default();
        config.apply_overrides(
            Some(" https://park.example.com ".to_string()),
            Some("Keyring".to_string()),
        );
        assert_eq!(config.base_url, "https://park.example.com");
        assert_eq!(config.token_store, TokenStoreKind::Keyring);
    }

    #[test]
    fn test_blank_url_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(Some("   ".to_string()), None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.token_store, TokenStoreKind::File);
    }

    #[test]
    fn test_unknown_store_override_keeps_file_value() {
        let mut config = Config {
            token_store: TokenStoreKind::Memory,
            ..Config::default()
        };
        config.apply_overrides(None, Some("vault".to_string()));
        assert_eq!(config.token_store, TokenStoreKind::Memory);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}

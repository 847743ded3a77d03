use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::credentials::KeyringTokenStore;
use super::store::{MemoryTokenStore, TokenKind, TokenStore};
use super::token::{AccessToken, RefreshToken};
use crate::config::{Config, TokenStoreKind};
use crate::models::TokenPair;

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionFile {
    access_token: Option<String>,
    refresh_token: Option<String>,
    updated_at: Option<DateTime<Utc>>,
}

impl SessionFile {
    fn slot(&mut self, kind: TokenKind) -> &mut Option<String> {
        match kind {
            TokenKind::Access => &mut self.access_token,
            TokenKind::Refresh => &mut self.refresh_token,
        }
    }

    fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// Token store persisted as `session.json` in the cache directory.
/// Reads and writes go through a mutex so tasks in one process never
/// interleave a read-modify-write.
pub struct FileTokenStore {
    cache_dir: PathBuf,
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            lock: Mutex::new(()),
        }
    }

    pub fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }

    fn read(path: &Path) -> Result<SessionFile> {
        if !path.exists() {
            return Ok(SessionFile::default());
        }
        let contents = std::fs::read_to_string(path).context("Failed to read session file")?;
        serde_json::from_str(&contents).context("Failed to parse session file")
    }

    fn write(path: &Path, data: &SessionFile) -> Result<()> {
        if data.is_empty() {
            if path.exists() {
                std::fs::remove_file(path).context("Failed to remove session file")?;
            }
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(data)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, contents).context("Failed to write session file")?;
        std::fs::rename(&tmp, path).context("Failed to replace session file")?;
        Ok(())
    }

    fn update(&self, kind: TokenKind, value: Option<&str>) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| anyhow::anyhow!("Session file lock poisoned"))?;
        let path = self.session_path();
        // An unreadable file must not block logout or a fresh login
        let mut data = Self::read(&path).unwrap_or_else(|e| {
            warn!(error = %e, "Discarding unreadable session file");
            SessionFile::default()
        });
        *data.slot(kind) = value.map(str::to_string);
        data.updated_at = Some(Utc::now());
        Self::write(&path, &data)
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, kind: TokenKind) -> Result<Option<String>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| anyhow::anyhow!("Session file lock poisoned"))?;
        let mut data = Self::read(&self.session_path())?;
        Ok(data.slot(kind).take())
    }

    fn set(&self, kind: TokenKind, value: &str) -> Result<()> {
        self.update(kind, Some(value))
    }

    fn clear(&self, kind: TokenKind) -> Result<()> {
        self.update(kind, None)
    }
}

/// The credential pair as the rest of the crate sees it. Every read and
/// write of tokens goes through here rather than the raw store.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn TokenStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Open the backend selected in the config
    pub fn open(config: &Config) -> Result<Self> {
        let store: Arc<dyn TokenStore> = match config.token_store {
            TokenStoreKind::File => Arc::new(FileTokenStore::new(config.cache_dir()?)),
            TokenStoreKind::Keyring => Arc::new(KeyringTokenStore::default()),
            TokenStoreKind::Memory => Arc::new(MemoryTokenStore::new()),
        };
        debug!(backend = ?config.token_store, "Token store opened");
        Ok(Self::new(store))
    }

    /// Read one slot. A storage error is logged and reported as absent.
    fn read(&self, kind: TokenKind) -> Option<String> {
        match self.store.get(kind) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!(token = kind.key(), error = %e, "Failed to read stored token");
                None
            }
        }
    }

    pub fn access_token(&self) -> Option<AccessToken> {
        self.read(TokenKind::Access).map(AccessToken::new)
    }

    pub fn refresh_token(&self) -> Option<RefreshToken> {
        self.read(TokenKind::Refresh).map(RefreshToken::new)
    }

    /// Both credentials, or None if either is missing
    pub fn credentials(&self) -> Option<(AccessToken, RefreshToken)> {
        Some((self.access_token()?, self.refresh_token()?))
    }

    pub fn has_session(&self) -> bool {
        self.credentials().is_some()
    }

    /// Persist the pair issued by a successful login. If the refresh token
    /// cannot be written the new access token is removed again, so the store
    /// never pairs it with an older refresh token.
    pub fn save_login(&self, pair: &TokenPair) -> Result<()> {
        self.store.set(TokenKind::Access, &pair.access)?;
        if let Err(e) = self.store.set(TokenKind::Refresh, &pair.refresh) {
            if let Err(rollback) = self.store.clear(TokenKind::Access) {
                warn!(error = %rollback, "Failed to roll back access token");
            }
            return Err(e);
        }
        debug!("Stored login credentials");
        Ok(())
    }

    /// Overwrite the access token after a refresh; the refresh token is kept
    pub fn replace_access(&self, access: &AccessToken) -> Result<()> {
        self.store.set(TokenKind::Access, access.as_str())
    }

    /// Remove both credentials
    pub fn clear(&self) -> Result<()> {
        for kind in TokenKind::ALL {
            self.store.clear(kind)?;
        }
        debug!("Cleared stored credentials");
        Ok(())
    }
}

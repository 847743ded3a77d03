use anyhow::{Context, Result};
use keyring::Entry;

use super::store::{TokenKind, TokenStore};

const SERVICE_NAME: &str = "letspark";

/// Token store backed by the OS keychain, one entry per token kind
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    service: String,
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new(SERVICE_NAME)
    }
}

impl KeyringTokenStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, kind: TokenKind) -> Result<Entry> {
        Entry::new(&self.service, kind.key()).context("Failed to create keyring entry")
    }
}

impl TokenStore for KeyringTokenStore {
    /// Retrieve a token from the OS keychain
    fn get(&self, kind: TokenKind) -> Result<Option<String>> {
        match self.entry(kind)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to retrieve token from keychain"),
        }
    }

    /// Store a token in the OS keychain
    fn set(&self, kind: TokenKind, value: &str) -> Result<()> {
        self.entry(kind)?
            .set_password(value)
            .context("Failed to store token in keychain")
    }

    /// Delete a stored token
    fn clear(&self, kind: TokenKind) -> Result<()> {
        match self.entry(kind)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete token from keychain"),
        }
    }
}

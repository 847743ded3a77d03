use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;

/// The two credential slots a store holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub const ALL: [TokenKind; 2] = [TokenKind::Access, TokenKind::Refresh];

    /// Storage key for this slot
    pub fn key(self) -> &'static str {
        match self {
            TokenKind::Access => "access_token",
            TokenKind::Refresh => "refresh_token",
        }
    }
}

/// Backing storage for credentials.
///
/// Implementations must be safe to share between tasks; the session store
/// holds one behind an `Arc`. Clearing an absent entry is not an error.
pub trait TokenStore: Send + Sync {
    fn get(&self, kind: TokenKind) -> Result<Option<String>>;
    fn set(&self, kind: TokenKind, value: &str) -> Result<()>;
    fn clear(&self, kind: TokenKind) -> Result<()>;
}

/// Process-local store. Used by tests and `--ephemeral` runs.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<TokenKind, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the given slots
    pub fn with_tokens(access: Option<&str>, refresh: Option<&str>) -> Self {
        let mut entries = HashMap::new();
        if let Some(access) = access {
            entries.insert(TokenKind::Access, access.to_string());
        }
        if let Some(refresh) = refresh {
            entries.insert(TokenKind::Refresh, refresh.to_string());
        }
        Self {
            entries: Mutex::new(entries),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<TokenKind, String>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("Token store lock poisoned"))
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, kind: TokenKind) -> Result<Option<String>> {
        Ok(self.lock()?.get(&kind).cloned())
    }

    fn set(&self, kind: TokenKind, value: &str) -> Result<()> {
        self.lock()?.insert(kind, value.to_string());
        Ok(())
    }

    fn clear(&self, kind: TokenKind) -> Result<()> {
        self.lock()?.remove(&kind);
        Ok(())
    }
}

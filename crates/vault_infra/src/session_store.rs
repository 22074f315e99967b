//! Session persistence for the connected wallet address.
//!
//! Key/value storage with one well-known key. Only the address is ever
//! persisted; no financial state survives a session.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use vault_core::session::WalletAddress;

/// Storage key for the connected wallet address.
pub const SESSION_ADDRESS_KEY: &str = "arkadiko_stx_address";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStoreError {
    Io { reason: String },
    Corrupt { reason: String },
}

impl fmt::Display for SessionStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStoreError::Io { reason } => write!(f, "session store io error: {reason}"),
            SessionStoreError::Corrupt { reason } => {
                write!(f, "session store is corrupt: {reason}")
            }
        }
    }
}

impl std::error::Error for SessionStoreError {}

pub trait SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError>;
    fn remove(&self, key: &str) -> Result<(), SessionStoreError>;
}

/// Saved wallet address, if any. Read errors and empty values read as none.
pub fn saved_address(store: &impl SessionStore) -> Option<WalletAddress> {
    match store.get(SESSION_ADDRESS_KEY) {
        Ok(Some(raw)) => WalletAddress::new(raw).ok(),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("SessionRestoreFailed error={e}");
            None
        }
    }
}

// --- In-memory ----------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a saved address.
    pub fn with_address(address: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .lock()
            .expect("session store mutex poisoned")
            .insert(SESSION_ADDRESS_KEY.to_string(), address.to_string());
        store
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        Ok(self
            .entries
            .lock()
            .expect("session store mutex poisoned")
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        self.entries
            .lock()
            .expect("session store mutex poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionStoreError> {
        self.entries
            .lock()
            .expect("session store mutex poisoned")
            .remove(key);
        Ok(())
    }
}

// --- JSON file ----------------------------------------------------------

/// On-disk layout: `{"entries": {"<key>": "<value>"}}`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    entries: HashMap<String, String>,
}

/// File-backed store, rewritten on every change.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileSessionStore {
    /// Open (or create on first write) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionStoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = load_entries(&path)?;
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let file = SessionFile {
            entries: entries.clone(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|e| SessionStoreError::Io {
            reason: e.to_string(),
        })?;
        std::fs::write(&self.path, json).map_err(io_error)
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        Ok(self
            .entries
            .lock()
            .expect("session store mutex poisoned")
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        let mut entries = self.entries.lock().expect("session store mutex poisoned");
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionStoreError> {
        let mut entries = self.entries.lock().expect("session store mutex poisoned");
        let mut next = entries.clone();
        if next.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}

fn load_entries(path: &Path) -> Result<HashMap<String, String>, SessionStoreError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => return Err(io_error(e)),
    };
    if raw.trim().is_empty() {
        return Ok(HashMap::new());
    }
    let file: SessionFile = serde_json::from_str(&raw).map_err(|e| SessionStoreError::Corrupt {
        reason: format!("{}: {e}", path.display()),
    })?;
    Ok(file.entries)
}

fn io_error(e: std::io::Error) -> SessionStoreError {
    SessionStoreError::Io {
        reason: e.to_string(),
    }
}

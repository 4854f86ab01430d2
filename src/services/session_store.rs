// src/services/session_store.rs
use std::{
    collections::HashMap,
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, RwLock},
};

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::StorageError;

/// Storage key under which the session identifier is persisted.
pub const SESSION_KEY: &str = "hr_session_id";

/// Durable string key-value storage, the native stand-in for browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Return the persisted session id, generating and storing one on first use.
pub fn get_or_create_session_id(store: &dyn KeyValueStore) -> Result<String, StorageError> {
    if let Some(existing) = store.get(SESSION_KEY)? {
        if !existing.trim().is_empty() {
            debug!(session_id = %existing, "reusing stored session id");
            return Ok(existing);
        }
    }

    let id = generate_token();
    store.set(SESSION_KEY, &id)?;
    info!(session_id = %id, "created new session id");
    Ok(id)
}

/// Random lowercase base-36 token. Not suitable for anything security related.
pub fn generate_token() -> String {
    to_base36(Uuid::new_v4().as_u128())
}

fn to_base36(mut n: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Process-local store. A fresh instance is a fresh storage scope.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry, like clearing site data.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.clear();
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self.inner.read().map_err(|_| StorageError::Poisoned)?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self.inner.write().map_err(|_| StorageError::Poisoned)?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object on disk, one entry per key.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<HashMap<String, String>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(source) => {
                return Err(StorageError::Io { path: self.display_path(), source });
            }
        };
        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
            path: self.display_path(),
            source,
        })
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io { path: self.display_path(), source };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let json = serde_json::to_string_pretty(entries).map_err(|source| StorageError::Corrupt {
            path: self.display_path(),
            source,
        })?;
        fs::write(&self.path, json).map_err(io_err)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }
}

//! Key/value persistence for session state.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session must survive process restarts, so the token and cached user
//! live in a small key/value store. `FileStorage` keeps one file per key in
//! the session directory; `MemoryStorage` backs tests and embedders that
//! manage persistence themselves.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Minimal string key/value store.
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, ApiError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), ApiError>;
    fn remove_item(&self, key: &str) -> Result<(), ApiError>;
}

/// Load a JSON value for `key`. Missing, unreadable or malformed values are
/// all `None`.
pub fn load_json<T: DeserializeOwned>(storage: &dyn KeyValueStorage, key: &str) -> Option<T> {
    let raw = match storage.get_item(key) {
        Ok(raw) => raw?,
        Err(e) => {
            tracing::warn!(key, error = %e, "storage read failed");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "stored value is not valid JSON");
            None
        }
    }
}

/// Save a JSON value for `key`.
pub fn save_json<T: Serialize>(storage: &dyn KeyValueStorage, key: &str, value: &T) -> Result<(), ApiError> {
    let raw = serde_json::to_string(value).map_err(|e| ApiError::Storage(e.to_string()))?;
    storage.set_item(key, &raw)
}

// =============================================================================
// FILE STORAGE
// =============================================================================

/// One file per key under `dir`. Writes go through a temp file and a rename
/// so a crash never leaves a half-written token behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, ApiError> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(ApiError::Storage(format!("invalid storage key '{key}'")));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, ApiError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ApiError::Storage(format!("read {}: {e}", path.display()))),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), ApiError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| ApiError::Storage(format!("create {}: {e}", self.dir.display())))?;

        let tmp = self.dir.join(format!(".{key}.tmp"));
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(&tmp)
            .map_err(|e| ApiError::Storage(format!("open {}: {e}", tmp.display())))?;
        file.write_all(value.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| ApiError::Storage(format!("write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &path).map_err(|e| ApiError::Storage(format!("rename {}: {e}", path.display())))
    }

    fn remove_item(&self, key: &str) -> Result<(), ApiError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::Storage(format!("remove {}: {e}", path.display()))),
        }
    }
}

// =============================================================================
// MEMORY STORAGE
// =============================================================================

/// Process-local storage. Clones share the same map, so a test can keep a
/// handle and inspect what the session store persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, ApiError> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), ApiError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), ApiError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.remove(key);
        Ok(())
    }
}

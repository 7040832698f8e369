#![forbid(unsafe_code)]

//! Key/value preference storage.
//!
//! The page persists one small preference (the theme) through a
//! [`StorageBackend`]. Browsers back it with `localStorage`; tests and native
//! hosts use [`MemoryStorage`].
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `Unavailable` | storage disabled (private mode, sandbox) | caller logs and continues |
//! | `Rejected` | quota exceeded or write refused | caller logs and continues |
//! | `Corruption` | poisoned lock | caller logs and continues |
//!
//! Storage failures never stop the page; the preference simply is not kept.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

/// Errors from storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Backend cannot be reached at all.
    Unavailable(String),
    /// Backend refused a write.
    Rejected(String),
    /// Backend state is unusable.
    Corruption(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
            Self::Rejected(msg) => write!(f, "storage write rejected: {msg}"),
            Self::Corruption(msg) => write!(f, "storage corruption: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Pluggable string storage.
///
/// Methods take `&self`; backends use interior mutability.
pub trait StorageBackend {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Value stored under `key`, `None` when absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Check if the backend is operational.
    fn is_available(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// In-memory storage. Clones share the same map.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    data: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with `entries`.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            data: Arc::new(RwLock::new(map)),
        }
    }

    /// Number of stored keys. A poisoned map counts as empty.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().map(|m| m.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> StorageError {
    StorageError::Corruption("lock poisoned".into())
}

impl StorageBackend for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let guard = self.data.read().map_err(poisoned)?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut guard = self.data.write().map_err(poisoned)?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut guard = self.data.write().map_err(poisoned)?;
        guard.remove(key);
        Ok(())
    }
}

/// Backend that refuses everything, as `localStorage` does when blocked.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStorage;

impl StorageBackend for UnavailableStorage {
    fn name(&self) -> &str {
        "UnavailableStorage"
    }

    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Unavailable("storage disabled".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("storage disabled".into()))
    }

    fn remove(&self, _key: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("storage disabled".into()))
    }

    fn is_available(&self) -> bool {
        false
    }
}

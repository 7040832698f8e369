#![forbid(unsafe_code)]

//! `localStorage` backend.
//!
//! Browsers may deny access entirely (privacy modes, sandboxed iframes) or
//! reject writes (quota). Both surface as [`StorageError`]s; the theme
//! component treats them as "no preference".

use folio_web::{StorageBackend, StorageError, StorageResult};
use web_sys::{Storage, Window};

use crate::wasm::describe_js_error;

/// [`StorageBackend`] over `window.localStorage`.
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    /// Resolve `localStorage` once. Access errors leave the backend
    /// unavailable instead of failing startup.
    #[must_use]
    pub fn new(window: &Window) -> Self {
        Self {
            storage: window.local_storage().ok().flatten(),
        }
    }

    fn backend(&self) -> StorageResult<&Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("localStorage is not accessible".into()))
    }
}

impl StorageBackend for LocalStorage {
    fn name(&self) -> &str {
        "localStorage"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.backend()?
            .get_item(key)
            .map_err(|err| StorageError::Unavailable(describe_js_error(&err)))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.backend()?
            .set_item(key, value)
            .map_err(|err| StorageError::Rejected(describe_js_error(&err)))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.backend()?
            .remove_item(key)
            .map_err(|err| StorageError::Rejected(describe_js_error(&err)))
    }

    fn is_available(&self) -> bool {
        self.storage.is_some()
    }
}

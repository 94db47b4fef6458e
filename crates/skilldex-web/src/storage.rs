//! `localStorage` backend.

use skilldex_core::storage::{StorageBackend, StorageError, StorageResult};

use crate::dom::js_error_message;

/// Browser `localStorage`. Unavailable (private mode, disabled storage)
/// behaves like an empty store that refuses writes.
#[derive(Debug, Default)]
pub(crate) struct LocalStorageBackend {
    storage: Option<web_sys::Storage>,
}

impl LocalStorageBackend {
    pub(crate) fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            tracing::warn!("localStorage unavailable, availability will not persist");
        }
        Self { storage }
    }
}

impl StorageBackend for LocalStorageBackend {
    fn name(&self) -> &str {
        "LocalStorage"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match &self.storage {
            Some(storage) => storage
                .get_item(key)
                .map_err(|e| StorageError::Backend(js_error_message(&e))),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".into()))?;
        // Quota errors surface here.
        storage
            .set_item(key, value)
            .map_err(|e| StorageError::Backend(js_error_message(&e)))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        match &self.storage {
            Some(storage) => storage
                .remove_item(key)
                .map_err(|e| StorageError::Backend(js_error_message(&e))),
            None => Ok(()),
        }
    }

    fn is_available(&self) -> bool {
        self.storage.is_some()
    }
}

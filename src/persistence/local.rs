//! Browser LocalStorage backend

use web_sys::Storage;

use super::{KeyValueStore, StoreError};

/// Preferences stored in `window.localStorage`, one entry per key
pub struct LocalStore {
    storage: Option<Storage>,
    prefix: String,
}

impl LocalStore {
    /// Keys are stored as `{prefix}{key}`
    pub fn new(prefix: &str) -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - preferences will not persist");
        }
        Self {
            storage,
            prefix: prefix.to_string(),
        }
    }

    fn raw_get(&self, key: &str) -> Option<String> {
        let storage = self.storage.as_ref()?;
        storage.get_item(&format!("{}{}", self.prefix, key)).ok()?
    }

    fn raw_set(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            let _ = storage.set_item(&format!("{}{}", self.prefix, key), value);
        }
    }
}

impl KeyValueStore for LocalStore {
    fn get_int(&self, key: &str) -> Option<i64> {
        self.raw_get(key)?.parse().ok()
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.raw_set(key, &value.to_string());
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.raw_get(key)
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.raw_set(key, value);
    }

    fn save(&mut self) -> Result<(), StoreError> {
        // LocalStorage writes are synchronous
        if self.storage.is_none() {
            return Err(StoreError::Unavailable("window.localStorage".to_string()));
        }
        Ok(())
    }
}

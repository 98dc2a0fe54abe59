//! Durable key-value storage
//!
//! Backends:
//! - [`MemoryStore`]: process-local, used by tests and headless runs
//! - [`FileStore`]: JSON document on disk (native only)
//! - [`LocalStore`]: browser LocalStorage (wasm only)
//!
//! Reads never fail; a missing or unreadable key reads as `None`. Writes are
//! buffered until [`KeyValueStore::save`].

use std::collections::BTreeMap;

use serde_json::Value;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

/// Storage failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Integer and string preferences keyed by name
pub trait KeyValueStore {
    fn get_int(&self, key: &str) -> Option<i64>;
    fn set_int(&mut self, key: &str, value: i64);
    fn get_string(&self, key: &str) -> Option<String>;
    fn set_string(&mut self, key: &str, value: &str);
    /// Flush pending writes to the backing medium
    fn save(&mut self) -> Result<(), StoreError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, Value>,
    /// Number of `set_int`/`set_string` calls seen
    pub writes: u32,
    /// Number of `save` calls seen
    pub saves: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get(key).and_then(Value::as_i64)
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.writes += 1;
        self.values.insert(key.to_string(), Value::from(value));
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.writes += 1;
        self.values.insert(key.to_string(), Value::from(value));
    }

    fn save(&mut self) -> Result<(), StoreError> {
        self.saves += 1;
        Ok(())
    }
}

/// Flush a store, logging instead of propagating failure
pub fn save_or_warn(store: &mut dyn KeyValueStore) {
    if let Err(e) = store.save() {
        log::warn!("Failed to save preferences: {}", e);
    }
}

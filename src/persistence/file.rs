//! JSON file backend

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{KeyValueStore, StoreError};

/// Preferences stored as one JSON object on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
    dirty: bool,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store; a corrupt
    /// one is an error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        log::debug!("Opened preferences at {} ({} keys)", path.display(), values.len());
        Ok(Self {
            path,
            values,
            dirty: false,
        })
    }

    /// Open the store, starting empty if the file is unreadable
    pub fn open_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::open(path).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable preferences {}: {}", path.display(), e);
            Self {
                path: path.to_path_buf(),
                values: BTreeMap::new(),
                dirty: false,
            }
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get(key).and_then(Value::as_i64)
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), Value::from(value));
        self.dirty = true;
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), Value::from(value));
        self.dirty = true;
    }

    fn save(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }
        // Write to a sibling temp file, then rename over the old one
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&self.values)?)?;
        fs::rename(&tmp, &self.path)?;
        self.dirty = false;
        log::debug!("Preferences saved to {}", self.path.display());
        Ok(())
    }
}

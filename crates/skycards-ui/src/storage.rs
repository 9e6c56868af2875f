//! Local key-value store holding pinned cities and the theme.
//!
//! `FileStore` keeps every key in one JSON object on disk; `MemoryStore`
//! backs tests and runs where nothing should touch the filesystem.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use skycards_core::StorageError;

/// String-keyed, string-valued store with browser `localStorage` semantics
pub trait KeyValueStore: Send + Sync {
    /// # Errors
    /// Returns `StorageError::Corruption` if the backing data can't be parsed.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    /// Returns `StorageError::WriteFailed` if the value can't be persisted.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// JSON-file-backed store. Writes go through a temp file and a rename.
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

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StorageError::ReadFailed(e.to_string())),
        };

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|e| StorageError::Corruption(e.to_string()))
    }

    /// Map to write back into; a corrupt file is replaced rather than kept
    fn read_map_for_write(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_map() {
            Err(StorageError::Corruption(e)) => {
                tracing::warn!("Replacing corrupt store at {}: {}", self.path.display(), e);
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(map)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json).map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StorageError::WriteFailed(e.to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock();
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut map = self.read_map_for_write()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut map = self.read_map_for_write()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// In-process store; contents vanish with the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.lock().remove(key);
        Ok(())
    }
}

//! File-backed key/value storage.
//!
//! Persists all slots as a single JSON document. Every write rewrites the
//! whole document through a temp-file rename, so a slot is either fully
//! written or unchanged.

use crate::error::StorageResult;
use crate::kv::KeyValueStorage;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// [`KeyValueStorage`] persisted as one JSON object on disk.
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles between threads of one process.
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Creates storage backed by the given file. The file is created on
    /// first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> StorageResult<Map<String, Value>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "storage file does not exist yet");
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        let value: Value = serde_json::from_str(&content)?;
        Ok(value.as_object().cloned().unwrap_or_default())
    }

    fn write_document(&self, document: &Map<String, Value>) -> StorageResult<()> {
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&Value::Object(document.clone()))?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let document = self.read_document()?;
        Ok(document
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut document = self.read_document()?;
        document.insert(key.to_string(), Value::String(value.to_string()));
        self.write_document(&document)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut document = self.read_document()?;
        if document.remove(key).is_some() {
            self.write_document(&document)?;
        }
        Ok(())
    }
}

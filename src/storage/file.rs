//! File-backed key-value store.
//!
//! All entries live in one JSON object file, by default
//! `~/.boundaries/storage.json`. Every write rewrites the file atomically via
//! temp file + rename. A corrupt file reads as empty and is replaced on the
//! next write.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::Config;
use crate::error::{BoundariesError, Result};
use crate::storage::LocalStore;
use crate::util::{atomic_write, read_optional, MAX_FILE_SIZE};

/// File-backed key-value store.
#[derive(Debug)]
pub struct FileStore {
    /// Path of the JSON file.
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStore {
    /// Open the store at the path named by the configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let path = config.storage_path().ok_or_else(|| {
            BoundariesError::config("Could not determine storage location (no home directory)")
        })?;
        Ok(Self::with_path(path))
    }

    /// Open the store at an explicit path. The file is created lazily on the
    /// first write.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all entries.
    ///
    /// A file that is not a JSON object of strings is discarded with a warning.
    fn load(&self) -> Result<BTreeMap<String, String>> {
        let Some(content) = read_optional(&self.path, MAX_FILE_SIZE)? else {
            return Ok(BTreeMap::new());
        };

        match serde_json::from_str::<BTreeMap<String, String>>(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "discarding malformed storage file"
                );
                Ok(BTreeMap::new())
            }
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        atomic_write(&self.path, &json)
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.load()?.into_keys().collect())
    }
}

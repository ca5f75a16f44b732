//! JSON file-based key-value store.
//!
//! All entries live in one human-readable JSON file. Writes go to a temporary
//! file first and are renamed into place, so a crash never leaves a torn file.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(1) - the file is loaded into memory once on open
//! - **Write**: O(n) - the whole map is re-serialized on every `set`
//! - **Best for**: a handful of keys holding whole-list blobs, written once per fetch

use crate::domain::error::{RateListError, Result};
use crate::storage::backend::{KeyValueStore, StoreWrite};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Version written into new store files.
const STORE_VERSION: u32 = 1;

/// On-disk container format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    /// Version of the storage format for future migrations.
    version: u32,

    /// Raw values keyed by store key.
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// JSON file store.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "entries": {
///     "cachedProducts": "[{\"id\":\"P-1\",\"name\":\"Silk Suit\"}]",
///     "lastDataUpdate": "2025-03-15T12:00:00Z"
///   }
/// }
/// ```
#[derive(Debug)]
pub struct JsonFileStore {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// Mirrors the file; only changes that reached disk are applied here.
    data: Mutex<StorageData>,
}

impl JsonFileStore {
    /// Opens a store file, creating parent directories as needed.
    ///
    /// A missing file starts an empty store. A file that exists but cannot be
    /// parsed is treated the same way (logged at warn): a corrupt cache must
    /// never stop the client from starting. It is overwritten on the next write.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the file
    /// exists but cannot be read.
    pub async fn open(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening JSON store");

        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let data = if tokio::fs::try_exists(&file_path).await? {
            Self::load_from_file(&file_path).await?
        } else {
            tracing::debug!("initializing new empty store");
            StorageData::default()
        };

        tracing::debug!(entries = data.entries.len(), "store opened");

        Ok(Self {
            file_path,
            data: Mutex::new(data),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    async fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = tokio::fs::read_to_string(path).await?;
        match serde_json::from_str::<StorageData>(&contents) {
            Ok(data) => {
                tracing::debug!(version = data.version, entries = data.entries.len(), "loaded store data");
                Ok(data)
            }
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "store file is corrupt, starting empty");
                Ok(StorageData::default())
            }
        }
    }

    fn serialize(data: &StorageData) -> Result<String> {
        serde_json::to_string_pretty(data)
            .map_err(|e| RateListError::Storage(format!("failed to serialize store: {e}")))
    }

    async fn write_file(&self, data: &StorageData) -> Result<()> {
        let json = Self::serialize(data)?;
        let tmp_path = self.file_path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        tokio::fs::write(&tmp_path, json).await?;
        tokio::fs::rename(&tmp_path, &self.file_path).await?;

        tracing::debug!(path = ?self.file_path, "store saved");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let data = self.data.lock().await;
        let value = data.entries.get(key).cloned();
        tracing::trace!(key, found = value.is_some(), "store get");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.write_batch(&[StoreWrite::Set { key, value }]).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.write_batch(&[StoreWrite::Remove { key }]).await
    }

    #[tracing::instrument(level = "debug", skip_all, fields(writes = writes.len()))]
    async fn write_batch(&self, writes: &[StoreWrite<'_>]) -> Result<()> {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        let mut changed = false;

        for write in writes {
            match *write {
                StoreWrite::Set { key, value } => {
                    next.entries.insert(key.to_string(), value.to_string());
                    changed = true;
                }
                StoreWrite::Remove { key } => changed |= next.entries.remove(key).is_some(),
            }
        }

        if !changed {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        self.write_file(&next).await?;
        *data = next;
        Ok(())
    }
}

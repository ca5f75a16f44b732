//! In-memory key-value store.

use crate::domain::error::Result;
use crate::storage::backend::{KeyValueStore, StoreWrite};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Process-local store with no persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn write_batch(&self, writes: &[StoreWrite<'_>]) -> Result<()> {
        let mut entries = self.entries.lock().await;
        for write in writes {
            match *write {
                StoreWrite::Set { key, value } => {
                    entries.insert(key.to_string(), value.to_string());
                }
                StoreWrite::Remove { key } => {
                    entries.remove(key);
                }
            }
        }
        Ok(())
    }
}

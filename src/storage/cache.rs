//! Typed cache access on top of a [`KeyValueStore`].
//!
//! Reads never fail: a missing key, an unreadable backend and a corrupt value
//! all come back as `None`, with the cause logged. Writes return errors so the
//! caller can log them, but callers treat them as non-fatal.

use crate::domain::error::Result;
use crate::domain::Product;
use crate::storage::backend::{KeyValueStore, StoreWrite};
use crate::storage::models::{AdminConfig, CacheRecord, ADMIN_CONFIG_KEY, CACHED_PRODUCTS_KEY, LAST_UPDATE_KEY};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Cache of the last good product list plus the stored admin config.
#[derive(Clone)]
pub struct CacheStore {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore").finish_non_exhaustive()
    }
}

impl CacheStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Reads a raw value, mapping backend failures to `None`.
    async fn read_raw(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "store read failed, treating as absent");
                None
            }
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read_raw(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "stored value is corrupt, treating as absent");
                None
            }
        }
    }

    /// Loads the cached product list, if one was stored and is readable.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn load_products(&self) -> Option<CacheRecord> {
        let products: Vec<Product> = self.read_json(CACHED_PRODUCTS_KEY).await?;
        let last_update = self.read_raw(LAST_UPDATE_KEY).await;

        tracing::debug!(count = products.len(), has_timestamp = last_update.is_some(), "cache loaded");
        Some(CacheRecord { products, last_update })
    }

    /// Replaces the cached list and its timestamp in one store update.
    ///
    /// When `last_update` is `None` the stored timestamp is removed so an old
    /// time is never shown next to a new list.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store update fails. The
    /// previous list and timestamp are then kept.
    #[tracing::instrument(level = "debug", skip(self, products), fields(count = products.len()))]
    pub async fn save_products(&self, products: &[Product], last_update: Option<&str>) -> Result<()> {
        let json = serde_json::to_string(products)?;
        let timestamp = match last_update {
            Some(time) => StoreWrite::Set { key: LAST_UPDATE_KEY, value: time },
            None => StoreWrite::Remove { key: LAST_UPDATE_KEY },
        };
        self.store
            .write_batch(&[StoreWrite::Set { key: CACHED_PRODUCTS_KEY, value: &json }, timestamp])
            .await?;

        tracing::debug!("cache written");
        Ok(())
    }

    /// Loads the stored admin config.
    pub async fn load_admin_config(&self) -> Option<AdminConfig> {
        self.read_json(ADMIN_CONFIG_KEY).await
    }

    /// Persists the admin config.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub async fn save_admin_config(&self, config: &AdminConfig) -> Result<()> {
        let json = serde_json::to_string(config)?;
        self.store.set(ADMIN_CONFIG_KEY, &json).await
    }
}

//! Key-value store abstraction.
//!
//! This module defines the [`KeyValueStore`] trait the cache layer persists
//! through. Values are opaque strings (JSON blobs or ISO timestamps) written and
//! read whole; there is no partial update.
//!
//! # Design Philosophy
//!
//! The trait mirrors the handful of operations the client actually performs
//! rather than a general database API. Typed access (products, admin config)
//! lives one layer up in [`crate::storage::CacheStore`].

use crate::domain::error::Result;
use async_trait::async_trait;

/// One change in a [`KeyValueStore::write_batch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreWrite<'a> {
    Set { key: &'a str, value: &'a str },
    Remove { key: &'a str },
}

/// Abstraction over persistent string key-value backends.
///
/// # Implementations
///
/// - [`crate::storage::JsonFileStore`]: single JSON file with atomic writes (default)
/// - [`crate::storage::MemoryStore`]: process-local map, used in tests and
///   when no persistence is wanted
///
/// # Examples
///
/// ```no_run
/// use ratelist::storage::{JsonFileStore, KeyValueStore};
/// use std::path::PathBuf;
///
/// # async fn demo() -> ratelist::Result<()> {
/// let store = JsonFileStore::open(PathBuf::from("/tmp/ratelist/store.json")).await?;
/// store.set("lastDataUpdate", "2025-03-15T12:00:00Z").await?;
/// assert!(store.get("lastDataUpdate").await?.is_some());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// Returns `Ok(None)` when the key has never been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails. The previous value is left intact.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be updated.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Applies every change in `writes`, in order, as one update.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails, in which case none of the
    /// changes are visible.
    async fn write_batch(&self, writes: &[StoreWrite<'_>]) -> Result<()>;
}

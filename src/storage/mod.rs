//! Storage layer for the product cache and admin configuration.
//!
//! Persistence is a plain string key-value store holding whole blobs. The
//! typed [`CacheStore`] on top of it turns every read failure into "no prior
//! value" so storage problems degrade the fallback chain instead of crashing.
//!
//! # Modules
//!
//! - `backend`: Key-value trait abstraction
//! - `json`: JSON file store with atomic writes
//! - `memory`: In-memory store
//! - `cache`: Typed product/admin-config access
//! - `models`: Store keys and persisted record types

pub mod backend;
pub mod cache;
pub mod json;
pub mod memory;
pub mod models;

pub use backend::{KeyValueStore, StoreWrite};
pub use cache::CacheStore;
pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use models::{AdminConfig, CacheRecord};

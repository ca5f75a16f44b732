//! Network, cache and sample fallback against a real store file.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use ratelist::domain::WireProduct;
use ratelist::fetch::{sample_products, FetchOrchestrator, FetchState, FetchTrigger, ListPayload, ProductSource};
use ratelist::notify::Severity;
use ratelist::storage::{CacheStore, JsonFileStore};
use ratelist::{RateListError, Result};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

struct OnlineSource;

#[async_trait]
impl ProductSource for OnlineSource {
    async fn fetch_list(&self, _base_url: &str) -> Result<ListPayload> {
        Ok(ListPayload {
            records: vec![
                WireProduct::from_value(json!({ "n": "Silk Suit", "c": "Suit", "q": 4, "g": 1499.0 })),
                WireProduct::from_value(json!({ "n": "Cotton Lungi", "c": "Lungi", "q": 10, "g": 249.0 })),
            ],
            last_updated: Some("2025-03-15T11:55:00Z".to_string()),
        })
    }
}

struct OfflineSource;

#[async_trait]
impl ProductSource for OfflineSource {
    async fn fetch_list(&self, _base_url: &str) -> Result<ListPayload> {
        Err(RateListError::HttpStatus(502))
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
}

async fn orchestrator(source: Arc<dyn ProductSource>, store_file: &Path) -> FetchOrchestrator {
    let store = JsonFileStore::open(store_file.to_path_buf()).await.expect("open store");
    FetchOrchestrator::new(source, CacheStore::new(Arc::new(store)), Duration::from_secs(5), None)
}

#[tokio::test]
async fn cached_list_survives_restart_and_serves_offline() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store_file = dir.path().join("store.json");

    let online = orchestrator(Arc::new(OnlineSource), &store_file).await;
    let first = online.fetch(FetchTrigger::Startup, None, now()).await;
    assert_eq!(first.state, FetchState::Succeeded);
    assert_eq!(first.products.len(), 2);
    assert_eq!(first.notification.message, "2 stock items loaded (updated 5 minutes ago)");
    drop(online);

    let offline = orchestrator(Arc::new(OfflineSource), &store_file).await;
    let second = offline.fetch(FetchTrigger::Manual, None, now()).await;
    assert_eq!(second.state, FetchState::CachedFallback);
    assert_eq!(second.products, first.products);
    assert_eq!(second.last_update.as_deref(), Some("2025-03-15T11:55:00Z"));
    assert_eq!(second.notification.message, "Using cached data (updated 5 minutes ago)");
}

#[tokio::test]
async fn empty_store_falls_back_to_sample() {
    let dir = tempfile::tempdir().expect("tempdir");
    let offline = orchestrator(Arc::new(OfflineSource), &dir.path().join("store.json")).await;

    let outcome = offline.fetch(FetchTrigger::Manual, None, now()).await;
    assert_eq!(outcome.state, FetchState::SampleFallback);
    assert_eq!(outcome.products, sample_products());
    assert_eq!(outcome.last_update, None);
    assert_eq!(outcome.notification.severity, Severity::Error);
    assert_eq!(outcome.notification.message, "Using offline data - API unavailable");
}

#[tokio::test]
async fn fallback_is_deterministic() {
    let dir = tempfile::tempdir().expect("tempdir");
    let offline = orchestrator(Arc::new(OfflineSource), &dir.path().join("store.json")).await;

    let a = offline.fetch(FetchTrigger::Periodic, None, now()).await;
    let b = offline.fetch(FetchTrigger::Periodic, None, now()).await;
    assert_eq!(a, b);
}

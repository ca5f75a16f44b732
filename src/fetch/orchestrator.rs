//! Network, then cache, then bundled sample.
//!
//! [`FetchOrchestrator::fetch`] never fails: every path ends with a product
//! list, a final [`FetchState`] and the notification to show for it.

use super::client::{resolve_base_url, ListPayload, ProductSource};
use super::sample::sample_products;
use crate::domain::error::{RateListError, Result};
use crate::domain::freshness::updated_suffix;
use crate::domain::{decode_all, Product};
use crate::notify::{Notification, Placement};
use crate::storage::{AdminConfig, CacheStore};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// What started a fetch. Selects the notification wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTrigger {
    Startup,
    Periodic,
    Manual,
}

impl fmt::Display for FetchTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Startup => "startup",
            Self::Periodic => "periodic",
            Self::Manual => "manual",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Succeeded,
    CachedFallback,
    SampleFallback,
}

impl FetchState {
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Result of one pass through the fallback chain.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub trigger: FetchTrigger,
    pub state: FetchState,
    pub products: Vec<Product>,

    /// Update time of `products`, when known.
    pub last_update: Option<String>,

    pub notification: Notification,
}

/// Runs the fallback chain against a [`ProductSource`] and a [`CacheStore`].
pub struct FetchOrchestrator {
    source: Arc<dyn ProductSource>,
    cache: CacheStore,
    timeout: Duration,
    configured_url: Option<String>,
}

impl fmt::Debug for FetchOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOrchestrator")
            .field("timeout", &self.timeout)
            .field("configured_url", &self.configured_url)
            .finish_non_exhaustive()
    }
}

impl FetchOrchestrator {
    #[must_use]
    pub fn new(
        source: Arc<dyn ProductSource>,
        cache: CacheStore,
        timeout: Duration,
        configured_url: Option<String>,
    ) -> Self {
        Self {
            source,
            cache,
            timeout,
            configured_url,
        }
    }

    /// Base address a fetch would use with the given admin config.
    #[must_use]
    pub fn base_url(&self, admin: Option<&AdminConfig>) -> String {
        resolve_base_url(admin, self.configured_url.as_deref())
    }

    async fn fetch_remote(&self, base_url: &str) -> Result<ListPayload> {
        tokio::time::timeout(self.timeout, self.source.fetch_list(base_url))
            .await
            .map_err(|_| RateListError::Timeout(self.timeout))?
    }

    /// Fetches the list, falling back to the cache and then the bundled sample.
    ///
    /// A successful fetch overwrites the cache. A failed cache write is logged
    /// and does not change the outcome.
    #[tracing::instrument(level = "debug", skip_all, fields(%trigger))]
    pub async fn fetch(&self, trigger: FetchTrigger, admin: Option<&AdminConfig>, now: DateTime<Utc>) -> FetchOutcome {
        let base_url = self.base_url(admin);

        match self.fetch_remote(&base_url).await {
            Ok(payload) => {
                let products = decode_all(&payload.records);
                if let Err(e) = self
                    .cache
                    .save_products(&products, payload.last_updated.as_deref())
                    .await
                {
                    tracing::warn!(error = %e, "failed to cache product list");
                }
                tracing::info!(%base_url, count = products.len(), "product list fetched");
                outcome(trigger, FetchState::Succeeded, products, payload.last_updated, now)
            }
            Err(e) => {
                tracing::warn!(%base_url, error = %e, "fetch failed, falling back");
                match self.cache.load_products().await.filter(|c| !c.products.is_empty()) {
                    Some(cached) => {
                        tracing::info!(count = cached.products.len(), "using cached product list");
                        outcome(trigger, FetchState::CachedFallback, cached.products, cached.last_update, now)
                    }
                    None => {
                        tracing::info!("no usable cache, using bundled sample list");
                        outcome(trigger, FetchState::SampleFallback, sample_products(), None, now)
                    }
                }
            }
        }
    }
}

fn outcome(
    trigger: FetchTrigger,
    state: FetchState,
    products: Vec<Product>,
    last_update: Option<String>,
    now: DateTime<Utc>,
) -> FetchOutcome {
    let suffix = updated_suffix(last_update.as_deref(), now);
    let notification = notification_for(trigger, state, products.len(), &suffix);
    FetchOutcome {
        trigger,
        state,
        products,
        last_update,
        notification,
    }
}

/// Message shown after a fetch, by trigger and final state.
#[must_use]
pub fn notification_for(trigger: FetchTrigger, state: FetchState, count: usize, suffix: &str) -> Notification {
    use FetchState::{CachedFallback, Idle, Loading, SampleFallback, Succeeded};
    use FetchTrigger::{Manual, Periodic, Startup};

    match (trigger, state) {
        (Startup, Succeeded) => {
            Notification::success(format!("{count} stock items loaded{suffix}"), Placement::Bottom)
        }
        (Startup, CachedFallback) => {
            Notification::info(format!("{count} stock items available from cache{suffix}"), Placement::Center)
        }
        (Startup, SampleFallback) => {
            Notification::info(format!("{count} stock items available (offline mode)"), Placement::Center)
        }
        (Manual, Succeeded) => Notification::success(format!("Data refreshed{suffix}"), Placement::Top),
        (Manual, CachedFallback) => Notification::info(format!("Using cached data{suffix}"), Placement::Top),
        (Manual, SampleFallback) => Notification::error("Using offline data - API unavailable", Placement::Top),
        (Periodic, Succeeded) => Notification::success(format!("Data auto-refreshed{suffix}"), Placement::Top),
        (Periodic, CachedFallback) => {
            Notification::info(format!("Auto-refresh failed, using cached data{suffix}"), Placement::Top)
        }
        (Periodic, SampleFallback) => Notification::error("Auto-refresh failed, using offline data", Placement::Top),
        (_, Idle | Loading) => Notification::info("Loading products", Placement::Top),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WireProduct;
    use crate::notify::Severity;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Source that replays queued results and records requested URLs.
    #[derive(Default)]
    struct ScriptedSource {
        replies: Mutex<VecDeque<Result<ListPayload>>>,
        requested: Mutex<Vec<String>>,
    }

    impl ScriptedSource {
        fn replying(replies: Vec<Result<ListPayload>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requested: Mutex::default(),
            })
        }
    }

    #[async_trait]
    impl ProductSource for ScriptedSource {
        async fn fetch_list(&self, base_url: &str) -> Result<ListPayload> {
            self.requested.lock().unwrap().push(base_url.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(RateListError::HttpStatus(500)))
        }
    }

    /// Source that never answers.
    struct StalledSource;

    #[async_trait]
    impl ProductSource for StalledSource {
        async fn fetch_list(&self, _base_url: &str) -> Result<ListPayload> {
            std::future::pending().await
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 14, 0, 0).unwrap()
    }

    fn payload(names: &[&str], last_updated: Option<&str>) -> ListPayload {
        ListPayload {
            records: names
                .iter()
                .map(|n| WireProduct::from_value(json!({ "n": n, "q": 3 })))
                .collect(),
            last_updated: last_updated.map(str::to_string),
        }
    }

    fn orchestrator(source: Arc<dyn ProductSource>, cache: &CacheStore) -> FetchOrchestrator {
        FetchOrchestrator::new(source, cache.clone(), Duration::from_secs(5), None)
    }

    #[tokio::test]
    async fn success_caches_and_reports_age() {
        let cache = CacheStore::new(Arc::new(MemoryStore::new()));
        let source = ScriptedSource::replying(vec![Ok(payload(&["Suit", "Stole"], Some("2025-03-15T12:00:00Z")))]);
        let outcome = orchestrator(source.clone(), &cache)
            .fetch(FetchTrigger::Startup, None, now())
            .await;

        assert_eq!(outcome.state, FetchState::Succeeded);
        assert_eq!(outcome.products.len(), 2);
        assert_eq!(outcome.notification.message, "2 stock items loaded (updated 2 hours ago)");
        assert_eq!(outcome.notification.severity, Severity::Success);
        assert_eq!(outcome.notification.placement, Placement::Bottom);

        let cached = cache.load_products().await.expect("cached");
        assert_eq!(cached.products, outcome.products);
        assert_eq!(cached.last_update.as_deref(), Some("2025-03-15T12:00:00Z"));
        assert_eq!(source.requested.lock().unwrap().as_slice(), ["http://192.168.5.25:12345"]);
    }

    #[tokio::test]
    async fn failure_uses_cache_when_present() {
        let cache = CacheStore::new(Arc::new(MemoryStore::new()));
        let cached: Vec<Product> = (0..3)
            .map(|i| Product { name: Some(format!("cached-{i}")), ..Product::default() })
            .collect();
        cache.save_products(&cached, Some("2025-03-15T13:30:00Z")).await.expect("seed");

        let source = ScriptedSource::replying(vec![Err(RateListError::HttpStatus(502))]);
        let outcome = orchestrator(source, &cache).fetch(FetchTrigger::Manual, None, now()).await;

        assert_eq!(outcome.state, FetchState::CachedFallback);
        assert_eq!(outcome.products, cached);
        assert_eq!(outcome.notification.message, "Using cached data (updated 30 minutes ago)");
        assert_eq!(outcome.notification.severity, Severity::Info);
    }

    #[tokio::test]
    async fn failure_without_cache_uses_sample() {
        let cache = CacheStore::new(Arc::new(MemoryStore::new()));
        let source = ScriptedSource::replying(vec![Err(RateListError::InvalidPayload("empty".into()))]);
        let outcome = orchestrator(source, &cache).fetch(FetchTrigger::Startup, None, now()).await;

        assert_eq!(outcome.state, FetchState::SampleFallback);
        assert_eq!(outcome.products, sample_products());
        assert_eq!(
            outcome.notification.message,
            format!("{} stock items available (offline mode)", sample_products().len())
        );
        assert_eq!(outcome.notification.placement, Placement::Center);
        assert!(cache.load_products().await.is_none());
    }

    #[tokio::test]
    async fn success_without_timestamp_clears_cached_one() {
        let cache = CacheStore::new(Arc::new(MemoryStore::new()));
        cache.save_products(&[], Some("2020-01-01T00:00:00Z")).await.expect("seed");

        let source = ScriptedSource::replying(vec![Ok(payload(&["Towel"], None))]);
        let outcome = orchestrator(source, &cache).fetch(FetchTrigger::Periodic, None, now()).await;

        assert_eq!(outcome.notification.message, "Data auto-refreshed");
        assert_eq!(cache.load_products().await.expect("cached").last_update, None);
    }

    #[tokio::test]
    async fn admin_server_overrides_configured_one() {
        let cache = CacheStore::new(Arc::new(MemoryStore::new()));
        let source = ScriptedSource::replying(vec![Ok(payload(&["Lungi"], None))]);
        let orchestrator =
            FetchOrchestrator::new(source.clone(), cache, Duration::from_secs(5), Some("config.example:80".into()));

        orchestrator.fetch(FetchTrigger::Manual, None, now()).await;
        let admin = AdminConfig::with_server("admin.example:9000/");
        orchestrator.fetch(FetchTrigger::Manual, Some(&admin), now()).await;

        assert_eq!(
            source.requested.lock().unwrap().as_slice(),
            ["http://config.example:80", "http://admin.example:9000"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_source_times_out_into_fallback() {
        let cache = CacheStore::new(Arc::new(MemoryStore::new()));
        let outcome = orchestrator(Arc::new(StalledSource), &cache)
            .fetch(FetchTrigger::Periodic, None, now())
            .await;

        assert_eq!(outcome.state, FetchState::SampleFallback);
        assert_eq!(outcome.notification.message, "Auto-refresh failed, using offline data");
        assert_eq!(outcome.notification.severity, Severity::Error);
    }

    #[test]
    fn every_trigger_and_state_has_wording() {
        let cases = [
            (FetchTrigger::Startup, FetchState::CachedFallback, "4 stock items available from cache (updated 1 day ago)"),
            (FetchTrigger::Manual, FetchState::Succeeded, "Data refreshed (updated 1 day ago)"),
            (FetchTrigger::Manual, FetchState::SampleFallback, "Using offline data - API unavailable"),
            (FetchTrigger::Periodic, FetchState::CachedFallback, "Auto-refresh failed, using cached data (updated 1 day ago)"),
        ];
        for (trigger, state, expected) in cases {
            assert_eq!(notification_for(trigger, state, 4, " (updated 1 day ago)").message, expected);
        }
    }
}

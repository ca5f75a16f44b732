//! Explicitly owned client session.
//!
//! A [`Session`] owns the [`AppState`] together with everything that performs
//! side effects on its behalf: the fetch orchestrator, the cache, the
//! notification sink and the refresh timer. Events go in through
//! [`Session::dispatch`]; the handler's actions are executed here, in order,
//! and fetch results are fed back as events until the queue is empty.

use crate::app::{handle_event, Action, AppState, Event};
use crate::domain::error::Result;
use crate::fetch::{FetchOrchestrator, FetchTrigger, RefreshScheduler};
use crate::notify::NotificationSink;
use crate::storage::CacheStore;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Capacity of the periodic trigger channel. Ticks beyond it are dropped.
const TRIGGER_BUFFER: usize = 1;

pub struct Session {
    state: AppState,
    orchestrator: FetchOrchestrator,
    cache: CacheStore,
    sink: Arc<dyn NotificationSink>,
    refresh_interval: Duration,
    scheduler: Option<RefreshScheduler>,
    triggers: Option<mpsc::Receiver<FetchTrigger>>,
    quit: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("orchestrator", &self.orchestrator)
            .field("refresh_interval", &self.refresh_interval)
            .field("scheduler", &self.scheduler)
            .field("quit", &self.quit)
            .finish_non_exhaustive()
    }
}

impl Session {
    #[must_use]
    pub fn new(
        state: AppState,
        orchestrator: FetchOrchestrator,
        cache: CacheStore,
        sink: Arc<dyn NotificationSink>,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            state,
            orchestrator,
            cache,
            sink,
            refresh_interval,
            scheduler: None,
            triggers: None,
            quit: false,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// True once a `Quit` event has been processed.
    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.quit
    }

    /// Loads the stored admin config, runs the startup fetch and starts the
    /// refresh timer.
    ///
    /// # Errors
    ///
    /// Propagates errors from the event handler.
    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn start(&mut self) -> Result<bool> {
        if let Some(config) = self.cache.load_admin_config().await {
            tracing::debug!(server = ?config.server(), "loaded stored admin config");
            self.state.admin_config = config;
        }

        let changed = self.dispatch(Event::Refresh(FetchTrigger::Startup)).await?;

        let (tx, rx) = mpsc::channel(TRIGGER_BUFFER);
        self.scheduler = Some(RefreshScheduler::spawn(self.refresh_interval, tx));
        self.triggers = Some(rx);

        tracing::info!(
            base_url = %self.orchestrator.base_url(Some(&self.state.admin_config)),
            refresh_secs = self.refresh_interval.as_secs(),
            "session started"
        );
        Ok(changed)
    }

    /// Processes `event` and everything it leads to.
    ///
    /// Returns whether the visible state changed.
    ///
    /// # Errors
    ///
    /// Propagates errors from the event handler.
    pub async fn dispatch(&mut self, event: Event) -> Result<bool> {
        let mut queue = VecDeque::from([event]);
        let mut changed = false;

        while let Some(event) = queue.pop_front() {
            let (event_changed, actions) = handle_event(&mut self.state, &event)?;
            changed |= event_changed;

            for action in actions {
                if let Some(follow_up) = self.execute(action).await {
                    queue.push_back(follow_up);
                }
            }
        }
        Ok(changed)
    }

    async fn execute(&mut self, action: Action) -> Option<Event> {
        match action {
            Action::Notify(notification) => {
                self.sink.notify(notification);
                None
            }
            Action::RunFetch(trigger) => {
                self.state.fetch_state = crate::fetch::FetchState::Loading;
                let outcome = self
                    .orchestrator
                    .fetch(trigger, Some(&self.state.admin_config), self.state.now())
                    .await;
                Some(Event::FetchCompleted(outcome))
            }
            Action::PersistAdminConfig(config) => {
                if let Err(e) = self.cache.save_admin_config(&config).await {
                    tracing::warn!(error = %e, "failed to persist admin config");
                }
                None
            }
            Action::Quit => {
                tracing::debug!("quit requested");
                self.quit = true;
                None
            }
        }
    }

    /// Waits for the next periodic refresh trigger.
    ///
    /// Returns `None` before [`start`](Self::start) and after
    /// [`shutdown`](Self::shutdown).
    pub async fn next_periodic(&mut self) -> Option<FetchTrigger> {
        match self.triggers.as_mut() {
            Some(rx) => rx.recv().await,
            None => None,
        }
    }

    /// Stops the refresh timer.
    pub fn shutdown(&mut self) {
        self.scheduler = None;
        self.triggers = None;
        tracing::debug!("session shut down");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::RateListError;
    use crate::domain::WireProduct;
    use crate::fetch::{FetchState, ListPayload, ProductSource};
    use crate::notify::{RecordingSink, Severity};
    use crate::storage::{AdminConfig, MemoryStore};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Answers with a fixed list, or fails when `online` is false.
    struct ToggleSource {
        online: Mutex<bool>,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ProductSource for ToggleSource {
        async fn fetch_list(&self, base_url: &str) -> Result<ListPayload> {
            self.requested.lock().unwrap().push(base_url.to_string());
            if !*self.online.lock().unwrap() {
                return Err(RateListError::HttpStatus(503));
            }
            Ok(ListPayload {
                records: vec![
                    WireProduct::from_value(json!({ "n": "Silk Suit", "c": "Suit", "q": 4 })),
                    WireProduct::from_value(json!({ "n": "Old Lungi", "c": "Lungi", "q": -2 })),
                ],
                last_updated: None,
            })
        }
    }

    fn session(online: bool) -> (Session, Arc<ToggleSource>, Arc<RecordingSink>, CacheStore) {
        let source = Arc::new(ToggleSource {
            online: Mutex::new(online),
            requested: Mutex::default(),
        });
        let sink = Arc::new(RecordingSink::new());
        let cache = CacheStore::new(Arc::new(MemoryStore::new()));
        let orchestrator = FetchOrchestrator::new(source.clone(), cache.clone(), Duration::from_secs(5), None);
        let session = Session::new(AppState::new(true), orchestrator, cache.clone(), sink.clone(), Duration::from_secs(300));
        (session, source, sink, cache)
    }

    #[tokio::test]
    async fn startup_fetch_notifies_and_warns() {
        let (mut session, _, sink, _) = session(true);
        assert!(session.start().await.unwrap());

        assert_eq!(session.state().fetch_state, FetchState::Succeeded);
        assert_eq!(session.state().products().len(), 2);
        // Stock filter starts enabled.
        assert_eq!(session.state().filtered_products().len(), 1);

        let notes = sink.take();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].message, "2 stock items loaded");
        assert_eq!(notes[1].message, "Negative stock: Old Lungi");
        assert_eq!(notes[1].severity, Severity::Error);
    }

    #[tokio::test]
    async fn manual_refresh_falls_back_to_cache() {
        let (mut session, source, sink, _) = session(true);
        session.start().await.unwrap();
        sink.take();

        *source.online.lock().unwrap() = false;
        session.dispatch(Event::Refresh(FetchTrigger::Manual)).await.unwrap();

        assert_eq!(session.state().fetch_state, FetchState::CachedFallback);
        assert_eq!(session.state().products().len(), 2);
        assert_eq!(sink.take()[0].message, "Using cached data");
    }

    #[tokio::test]
    async fn admin_update_persists_and_refetches_from_new_server() {
        let (mut session, source, _, cache) = session(true);
        session.start().await.unwrap();

        session
            .dispatch(Event::UpdateAdminConfig(AdminConfig::with_server("10.9.9.9:7000")))
            .await
            .unwrap();

        assert_eq!(cache.load_admin_config().await.unwrap().server(), Some("10.9.9.9:7000"));
        assert_eq!(source.requested.lock().unwrap().last().map(String::as_str), Some("http://10.9.9.9:7000"));
    }

    #[tokio::test]
    async fn stored_admin_config_is_used_at_startup() {
        let (mut session, source, _, cache) = session(true);
        cache.save_admin_config(&AdminConfig::with_server("stored.example")).await.unwrap();
        session.start().await.unwrap();
        assert_eq!(source.requested.lock().unwrap()[0], "http://stored.example");
    }

    #[tokio::test(start_paused = true)]
    async fn periodic_trigger_arrives_after_interval() {
        let (mut session, _, sink, _) = session(false);
        session.start().await.unwrap();
        assert_eq!(session.state().fetch_state, FetchState::SampleFallback);
        sink.take();

        let trigger = session.next_periodic().await;
        assert_eq!(trigger, Some(FetchTrigger::Periodic));
        session.dispatch(Event::Refresh(FetchTrigger::Periodic)).await.unwrap();
        assert_eq!(sink.take()[0].message, "Auto-refresh failed, using offline data");

        session.shutdown();
        assert_eq!(session.next_periodic().await, None);
    }

    #[tokio::test]
    async fn quit_sets_flag() {
        let (mut session, _, _, _) = session(true);
        assert!(!session.should_quit());
        session.dispatch(Event::Quit).await.unwrap();
        assert!(session.should_quit());
    }
}

//! Ratelist: a caching client for a shop's product price list.
//!
//! Ratelist fetches a compact product list from a configurable HTTP endpoint,
//! keeps the last good copy in a local store, and presents it with search,
//! filters and sorting:
//! - Typo-tolerant search on name, category and HSN code, plus rate and HSN modes
//! - Category, stock, rating, badge and date filters
//! - Stable multi-field sorting
//! - Network, then cache, then bundled sample fallback with user notifications
//! - Periodic background refresh

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Front end (main.rs)                                │  ← stdin commands
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Session (session.rs)                               │  ← owns state, runs actions
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Event handling                                   │
//! │  - Action emission                                  │
//! │  - Derived product list                             │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Pipeline      │   │ Fetch         │   │ Storage       │
//! │ (pipeline/)   │   │ (fetch/)      │   │ (storage/)    │
//! │ - Filters     │   │ - HTTP client │   │ - KV backends │
//! │ - Fuzzy match │   │ - Fallbacks   │   │ - JSON file   │
//! │ - Sorting     │   │ - Scheduler   │   │ - Cache       │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (domain/)                                   │
//! │  - Wire format and Product model                    │
//! │  - Badge flags, timestamps                          │
//! │  - Error types                                      │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application state machine with event/action model
//! - [`domain`]: Core domain types (Product, flags, errors)
//! - [`fetch`]: HTTP source, fallback chain and refresh timer
//! - [`infrastructure`]: Data directory resolution
//! - [`notify`]: User notifications and sinks
//! - [`pipeline`]: Pure filter, search and sort derivation
//! - [`session`]: Owner of state and side effects
//! - [`storage`]: Key-value persistence and typed cache
//! - [`ui`]: View model and plain-text rendering
//! - [`observability`]: Tracing subscriber setup
//!
//! # Configuration
//!
//! Configuration is read from an optional TOML file and then overlaid with
//! `RATELIST_*` environment variables:
//!
//! ```toml
//! server_url = "192.168.5.25:12345"
//! data_dir = "~/.local/share/ratelist"
//! request_timeout_secs = 5
//! refresh_interval_secs = 300
//! in_stock_only = true
//! trace_level = "info"
//! log_to_file = false
//! ```
//!
//! # Example
//!
//! ```rust
//! use ratelist::{handle_event, Action, AppState, Config, Event};
//! use ratelist::pipeline::SortField;
//!
//! let config = Config::from_toml_str("in_stock_only = false")?;
//! let mut state = AppState::new(config.in_stock_only);
//! let (changed, actions) = handle_event(&mut state, &Event::SelectSort(SortField::Name))?;
//! assert!(changed);
//! assert!(matches!(&actions[..], [Action::Notify(n)] if n.message == "Sorted by name ascending"));
//! # Ok::<(), ratelist::RateListError>(())
//! ```

pub mod app;
pub mod domain;
pub mod fetch;
pub mod infrastructure;
pub mod notify;
pub mod observability;
pub mod pipeline;
pub mod session;
pub mod storage;
pub mod ui;

pub use app::{handle_event, Action, AppState, Event};
pub use domain::{Product, RateListError, Result};
pub use session::Session;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix of environment variables that override configuration.
pub const ENV_PREFIX: &str = "RATELIST_";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;

/// Client configuration.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Fallback server address, used when the stored admin config has none.
    ///
    /// A missing scheme means `http://`. Default: `http://192.168.5.25:12345`
    pub server_url: Option<String>,

    /// Directory for the store and log files. `~` is expanded.
    ///
    /// Default: the platform data directory plus `ratelist`.
    pub data_dir: Option<PathBuf>,

    /// Upper bound on one list request, in seconds. Default: 5
    pub request_timeout_secs: u64,

    /// Period of the background refresh, in seconds. Default: 300
    pub refresh_interval_secs: u64,

    /// Whether the stock filter starts enabled. Default: true
    pub in_stock_only: bool,

    /// Tracing filter directive.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any `EnvFilter`
    /// directive. `RUST_LOG` takes precedence. Default: `"info"`
    pub trace_level: Option<String>,

    /// Write logs to a daily file in the data directory instead of stderr.
    pub log_to_file: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: None,
            data_dir: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            in_stock_only: true,
            trace_level: None,
            log_to_file: false,
        }
    }
}

impl Config {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`RateListError::Config`] for malformed TOML, unknown keys, or a
    /// zero timeout or refresh interval.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| RateListError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read and
    /// [`RateListError::Config`] if it does not parse.
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = ?path, "loading configuration file");
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(RateListError::Config("request_timeout_secs must be positive".to_string()));
        }
        if self.refresh_interval_secs == 0 {
            return Err(RateListError::Config("refresh_interval_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// Overlays string key-value pairs on top of this configuration.
    ///
    /// Keys are the field names. Values that do not parse (or would make a
    /// duration zero) keep the previous setting; an empty value clears an
    /// optional field.
    ///
    /// # Parsing Rules
    ///
    /// - `request_timeout_secs`, `refresh_interval_secs`: positive integer
    /// - `in_stock_only`, `log_to_file`: `true`/`false`, `1`/`0`, `yes`/`no`
    /// - `server_url`, `data_dir`, `trace_level`: taken verbatim
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use ratelist::Config;
    ///
    /// let mut overrides = BTreeMap::new();
    /// overrides.insert("refresh_interval_secs".to_string(), "60".to_string());
    /// overrides.insert("request_timeout_secs".to_string(), "soon".to_string());
    ///
    /// let config = Config::default().apply_overrides(&overrides);
    /// assert_eq!(config.refresh_interval_secs, 60);
    /// assert_eq!(config.request_timeout_secs, 5);
    /// ```
    #[must_use]
    pub fn apply_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        let optional = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };
        let seconds = |value: &str, previous: u64| value.trim().parse::<u64>().ok().filter(|v| *v > 0).unwrap_or(previous);
        let flag = |value: &str, previous: bool| match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => true,
            "false" | "0" | "no" | "off" => false,
            _ => previous,
        };

        for (key, value) in overrides {
            match key.as_str() {
                "server_url" => self.server_url = optional(value),
                "data_dir" => self.data_dir = optional(value).map(PathBuf::from),
                "trace_level" => self.trace_level = optional(value),
                "request_timeout_secs" => self.request_timeout_secs = seconds(value, self.request_timeout_secs),
                "refresh_interval_secs" => self.refresh_interval_secs = seconds(value, self.refresh_interval_secs),
                "in_stock_only" => self.in_stock_only = flag(value, self.in_stock_only),
                "log_to_file" => self.log_to_file = flag(value, self.log_to_file),
                other => tracing::debug!(key = other, "ignoring unknown configuration override"),
            }
        }
        self
    }

    /// Collects `RATELIST_*` variables as override pairs, keys lowercased and
    /// stripped of the prefix.
    #[must_use]
    pub fn env_overrides() -> BTreeMap<String, String> {
        std::env::vars()
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .map(|field| (field.to_ascii_lowercase(), value))
            })
            .collect()
    }

    /// Resolved data directory.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        infrastructure::get_data_dir(self.data_dir.as_deref())
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
        assert!(Config::default().in_stock_only);
        assert_eq!(Config::default().request_timeout(), Duration::from_secs(5));
        assert_eq!(Config::default().refresh_interval(), Duration::from_secs(300));
    }

    #[test]
    fn full_document_parses() {
        let config = Config::from_toml_str(
            r#"
            server_url = "10.0.0.2:8080"
            data_dir = "/var/lib/ratelist"
            request_timeout_secs = 8
            refresh_interval_secs = 120
            in_stock_only = false
            trace_level = "debug"
            log_to_file = true
            "#,
        )
        .unwrap();
        assert_eq!(config.server_url.as_deref(), Some("10.0.0.2:8080"));
        assert_eq!(config.data_dir(), PathBuf::from("/var/lib/ratelist"));
        assert_eq!(config.request_timeout_secs, 8);
        assert!(!config.in_stock_only);
        assert!(config.log_to_file);
    }

    #[test]
    fn bad_documents_are_config_errors() {
        for text in ["request_timeout_secs = 0", "colour = \"red\"", "in_stock_only = 3", "[[["] {
            assert!(
                matches!(Config::from_toml_str(text), Err(RateListError::Config(_))),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn overrides_apply_and_clear() {
        let base = Config {
            server_url: Some("old:1".into()),
            ..Config::default()
        };
        let overrides: BTreeMap<String, String> = [
            ("server_url", ""),
            ("in_stock_only", "no"),
            ("log_to_file", "maybe"),
            ("refresh_interval_secs", "0"),
            ("trace_level", "warn"),
            ("unknown", "x"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = base.apply_overrides(&overrides);
        assert_eq!(config.server_url, None);
        assert!(!config.in_stock_only);
        assert!(!config.log_to_file);
        assert_eq!(config.refresh_interval_secs, 300);
        assert_eq!(config.trace_level.as_deref(), Some("warn"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::from_file(&dir.path().join("absent.toml")),
            Err(RateListError::Io(_))
        ));
    }
}

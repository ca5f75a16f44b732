//! Tracing initialization and subscriber setup.
//!
//! Installs a `tracing-subscriber` registry with an [`EnvFilter`] and one fmt
//! layer, writing either to stderr or to a daily-rolling file in the data
//! directory.

use crate::Config;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive when neither `RUST_LOG` nor the config sets one.
const DEFAULT_LEVEL: &str = "info";

/// Prefix of the rolling log files.
const LOG_FILE_PREFIX: &str = "ratelist.log";

/// Builds the filter: `RUST_LOG` wins, then `config.trace_level`, then `info`.
fn build_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL);
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    })
}

/// Initializes the global tracing subscriber.
///
/// With `config.log_to_file` set, events go to `ratelist.log.YYYY-MM-DD` in
/// `log_dir` through a non-blocking writer; the returned guard flushes it and
/// must be held until exit. Otherwise events go to stderr and `None` is
/// returned.
///
/// Calling this more than once is harmless: only the first call installs a
/// subscriber.
///
/// # Example
///
/// ```rust
/// use ratelist::observability::init_tracing;
/// use ratelist::Config;
///
/// let config = Config { trace_level: Some("debug".to_string()), ..Config::default() };
/// let _guard = init_tracing(&config, std::path::Path::new("."));
///
/// tracing::debug!("tracing is now active");
/// ```
#[must_use]
pub fn init_tracing(config: &Config, log_dir: &Path) -> Option<WorkerGuard> {
    let filter = build_filter(config);

    if config.log_to_file {
        if let Err(e) = std::fs::create_dir_all(log_dir) {
            eprintln!("cannot create log directory {}: {e}, logging to stderr", log_dir.display());
        } else {
            let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let installed = tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).with_target(true).with_writer(writer))
                .try_init()
                .is_ok();
            return installed.then_some(guard);
        }
    }

    let _ = tracing_subscriber::registry()
        .with(build_filter(config))
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init();
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_level_falls_back() {
        let config = Config {
            trace_level: Some("[[not a directive".to_string()),
            ..Config::default()
        };
        // Must not panic whatever RUST_LOG holds.
        let _ = build_filter(&config);
    }

    #[test]
    fn file_logging_returns_guard_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config {
            log_to_file: true,
            ..Config::default()
        };
        let first = init_tracing(&config, dir.path());
        let second = init_tracing(&config, dir.path());
        assert!(second.is_none() || first.is_none());
    }
}

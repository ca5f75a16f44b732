//! Structured logging via `tracing`.
//!
//! Library code only emits `tracing` spans and events; this module installs the
//! subscriber that renders them. The binary calls [`init_tracing`] once at
//! startup.
//!
//! # Configuration
//!
//! The filter is chosen by:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` in the configuration file or `RATELIST_TRACE_LEVEL`
//! 3. Default: `"info"`
//!
//! Output goes to stderr unless `log_to_file` is set, in which case a
//! daily-rolling file is written in the data directory.
//!
//! # Modules
//!
//! - `init`: Subscriber setup

mod init;

pub use init::init_tracing;

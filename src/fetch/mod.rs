//! Getting the product list: HTTP client, fallback chain and refresh timer.
//!
//! # Modules
//!
//! - `client`: `ProductSource` trait, reqwest implementation, payload parsing
//! - `orchestrator`: Network, cache, sample fallback chain and its notifications
//! - `sample`: Bundled offline list
//! - `scheduler`: Periodic refresh trigger

pub mod client;
pub mod orchestrator;
pub mod sample;
pub mod scheduler;

pub use client::{resolve_base_url, HttpSource, ListPayload, ProductSource, DEFAULT_SERVER_URL};
pub use orchestrator::{FetchOrchestrator, FetchOutcome, FetchState, FetchTrigger};
pub use sample::sample_products;
pub use scheduler::RefreshScheduler;

//! Infrastructure layer for filesystem and environment interactions.
//!
//! Currently only data directory resolution lives here.

pub mod paths;

pub use paths::{expand_tilde, get_data_dir, store_path};

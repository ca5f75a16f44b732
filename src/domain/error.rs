//! Error types for the rate list client.
//!
//! This module defines the centralized error type [`RateListError`] and a type alias
//! [`Result`] used throughout the crate. Most failures never cross the session
//! boundary: transport and payload errors feed the fetch fallback chain, storage
//! errors are logged and read as "absent". The variants exist so each layer can
//! say precisely what went wrong before that happens.

use std::time::Duration;
use thiserror::Error;

/// The main error type for rate list operations.
///
/// # Examples
///
/// ```
/// use ratelist::domain::RateListError;
///
/// fn validate_config() -> Result<(), RateListError> {
///     Err(RateListError::Config("request timeout must be positive".to_string()))
/// }
///
/// assert!(validate_config().is_err());
/// ```
#[derive(Debug, Error)]
pub enum RateListError {
    /// Key-value store operation failed.
    ///
    /// Occurs when the persistent store cannot be read or written. The string
    /// describes what went wrong.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The HTTP client reported a transport failure (DNS, refused connection, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("Server returned status {0}")]
    HttpStatus(u16),

    /// The price list request did not complete in time.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The response parsed but is not a usable product list.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Configuration is invalid or unreadable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// User supplied input that could not be interpreted.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// A specialized `Result` type for rate list operations.
pub type Result<T> = std::result::Result<T, RateListError>;

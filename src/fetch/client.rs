//! HTTP access to the price list endpoint.

use crate::domain::error::{RateListError, Result};
use crate::domain::WireProduct;
use crate::storage::AdminConfig;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::time::Duration;

/// Server used when neither the admin config nor the config file names one.
pub const DEFAULT_SERVER_URL: &str = "http://192.168.5.25:12345";

/// Path of the list endpoint under the base address.
const LIST_PATH: &str = "/list";

/// One response from the list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPayload {
    pub records: Vec<WireProduct>,

    /// Update time reported by the server, if any.
    pub last_updated: Option<String>,
}

impl ListPayload {
    /// Interprets a response body.
    ///
    /// Accepts a bare array of records or an object of the form
    /// `{ "data": [...], "last_updated": { "time": "..." } }`.
    ///
    /// # Errors
    ///
    /// Returns [`RateListError::InvalidPayload`] for any other shape and for an
    /// empty list.
    pub fn from_value(value: Value) -> Result<Self> {
        let (items, last_updated) = match value {
            Value::Array(items) => (items, None),
            Value::Object(mut envelope) => {
                let last_updated = envelope
                    .get("last_updated")
                    .and_then(|meta| meta.get("time"))
                    .and_then(Value::as_str)
                    .map(str::to_string);
                match envelope.remove("data") {
                    Some(Value::Array(items)) => (items, last_updated),
                    _ => return Err(RateListError::InvalidPayload("envelope has no data list".to_string())),
                }
            }
            other => {
                return Err(RateListError::InvalidPayload(format!(
                    "expected a list, got {}",
                    json_kind(&other)
                )))
            }
        };

        if items.is_empty() {
            return Err(RateListError::InvalidPayload("product list is empty".to_string()));
        }

        Ok(Self {
            records: items.into_iter().map(WireProduct::from_value).collect(),
            last_updated,
        })
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Picks the base address: admin config, then configured default, then the
/// built-in address. Adds `http://` when no scheme is given and drops trailing
/// slashes.
///
/// # Examples
///
/// ```
/// use ratelist::fetch::client::resolve_base_url;
/// use ratelist::storage::AdminConfig;
///
/// let admin = AdminConfig::with_server("10.0.0.7:8080/");
/// assert_eq!(resolve_base_url(Some(&admin), None), "http://10.0.0.7:8080");
/// assert_eq!(resolve_base_url(None, Some("https://prices.example.com")), "https://prices.example.com");
/// ```
#[must_use]
pub fn resolve_base_url(admin: Option<&AdminConfig>, configured: Option<&str>) -> String {
    let raw = admin
        .and_then(AdminConfig::server)
        .or_else(|| configured.map(str::trim).filter(|s| !s.is_empty()))
        .unwrap_or(DEFAULT_SERVER_URL);

    let lowered = raw.to_ascii_lowercase();
    let with_scheme = if lowered.starts_with("http://") || lowered.starts_with("https://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };
    with_scheme.trim_end_matches('/').to_string()
}

/// Source of the raw product list.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Fetches and parses the list served under `base_url`.
    async fn fetch_list(&self, base_url: &str) -> Result<ListPayload>;
}

/// [`ProductSource`] backed by a real HTTP client.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    /// Builds a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Wraps an already configured client.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProductSource for HttpSource {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn fetch_list(&self, base_url: &str) -> Result<ListPayload> {
        let url = format!("{base_url}{LIST_PATH}");
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateListError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        let value: Value = serde_json::from_slice(&body)?;
        let payload = ListPayload::from_value(value)?;

        tracing::debug!(
            records = payload.records.len(),
            last_updated = ?payload.last_updated,
            "list fetched"
        );
        Ok(payload)
    }
}

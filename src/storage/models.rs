//! Records persisted through the key-value store.
//!
//! These types describe what is written under each store key. They are kept
//! apart from the fetch and state layers so the persisted shape is visible in
//! one place.

use crate::domain::Product;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Store key holding the JSON-serialized last good product list.
pub const CACHED_PRODUCTS_KEY: &str = "cachedProducts";

/// Store key holding the server-reported update time of the cached list.
pub const LAST_UPDATE_KEY: &str = "lastDataUpdate";

/// Store key holding the JSON-serialized [`AdminConfig`].
pub const ADMIN_CONFIG_KEY: &str = "adminConfig";

/// The last successfully decoded product list and its update timestamp.
///
/// Read only as a fallback when the network fetch fails; overwritten on every
/// successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheRecord {
    pub products: Vec<Product>,

    /// ISO-8601 update time reported by the server, if it sent one.
    pub last_update: Option<String>,
}

/// Operator-supplied configuration for the client.
///
/// Only `server_url` matters to the fetch path; the branding fields are kept so
/// a round trip through the store does not lose them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminConfig {
    /// Base address of the price list server, with or without scheme.
    #[serde(default)]
    pub server_url: Option<String>,

    /// Store name shown in the header.
    #[serde(default, rename = "companyName", alias = "displayName")]
    pub display_name: Option<String>,

    /// Logo reference (URL or asset name).
    #[serde(default, rename = "companyLogo", alias = "logo")]
    pub logo: Option<String>,

    /// Per-category icon overrides.
    #[serde(default)]
    pub category_icons: BTreeMap<String, String>,
}

impl AdminConfig {
    /// Creates a config pointing at `server_url`.
    pub fn with_server(server_url: impl Into<String>) -> Self {
        Self {
            server_url: Some(server_url.into()),
            ..Self::default()
        }
    }

    /// The configured server address, ignoring blank values.
    #[must_use]
    pub fn server(&self) -> Option<&str> {
        self.server_url.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_config_uses_camel_case_keys() {
        let config: AdminConfig = serde_json::from_str(
            r#"{ "serverUrl": "10.0.0.2:8080", "displayName": "Textile House", "categoryIcons": { "Suit": "dress" } }"#,
        )
        .expect("parse");
        assert_eq!(config.server(), Some("10.0.0.2:8080"));
        assert_eq!(config.display_name.as_deref(), Some("Textile House"));
        assert_eq!(config.category_icons.get("Suit").map(String::as_str), Some("dress"));
    }

    #[test]
    fn branding_uses_company_keys() {
        let config: AdminConfig = serde_json::from_str(
            r#"{ "serverUrl": "", "companyName": "Rajan Textiles", "companyLogo": "logo.png", "categoryIcons": {} }"#,
        )
        .expect("parse");
        assert_eq!(config.display_name.as_deref(), Some("Rajan Textiles"));
        assert_eq!(config.logo.as_deref(), Some("logo.png"));

        let written = serde_json::to_value(&config).expect("serialize");
        assert_eq!(written["companyName"], "Rajan Textiles");
        assert_eq!(written["companyLogo"], "logo.png");
    }

    #[test]
    fn blank_server_is_ignored() {
        assert_eq!(AdminConfig::with_server("   ").server(), None);
        assert_eq!(AdminConfig::default().server(), None);
    }
}

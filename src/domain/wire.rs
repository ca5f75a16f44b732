//! Compact wire format served by the price list endpoint.
//!
//! Records use one- and two-letter keys. Every field is optional and decoded
//! leniently: a value of the wrong JSON type becomes `None` instead of failing
//! the record, and a record that is not an object at all becomes
//! [`WireProduct::default`]. One bad row never aborts the batch.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A product record exactly as received from the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireProduct {
    #[serde(rename = "i", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "n", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "c", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "u", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(rename = "q", default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(rename = "h", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub hsn: Option<String>,
    #[serde(rename = "p", default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub gst_percent: Option<f64>,
    #[serde(rename = "b", default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub base_rate: Option<f64>,
    #[serde(rename = "g", default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub gst_rate: Option<f64>,
    #[serde(rename = "iq", default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub inward: Option<f64>,
    #[serde(rename = "oq", default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub outward: Option<f64>,
    #[serde(rename = "pd", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub purchased: Option<String>,
    #[serde(rename = "sd", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub sold: Option<String>,
    #[serde(rename = "r", default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(rename = "f", default, deserialize_with = "lenient_flags", skip_serializing_if = "Option::is_none")]
    pub flags: Option<WireFlags>,
}

/// The eight 0/1 badge integers. Only an exact numeric `1` means "set".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireFlags {
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub hc: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub hr: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub hs: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub fs: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub na: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub ld: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub os: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub osk: Option<f64>,
}

impl WireFlags {
    /// Raw value for the flag with the given wire code.
    #[must_use]
    pub fn raw(&self, code: &str) -> Option<f64> {
        match code {
            "hc" => self.hc,
            "hr" => self.hr,
            "hs" => self.hs,
            "fs" => self.fs,
            "na" => self.na,
            "ld" => self.ld,
            "os" => self.os,
            "osk" => self.osk,
            _ => None,
        }
    }
}

impl WireProduct {
    /// Builds a record from an arbitrary JSON value.
    ///
    /// Non-object values yield an all-absent record; field-level problems are
    /// absorbed by the lenient field decoders.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        if !value.is_object() {
            tracing::debug!(kind = json_kind(&value), "non-object product record");
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "product record failed to decode");
            Self::default()
        })
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        _ => None,
    })
}

fn lenient_flags<'de, D>(deserializer: D) -> Result<Option<WireFlags>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wrong_types_become_absent() {
        let wire = WireProduct::from_value(json!({
            "i": 17,
            "h": 6204.0,
            "n": "Cotton Towel",
            "q": "lots",
            "g": 120.5,
            "f": { "na": 1, "os": "1" }
        }));

        assert_eq!(wire.id, None);
        assert_eq!(wire.hsn, None);
        assert_eq!(wire.name.as_deref(), Some("Cotton Towel"));
        assert_eq!(wire.quantity, None);
        assert_eq!(wire.gst_rate, Some(120.5));
        let flags = wire.flags.expect("flags object");
        assert_eq!(flags.na, Some(1.0));
        assert_eq!(flags.os, None);
    }

    #[test]
    fn non_object_record_is_all_absent() {
        assert_eq!(WireProduct::from_value(json!(null)), WireProduct::default());
        assert_eq!(WireProduct::from_value(json!([1, 2])), WireProduct::default());
    }

    #[test]
    fn flag_bundle_of_wrong_shape_is_dropped() {
        let wire = WireProduct::from_value(json!({ "n": "Stole", "f": [1, 0, 1] }));
        assert!(wire.flags.is_none());
        assert_eq!(wire.name.as_deref(), Some("Stole"));
    }
}

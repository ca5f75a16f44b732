//! Product domain model and the wire decoder.
//!
//! [`Product`] is the display entity every screen works with. It is produced by
//! [`decode`] from a [`WireProduct`] and never mutated afterwards; a refresh
//! replaces the whole list.

use super::flags::{BadgeFlag, BadgeFlags};
use super::wire::WireProduct;
use serde::{Deserialize, Serialize};

/// A decoded, display-ready product.
///
/// Fields that were absent or malformed on the wire stay `None`. The invariant
/// `final_rate >= base_rate` is expected but not enforced, and
/// `quantity_in_stock` may be negative (reported as a data-quality warning).
///
/// The serialized form (camelCase) is what the cache store persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub unit_of_measurement: Option<String>,
    #[serde(default)]
    pub quantity_in_stock: Option<f64>,
    #[serde(default)]
    pub hsn_code: Option<String>,
    #[serde(default)]
    pub gst_percentage: Option<f64>,
    #[serde(default)]
    pub base_rate: Option<f64>,
    #[serde(default)]
    pub final_rate: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub inward_quantity: Option<f64>,
    #[serde(default)]
    pub outward_quantity: Option<f64>,
    #[serde(default)]
    pub purchase_date: Option<String>,
    #[serde(default)]
    pub sale_date: Option<String>,
    #[serde(default)]
    pub flags: BadgeFlags,
}

impl Product {
    /// Display name, empty when the record had none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Stock with absent treated as zero.
    #[must_use]
    pub fn stock_or_zero(&self) -> f64 {
        self.quantity_in_stock.unwrap_or(0.0)
    }

    /// True for records reporting a negative stock quantity.
    #[must_use]
    pub fn has_negative_stock(&self) -> bool {
        self.stock_or_zero() < 0.0
    }
}

/// Decodes one wire record into a [`Product`].
///
/// Pure renaming and unpacking: no derived values, no hidden state. Each badge
/// is set only when its wire integer is exactly `1`.
///
/// # Examples
///
/// ```
/// use ratelist::domain::{decode, WireProduct};
/// use serde_json::json;
///
/// let wire = WireProduct::from_value(json!({ "n": "Lungi", "q": -5, "f": { "na": 1 } }));
/// let product = decode(&wire);
/// assert_eq!(product.quantity_in_stock, Some(-5.0));
/// assert!(product.flags.is_new_arrival());
/// ```
#[must_use]
pub fn decode(wire: &WireProduct) -> Product {
    let flags = wire.flags.as_ref().map_or_else(BadgeFlags::empty, |raw| {
        BadgeFlag::ALL
            .into_iter()
            .filter(|flag| raw.raw(flag.wire_code()).is_some_and(|v| (v - 1.0).abs() < f64::EPSILON))
            .collect()
    });

    Product {
        id: wire.id.clone(),
        name: wire.name.clone(),
        category: wire.category.clone(),
        unit_of_measurement: wire.unit.clone(),
        quantity_in_stock: wire.quantity,
        hsn_code: wire.hsn.clone(),
        gst_percentage: wire.gst_percent,
        base_rate: wire.base_rate,
        final_rate: wire.gst_rate,
        rating: wire.rating,
        inward_quantity: wire.inward,
        outward_quantity: wire.outward,
        purchase_date: wire.purchased.clone(),
        sale_date: wire.sold.clone(),
        flags,
    }
}

/// Decodes a whole batch, one product per record, preserving order.
#[must_use]
pub fn decode_all(records: &[WireProduct]) -> Vec<Product> {
    records.iter().map(decode).collect()
}

/// Names of products with negative stock, in list order.
#[must_use]
pub fn negative_stock_names(products: &[Product]) -> Vec<String> {
    products
        .iter()
        .filter(|p| p.has_negative_stock())
        .map(|p| p.name.clone().unwrap_or_else(|| p.id.clone().unwrap_or_else(|| "unnamed".to_string())))
        .collect()
}

//! Bundled offline price list, used when neither the server nor the cache
//! can provide one.

use crate::domain::{decode, Product, WireProduct};
use serde_json::Value;

const SAMPLE_JSON: &str = include_str!("sample_products.json");

/// Decodes the bundled list.
#[must_use]
pub fn sample_products() -> Vec<Product> {
    match serde_json::from_str::<Vec<Value>>(SAMPLE_JSON) {
        Ok(records) => records
            .into_iter()
            .map(|value| decode(&WireProduct::from_value(value)))
            .collect(),
        Err(e) => {
            tracing::error!(error = %e, "bundled sample list is malformed");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::negative_stock_names;
    use std::collections::BTreeSet;

    #[test]
    fn sample_covers_every_category() {
        let products = sample_products();
        assert!(!products.is_empty());

        let categories: BTreeSet<_> = products.iter().filter_map(|p| p.category.as_deref()).collect();
        for expected in ["Suit", "Shawls", "Gamcha", "Lungi", "Towel", "Stole", "Bedsheet", "Blanket"] {
            assert!(categories.contains(expected), "missing {expected}");
        }
    }

    #[test]
    fn sample_has_no_negative_stock() {
        assert!(negative_stock_names(&sample_products()).is_empty());
    }

    #[test]
    fn sample_records_are_complete() {
        for product in sample_products() {
            assert!(product.id.is_some());
            assert!(product.final_rate.is_some());
            assert!(product.rating.is_some());
        }
    }
}

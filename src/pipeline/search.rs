//! Search modes layered on top of the filters.

use super::fuzzy::fuzzy_search;
use crate::domain::Product;
use std::fmt;
use std::str::FromStr;

/// Relative tolerance for rate-mode matches.
pub const RATE_TOLERANCE: f64 = 0.05;

/// How the search query is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Fuzzy match on name, category and HSN code.
    #[default]
    Item,
    /// Numeric match on final rate or GST percentage.
    Rate,
    /// Substring match on HSN code.
    Hsn,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Item => "item",
            Self::Rate => "rate",
            Self::Hsn => "hsn",
        })
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "item" | "name" => Ok(Self::Item),
            "rate" | "price" => Ok(Self::Rate),
            "hsn" | "code" => Ok(Self::Hsn),
            other => Err(format!("unknown search mode: {other}")),
        }
    }
}

/// Reads the leading decimal number of `query`, ignoring any trailing text.
///
/// `"100abc"` reads as 100. Non-finite spellings such as `nan` or `inf` are
/// not numbers here.
fn leading_number(query: &str) -> Option<f64> {
    let bytes = query.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - end - 1;
        if frac_end > end + 1 || mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }

    query[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

fn within_tolerance(value: f64, target: f64) -> bool {
    (value - target).abs() <= value * RATE_TOLERANCE
}

/// Applies `query` to `products` according to `mode`.
///
/// A blank query leaves the list unchanged in every mode, as does a rate
/// query that is not a number.
#[must_use]
pub fn apply_search(products: &[Product], query: &str, mode: SearchMode) -> Vec<Product> {
    let query = query.trim();
    if query.is_empty() {
        return products.to_vec();
    }

    match mode {
        SearchMode::Item => fuzzy_search(products, query),
        SearchMode::Rate => {
            let Some(target) = leading_number(query) else {
                tracing::debug!(query, "rate query is not a number, ignoring");
                return products.to_vec();
            };
            products
                .iter()
                .filter(|p| {
                    within_tolerance(p.final_rate.unwrap_or(0.0), target)
                        || within_tolerance(p.gst_percentage.unwrap_or(0.0), target)
                })
                .cloned()
                .collect()
        }
        SearchMode::Hsn => {
            let needle = query.to_lowercase();
            products
                .iter()
                .filter(|p| {
                    p.hsn_code
                        .as_deref()
                        .is_some_and(|code| code.to_lowercase().contains(&needle))
                })
                .cloned()
                .collect()
        }
    }
}

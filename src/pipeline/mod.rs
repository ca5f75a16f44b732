//! Pure list derivation: filters, then search, then sort.
//!
//! Nothing here touches I/O or emits notifications. Given the same products,
//! state and clock, [`derive`] always returns the same list.
//!
//! # Modules
//!
//! - `filter`: Filter state and the predicate pipeline
//! - `fuzzy`: Typo-tolerant text matcher
//! - `search`: Item, rate and HSN search modes
//! - `sort`: Stable multi-field sort

pub mod filter;
pub mod fuzzy;
pub mod search;
pub mod sort;

pub use filter::{apply_filters, DateField, DatePreset, DateWindow, FilterState, MAX_RATING, MIN_RATING};
pub use fuzzy::fuzzy_search;
pub use search::{apply_search, SearchMode};
pub use sort::{sort_products, SortDirection, SortField, SortState};

use crate::domain::Product;
use chrono::{DateTime, Utc};

/// Computes the visible list from the raw products.
#[must_use]
pub fn derive(products: &[Product], filter: &FilterState, sort: &SortState, now: DateTime<Utc>) -> Vec<Product> {
    let _span = tracing::debug_span!("derive", input = products.len()).entered();

    let filtered = apply_filters(products, filter, now);
    let searched = apply_search(&filtered, &filter.search_query, filter.search_mode);
    let sorted = sort_products(&searched, sort.field, sort.direction);

    tracing::debug!(output = sorted.len(), "derived product list");
    sorted
}

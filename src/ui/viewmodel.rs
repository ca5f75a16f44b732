//! View model types representing renderable state.
//!
//! View models are computed from [`AppState`] by [`compute_viewmodel`] and
//! consumed by the renderer. They hold display-ready data only: formatted
//! prices, badge labels and the character ranges of the search query to
//! highlight in each product name.
//!
//! # Example
//!
//! ```rust
//! use ratelist::app::AppState;
//! use ratelist::ui::compute_viewmodel;
//!
//! let state = AppState::new(true);
//! let vm = compute_viewmodel(&state);
//! assert!(vm.rows.is_empty());
//! assert!(vm.empty_state.is_some());
//! ```

use crate::app::AppState;
use crate::domain::freshness::updated_suffix;
use crate::domain::Product;
use crate::fetch::FetchState;
use crate::pipeline::{FilterState, SearchMode, SortState, MAX_RATING, MIN_RATING};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Title shown when the admin config carries no display name.
pub const DEFAULT_TITLE: &str = "AI Rate List";

/// Complete view model for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct UIViewModel {
    pub header: HeaderInfo,

    /// Visible products, in derived order.
    pub rows: Vec<DisplayItem>,

    pub footer: FooterInfo,

    /// Set when there is nothing to list.
    pub empty_state: Option<EmptyState>,
}

/// Display information for a single product.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayItem {
    pub name: String,
    pub category: String,
    pub unit: String,

    /// Final price formatted with two decimals, `-` when absent.
    pub final_price: String,

    pub stock: f64,

    /// Labels of the badges the product carries.
    pub badges: Vec<&'static str>,

    pub negative_stock: bool,

    /// Character ranges `(start, end)` of `name` matched by the search query,
    /// start inclusive and end exclusive.
    pub highlight_ranges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,

    /// Where the listed data came from, e.g. `live` or `cached`.
    pub status: &'static str,

    /// Relative age of the data, e.g. ` (updated 5 minutes ago)`.
    pub updated: String,

    pub shown: usize,
    pub total: usize,

    /// Set when any loaded product has negative stock.
    pub negative_stock_warning: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    /// One-line summary of the active search, filters and sort.
    pub summary: String,

    pub hint: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
}

const HINT: &str = "help: commands  quit: exit";

/// Builds the view model for the current state.
#[must_use]
pub fn compute_viewmodel(state: &AppState) -> UIViewModel {
    let _span = tracing::debug_span!("compute_viewmodel", shown = state.filtered_products().len()).entered();

    let filter = state.filter();
    let highlight_query = match filter.search_mode {
        SearchMode::Item if !filter.search_query.trim().is_empty() => Some(filter.search_query.trim()),
        _ => None,
    };

    let matcher = SkimMatcherV2::default();
    let rows: Vec<DisplayItem> = state
        .filtered_products()
        .iter()
        .map(|product| display_item(product, highlight_query, &matcher))
        .collect();

    let header = HeaderInfo {
        title: state
            .admin_config
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_TITLE)
            .to_string(),
        status: status_label(state.fetch_state),
        updated: updated_suffix(state.last_update.as_deref(), state.now()),
        shown: rows.len(),
        total: state.products().len(),
        negative_stock_warning: state.has_negative_stock(),
    };

    let empty_state = rows.is_empty().then(|| EmptyState {
        message: empty_message(state),
    });

    UIViewModel {
        header,
        rows,
        footer: FooterInfo {
            summary: summarize(filter, state.sort()),
            hint: HINT,
        },
        empty_state,
    }
}

fn display_item(product: &Product, query: Option<&str>, matcher: &SkimMatcherV2) -> DisplayItem {
    let name = product.display_name().to_string();
    let highlight_ranges = query.map_or_else(Vec::new, |q| highlight_ranges(matcher, &name, q));

    DisplayItem {
        category: product.category.clone().unwrap_or_default(),
        unit: product.unit_of_measurement.clone().unwrap_or_default(),
        final_price: product
            .final_rate
            .map_or_else(|| "-".to_string(), |rate| format!("{rate:.2}")),
        stock: product.stock_or_zero(),
        badges: product.flags.iter().map(|flag| flag.label()).collect(),
        negative_stock: product.has_negative_stock(),
        highlight_ranges,
        name,
    }
}

/// Collapses the matcher's character indices into contiguous ranges.
fn highlight_ranges(matcher: &SkimMatcherV2, text: &str, query: &str) -> Vec<(usize, usize)> {
    let Some((_score, indices)) = matcher.fuzzy_indices(text, query) else {
        return Vec::new();
    };

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for idx in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == idx => *end = idx + 1,
            _ => ranges.push((idx, idx + 1)),
        }
    }
    ranges
}

const fn status_label(state: FetchState) -> &'static str {
    match state {
        FetchState::Idle => "idle",
        FetchState::Loading => "loading",
        FetchState::Succeeded => "live",
        FetchState::CachedFallback => "cached",
        FetchState::SampleFallback => "offline sample",
    }
}

fn empty_message(state: &AppState) -> String {
    if state.fetch_state.is_loading() && state.products().is_empty() {
        return "Loading price list...".to_string();
    }
    if state.products().is_empty() {
        return "No products loaded. Type 'refresh' to try again.".to_string();
    }
    "No products match the current filters. Type 'reset' to clear them.".to_string()
}

fn summarize(filter: &FilterState, sort: &SortState) -> String {
    let mut parts = Vec::new();

    if !filter.search_query.trim().is_empty() {
        parts.push(format!("{} search '{}'", filter.search_mode, filter.search_query.trim()));
    }
    if let Some(category) = &filter.category {
        parts.push(format!("category {category}"));
    }
    if filter.in_stock_only {
        parts.push("in stock".to_string());
    }
    let (min, max) = filter.rating_range;
    if min > MIN_RATING || max < MAX_RATING {
        parts.push(format!("rating {min}-{max}"));
    }
    if !filter.flags.is_empty() {
        let names: Vec<String> = filter.flags.iter().map(|flag| flag.to_string()).collect();
        parts.push(format!("flags {}", names.join("|")));
    }
    if filter.date_window.is_active() {
        parts.push(format!("{} {}", filter.date_window.field, filter.date_window.preset));
    }
    if let Some(field) = sort.field {
        parts.push(format!("sort {field} {}", sort.direction));
    }

    if parts.is_empty() {
        "no filters".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BadgeFlag;
    use crate::pipeline::SortField;
    use crate::storage::AdminConfig;

    fn product(name: &str, category: &str, stock: f64, final_rate: Option<f64>) -> Product {
        Product {
            name: Some(name.to_string()),
            category: Some(category.to_string()),
            unit_of_measurement: Some("pcs".to_string()),
            quantity_in_stock: Some(stock),
            final_rate,
            ..Product::default()
        }
    }

    fn loaded(products: Vec<Product>) -> AppState {
        let mut state = AppState::new(false);
        state.replace_products(products, None);
        state
    }

    #[test]
    fn rows_follow_filtered_products() {
        let mut state = loaded(vec![
            product("Silk Suit", "Suit", 3.0, Some(1499.0)),
            product("Cotton Lungi", "Lungi", 0.0, None),
        ]);
        state.set_in_stock_only(true);

        let vm = compute_viewmodel(&state);
        assert_eq!(vm.rows.len(), 1);
        assert_eq!(vm.rows[0].name, "Silk Suit");
        assert_eq!(vm.rows[0].final_price, "1499.00");
        assert_eq!(vm.rows[0].unit, "pcs");
        assert_eq!(vm.header.shown, 1);
        assert_eq!(vm.header.total, 2);
        assert!(vm.empty_state.is_none());
    }

    #[test]
    fn missing_price_renders_dash() {
        let state = loaded(vec![product("Towel", "Towel", 1.0, None)]);
        assert_eq!(compute_viewmodel(&state).rows[0].final_price, "-");
    }

    #[test]
    fn item_search_produces_highlight_ranges() {
        let mut state = loaded(vec![product("Silk Suit", "Suit", 3.0, None)]);
        state.set_search_query("silk");

        let vm = compute_viewmodel(&state);
        assert_eq!(vm.rows[0].highlight_ranges, vec![(0, 4)]);
    }

    #[test]
    fn other_search_modes_do_not_highlight() {
        let mut state = loaded(vec![product("Silk Suit", "Suit", 3.0, Some(100.0))]);
        state.set_search_mode(SearchMode::Rate);
        state.set_search_query("100");

        let vm = compute_viewmodel(&state);
        assert_eq!(vm.rows.len(), 1);
        assert!(vm.rows[0].highlight_ranges.is_empty());
    }

    #[test]
    fn negative_stock_is_marked() {
        let vm = compute_viewmodel(&loaded(vec![product("Old Lungi", "Lungi", -2.0, None)]));
        assert!(vm.rows[0].negative_stock);
        assert!(vm.header.negative_stock_warning);
    }

    #[test]
    fn badges_use_labels() {
        let mut p = product("Silk Suit", "Suit", 3.0, None);
        p.flags.insert(BadgeFlag::NewArrival);
        let vm = compute_viewmodel(&loaded(vec![p]));
        assert_eq!(vm.rows[0].badges, vec!["New arrival"]);
    }

    #[test]
    fn title_prefers_admin_display_name() {
        let mut state = AppState::new(false);
        assert_eq!(compute_viewmodel(&state).header.title, DEFAULT_TITLE);

        state.admin_config = AdminConfig {
            display_name: Some("Rajan Textiles".to_string()),
            ..AdminConfig::default()
        };
        assert_eq!(compute_viewmodel(&state).header.title, "Rajan Textiles");
    }

    #[test]
    fn empty_state_distinguishes_no_data_from_no_match() {
        let state = AppState::new(false);
        let vm = compute_viewmodel(&state);
        assert!(vm.empty_state.unwrap().message.starts_with("No products loaded"));

        let mut state = loaded(vec![product("Silk Suit", "Suit", 3.0, None)]);
        state.set_category(Some("Towel".to_string()));
        let vm = compute_viewmodel(&state);
        assert!(vm.empty_state.unwrap().message.contains("reset"));
    }

    #[test]
    fn summary_lists_active_settings() {
        let mut state = loaded(vec![product("Silk Suit", "Suit", 3.0, None)]);
        assert_eq!(compute_viewmodel(&state).footer.summary, "no filters");

        state.set_category(Some("Suit".to_string()));
        state.set_in_stock_only(true);
        state.select_sort(SortField::Name);
        let summary = compute_viewmodel(&state).footer.summary;
        assert_eq!(summary, "category Suit, in stock, sort name asc");
    }
}

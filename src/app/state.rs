//! Application state and derived product list.
//!
//! [`AppState`] is the single owner of the raw product list and every piece of
//! user-controlled view state. Each mutator recomputes `filtered_products`
//! through [`pipeline::derive`](crate::pipeline::derive), so readers never see
//! a stale list.
//!
//! # State Components
//!
//! - **Products**: Last list applied from a fetch, in arrival order
//! - **Filter / Sort**: User selections feeding the derivation
//! - **Fetch State**: Where the current list came from, or that a fetch is running
//! - **Admin Config**: Server address and branding
//!
//! # Example
//!
//! ```rust
//! use ratelist::app::AppState;
//! use ratelist::domain::Product;
//!
//! let mut state = AppState::new(false);
//! state.replace_products(vec![Product { name: Some("Stole".into()), ..Product::default() }], None);
//! state.set_search_query("stole");
//! assert_eq!(state.filtered_products().len(), 1);
//! ```

use crate::domain::{negative_stock_names, BadgeFlag, Product};
use crate::fetch::{FetchOutcome, FetchState};
use crate::pipeline::{self, DateWindow, FilterState, SearchMode, SortDirection, SortField, SortState};
use crate::storage::AdminConfig;
use chrono::{DateTime, Utc};

/// Source of the current time for date filters.
pub type Clock = fn() -> DateTime<Utc>;

/// Central application state container.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Raw products from the last applied fetch.
    products: Vec<Product>,

    /// `products` after filters, search and sort.
    filtered_products: Vec<Product>,

    filter: FilterState,
    sort: SortState,

    pub fetch_state: FetchState,

    /// Server-reported update time of `products`.
    pub last_update: Option<String>,

    pub admin_config: AdminConfig,

    clock: Clock,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(false)
    }
}

impl AppState {
    /// Creates an empty state. `in_stock_only` seeds the stock filter.
    #[must_use]
    pub fn new(in_stock_only: bool) -> Self {
        Self {
            products: Vec::new(),
            filtered_products: Vec::new(),
            filter: FilterState {
                in_stock_only,
                ..FilterState::default()
            },
            sort: SortState::default(),
            fetch_state: FetchState::Idle,
            last_update: None,
            admin_config: AdminConfig::default(),
            clock: Utc::now,
        }
    }

    /// Replaces the clock used by date filters.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self.recompute();
        self
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn filtered_products(&self) -> &[Product] {
        &self.filtered_products
    }

    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub const fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.filter.category = category;
        self.recompute();
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.filter.search_query = query.into();
        self.recompute();
    }

    pub fn set_search_mode(&mut self, mode: SearchMode) {
        self.filter.search_mode = mode;
        self.recompute();
    }

    pub fn set_in_stock_only(&mut self, enabled: bool) {
        self.filter.in_stock_only = enabled;
        self.recompute();
    }

    pub fn set_rating_range(&mut self, min: f64, max: f64) {
        self.filter.set_rating_range(min, max);
        self.recompute();
    }

    pub fn toggle_flag(&mut self, flag: BadgeFlag) {
        self.filter.flags.toggle(flag);
        self.recompute();
    }

    pub fn clear_flags(&mut self) {
        self.filter.flags = crate::domain::BadgeFlags::empty();
        self.recompute();
    }

    pub fn set_date_window(&mut self, window: DateWindow) {
        self.filter.date_window = window;
        self.recompute();
    }

    /// Selects a sort column, flipping direction when it is already selected.
    pub fn select_sort(&mut self, field: SortField) {
        self.sort.select(field);
        self.recompute();
    }

    pub fn set_sort(&mut self, field: Option<SortField>, direction: SortDirection) {
        self.sort = SortState { field, direction };
        self.recompute();
    }

    /// Restores every filter to its default and clears sorting.
    pub fn reset_filters(&mut self) {
        self.filter = FilterState::default();
        self.sort.clear();
        self.recompute();
    }

    /// Replaces the whole product list.
    pub fn replace_products(&mut self, products: Vec<Product>, last_update: Option<String>) {
        self.products = products;
        self.last_update = last_update;
        self.recompute();
    }

    /// Applies a finished fetch. The fetch state always leaves `Loading`.
    pub fn apply_outcome(&mut self, outcome: &FetchOutcome) {
        self.fetch_state = outcome.state;
        self.replace_products(outcome.products.clone(), outcome.last_update.clone());
    }

    #[must_use]
    pub fn has_negative_stock(&self) -> bool {
        self.products.iter().any(Product::has_negative_stock)
    }

    #[must_use]
    pub fn negative_stock_names(&self) -> Vec<String> {
        negative_stock_names(&self.products)
    }

    /// Distinct categories in arrival order.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut seen = Vec::<String>::new();
        for category in self.products.iter().filter_map(|p| p.category.as_ref()) {
            if !seen.contains(category) {
                seen.push(category.clone());
            }
        }
        seen
    }

    /// Recomputes `filtered_products` from the raw list.
    pub fn recompute(&mut self) {
        self.filtered_products = pipeline::derive(&self.products, &self.filter, &self.sort, self.now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{Notification, Placement};
    use crate::pipeline::{DateField, DatePreset};
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap()
    }

    fn product(name: &str, category: &str, stock: f64) -> Product {
        Product {
            name: Some(name.to_string()),
            category: Some(category.to_string()),
            quantity_in_stock: Some(stock),
            ..Product::default()
        }
    }

    fn visible(state: &AppState) -> Vec<&str> {
        state.filtered_products().iter().map(Product::display_name).collect()
    }

    fn seeded(in_stock_only: bool) -> AppState {
        let mut state = AppState::new(in_stock_only).with_clock(fixed_now);
        state.replace_products(
            vec![
                product("Silk Suit", "Suit", 4.0),
                product("Bath Towel", "Towel", 0.0),
                product("Cotton Suit", "Suit", -2.0),
                product("Hand Towel", "Towel", 7.0),
            ],
            Some("2025-06-14T00:00:00Z".into()),
        );
        state
    }

    #[test]
    fn stock_only_seeds_from_constructor() {
        assert_eq!(visible(&seeded(true)), vec!["Silk Suit", "Hand Towel"]);
        assert_eq!(visible(&seeded(false)).len(), 4);
    }

    #[test]
    fn every_mutator_recomputes() {
        let mut state = seeded(false);

        state.set_category(Some("Towel".into()));
        assert_eq!(visible(&state), vec!["Bath Towel", "Hand Towel"]);

        state.set_in_stock_only(true);
        assert_eq!(visible(&state), vec!["Hand Towel"]);

        state.set_category(None);
        state.select_sort(SortField::Name);
        state.select_sort(SortField::Name);
        assert_eq!(visible(&state), vec!["Silk Suit", "Hand Towel"]);

        state.set_date_window(DateWindow { field: DateField::Sale, preset: DatePreset::LastYear });
        assert!(visible(&state).is_empty());

        state.reset_filters();
        assert_eq!(visible(&state).len(), 4);
        assert_eq!(*state.sort(), SortState::default());
        assert!(!state.filter().in_stock_only);
    }

    #[test]
    fn derived_queries() {
        let state = seeded(false);
        assert!(state.has_negative_stock());
        assert_eq!(state.negative_stock_names(), vec!["Cotton Suit".to_string()]);
        assert_eq!(state.categories(), vec!["Suit".to_string(), "Towel".to_string()]);
    }

    #[test]
    fn outcome_replaces_list_and_state() {
        let mut state = seeded(false);
        state.fetch_state = FetchState::Loading;
        state.apply_outcome(&FetchOutcome {
            trigger: crate::fetch::FetchTrigger::Manual,
            state: FetchState::CachedFallback,
            products: vec![product("Lungi", "Lungi", 3.0)],
            last_update: None,
            notification: Notification::info("Using cached data", Placement::Top),
        });
        assert_eq!(state.fetch_state, FetchState::CachedFallback);
        assert_eq!(visible(&state), vec!["Lungi"]);
        assert_eq!(state.last_update, None);
        assert!(!state.has_negative_stock());
    }
}

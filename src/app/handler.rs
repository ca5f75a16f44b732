//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only place user input and fetch results change
//! [`AppState`]. It is synchronous and performs no I/O: side effects come back
//! as [`Action`]s for the session to execute.
//!
//! # Event Types
//!
//! - **Filters**: `SetCategory`, `SetSearchQuery`, `SetSearchMode`,
//!   `SetInStockOnly`, `SetRatingRange`, `ToggleFlag`, `ClearFlags`,
//!   `SetDateWindow`, `ResetFilters`
//! - **Sorting**: `SelectSort`, `ClearSort`
//! - **Data**: `Refresh`, `FetchCompleted`, `UpdateAdminConfig`
//! - **Other**: `ListCategories`, `Quit`

use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::BadgeFlag;
use crate::fetch::{FetchOutcome, FetchState, FetchTrigger};
use crate::notify::{Notification, Placement};
use crate::pipeline::{DateWindow, SearchMode, SortDirection, SortField};
use crate::storage::AdminConfig;

/// Input to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Restricts to one category, or clears the restriction.
    SetCategory(Option<String>),
    SetSearchQuery(String),
    SetSearchMode(SearchMode),
    SetInStockOnly(bool),
    SetRatingRange {
        min: f64,
        max: f64,
    },
    ToggleFlag(BadgeFlag),
    ClearFlags,
    SetDateWindow(DateWindow),
    ResetFilters,

    /// Selects a sort column, toggling direction on repeat.
    SelectSort(SortField),
    ClearSort,

    /// Requests a fetch.
    Refresh(FetchTrigger),

    /// Delivers the result of a fetch started by [`Action::RunFetch`].
    FetchCompleted(FetchOutcome),

    /// Stores a new admin config and refetches from its server.
    UpdateAdminConfig(AdminConfig),

    /// Asks for the list of known categories.
    ListCategories,

    Quit,
}

impl Event {
    /// Variant name, for logging without dumping payloads.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SetCategory(_) => "set_category",
            Self::SetSearchQuery(_) => "set_search_query",
            Self::SetSearchMode(_) => "set_search_mode",
            Self::SetInStockOnly(_) => "set_in_stock_only",
            Self::SetRatingRange { .. } => "set_rating_range",
            Self::ToggleFlag(_) => "toggle_flag",
            Self::ClearFlags => "clear_flags",
            Self::SetDateWindow(_) => "set_date_window",
            Self::ResetFilters => "reset_filters",
            Self::SelectSort(_) => "select_sort",
            Self::ClearSort => "clear_sort",
            Self::Refresh(_) => "refresh",
            Self::FetchCompleted(_) => "fetch_completed",
            Self::UpdateAdminConfig(_) => "update_admin_config",
            Self::ListCategories => "list_categories",
            Self::Quit => "quit",
        }
    }
}

fn notify_success(message: impl Into<String>) -> Action {
    Action::Notify(Notification::success(message, Placement::Center))
}

fn flag_count_notice(state: &AppState) -> Action {
    let count = state.filter().flags.iter().count();
    notify_success(format!("{count} badge filters selected"))
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// The boolean reports whether the visible state changed and the view should
/// be redrawn.
///
/// # Errors
///
/// No current event fails.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event.kind()).entered();

    match event {
        Event::SetCategory(category) => {
            state.set_category(category.clone());
            let count = match category {
                Some(name) => state
                    .products()
                    .iter()
                    .filter(|p| p.category.as_deref() == Some(name.as_str()))
                    .count(),
                None => state.products().len(),
            };
            let label = category.as_deref().unwrap_or("All");
            Ok((true, vec![notify_success(format!("Filtered by {label}: {count} items"))]))
        }
        Event::SetSearchQuery(query) => {
            tracing::trace!(query = %query, "search query updated");
            state.set_search_query(query.clone());
            Ok((true, vec![]))
        }
        Event::SetSearchMode(mode) => {
            state.set_search_mode(*mode);
            Ok((true, vec![]))
        }
        Event::SetInStockOnly(enabled) => {
            state.set_in_stock_only(*enabled);
            let notification = if *enabled {
                Notification::success("Showing in-stock items only", Placement::Center)
            } else {
                Notification::error("Showing all stock items", Placement::Center)
            };
            Ok((true, vec![Action::Notify(notification)]))
        }
        Event::SetRatingRange { min, max } => {
            state.set_rating_range(*min, *max);
            Ok((true, vec![]))
        }
        Event::ToggleFlag(flag) => {
            state.toggle_flag(*flag);
            Ok((true, vec![flag_count_notice(state)]))
        }
        Event::ClearFlags => {
            state.clear_flags();
            Ok((true, vec![flag_count_notice(state)]))
        }
        Event::SetDateWindow(window) => {
            state.set_date_window(*window);
            let message = format!("Date filter changed to {}: {}", window.field, window.preset);
            Ok((true, vec![notify_success(message)]))
        }
        Event::ResetFilters => {
            tracing::debug!("resetting filters");
            state.reset_filters();
            Ok((
                true,
                vec![Action::Notify(Notification::info("All filters have been reset", Placement::Center))],
            ))
        }
        Event::SelectSort(field) => {
            state.select_sort(*field);
            let direction = state.sort().direction;
            tracing::debug!(field = %field, %direction, "sort selected");
            let word = match direction {
                SortDirection::Asc => "ascending",
                SortDirection::Desc => "descending",
            };
            Ok((true, vec![notify_success(format!("Sorted by {field} {word}"))]))
        }
        Event::ClearSort => {
            state.set_sort(None, SortDirection::Asc);
            Ok((true, vec![]))
        }
        Event::Refresh(trigger) => {
            if state.fetch_state.is_loading() {
                tracing::debug!(%trigger, "fetch already running, ignoring");
                return Ok((false, vec![]));
            }
            state.fetch_state = FetchState::Loading;
            Ok((true, vec![Action::RunFetch(*trigger)]))
        }
        Event::FetchCompleted(outcome) => {
            let old_filtered = state.filtered_products().to_vec();
            state.apply_outcome(outcome);

            let mut actions = vec![Action::Notify(outcome.notification.clone())];
            if let Some(warning) = Notification::negative_stock(&state.negative_stock_names()) {
                actions.push(Action::Notify(warning));
            }

            tracing::debug!(
                state = ?outcome.state,
                count = state.products().len(),
                visible = state.filtered_products().len(),
                "fetch applied"
            );
            Ok((state.filtered_products() != old_filtered.as_slice(), actions))
        }
        Event::UpdateAdminConfig(config) => {
            tracing::debug!(server = ?config.server(), "admin config updated");
            state.admin_config = config.clone();
            Ok((
                false,
                vec![
                    Action::PersistAdminConfig(config.clone()),
                    notify_success("Admin configuration saved successfully"),
                    Action::RunFetch(FetchTrigger::Manual),
                ],
            ))
        }
        Event::ListCategories => {
            let categories = state.categories();
            let message = if categories.is_empty() {
                "No categories".to_string()
            } else {
                format!("Categories: {}", categories.join(", "))
            };
            Ok((false, vec![Action::Notify(Notification::info(message, Placement::Center))]))
        }
        Event::Quit => Ok((false, vec![Action::Quit])),
    }
}

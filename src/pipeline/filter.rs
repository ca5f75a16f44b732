//! Filter state and the predicate pipeline.
//!
//! Filters are independent masks combined with AND: category, stock, rating
//! range, badge flags (OR within the selected set) and a date window. Every
//! filter has a no-op value; with all of them at no-op the input comes back
//! unchanged.

use super::search::SearchMode;
use crate::domain::freshness::parse_timestamp;
use crate::domain::{BadgeFlags, Product};
use chrono::{DateTime, Months, Utc};
use std::fmt;
use std::str::FromStr;

/// Lowest rating a product can carry.
pub const MIN_RATING: f64 = 0.0;

/// Highest rating a product can carry.
pub const MAX_RATING: f64 = 5.0;

/// Which product timestamp a date window applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateField {
    #[default]
    Purchase,
    Sale,
}

impl DateField {
    fn value(self, product: &Product) -> Option<&str> {
        match self {
            Self::Purchase => product.purchase_date.as_deref(),
            Self::Sale => product.sale_date.as_deref(),
        }
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Purchase => "purchase",
            Self::Sale => "sale",
        })
    }
}

impl FromStr for DateField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "purchase" => Ok(Self::Purchase),
            "sale" => Ok(Self::Sale),
            other => Err(format!("unknown date field: {other}")),
        }
    }
}

/// Time span a date window keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DatePreset {
    LastMonth,
    LastQuarter,
    LastYear,
    #[default]
    AllTime,
    /// Inclusive range.
    Custom {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl DatePreset {
    /// Earliest timestamp kept by a relative preset, `None` for all-time and custom.
    fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let months = match self {
            Self::LastMonth => 1,
            Self::LastQuarter => 3,
            Self::LastYear => 12,
            Self::AllTime | Self::Custom { .. } => return None,
        };
        Some(now.checked_sub_months(Months::new(months)).unwrap_or(DateTime::<Utc>::MIN_UTC))
    }
}

impl fmt::Display for DatePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LastMonth => f.write_str("last-month"),
            Self::LastQuarter => f.write_str("last-quarter"),
            Self::LastYear => f.write_str("last-year"),
            Self::AllTime => f.write_str("all-time"),
            Self::Custom { start, end } => {
                write!(f, "{} to {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
            }
        }
    }
}

/// Date restriction on one of the product timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub field: DateField,
    pub preset: DatePreset,
}

impl DateWindow {
    /// True unless the preset is all-time.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.preset, DatePreset::AllTime)
    }

    /// Builds a custom window from user-entered bounds.
    ///
    /// A date-only `end` covers the whole day. Bounds given in the wrong order
    /// are swapped.
    ///
    /// # Errors
    ///
    /// Returns the offending input when either bound does not parse.
    pub fn custom(field: DateField, start: &str, end: &str) -> Result<Self, String> {
        let start_at = parse_timestamp(start).ok_or_else(|| format!("invalid start date: {start}"))?;
        let end_at = parse_timestamp(end).ok_or_else(|| format!("invalid end date: {end}"))?;
        let (start, (mut end, end_raw)) = if start_at <= end_at {
            (start_at, (end_at, end))
        } else {
            (end_at, (start_at, start))
        };
        if is_date_only(end_raw) {
            end = end + chrono::Duration::days(1) - chrono::Duration::nanoseconds(1);
        }
        Ok(Self {
            field,
            preset: DatePreset::Custom { start, end },
        })
    }

    fn keeps(&self, product: &Product, now: DateTime<Utc>) -> bool {
        let Some(date) = self.field.value(product).and_then(parse_timestamp) else {
            return false;
        };
        match self.preset {
            DatePreset::AllTime => true,
            DatePreset::Custom { start, end } => date >= start && date <= end,
            preset => preset.cutoff(now).is_some_and(|cutoff| date >= cutoff),
        }
    }
}

fn is_date_only(raw: &str) -> bool {
    let raw = raw.trim();
    raw.len() == 10 && !raw.contains(['T', ' '])
}

/// User-controlled filter and search state.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// Exact category to keep; `None` keeps every category.
    pub category: Option<String>,

    /// Free-text query, interpreted according to `search_mode`.
    pub search_query: String,

    pub search_mode: SearchMode,

    /// Keep only products with positive stock.
    pub in_stock_only: bool,

    /// Inclusive rating range, always within `[MIN_RATING, MAX_RATING]`.
    pub rating_range: (f64, f64),

    /// Badges to keep; a product matches if it has any of them.
    pub flags: BadgeFlags,

    pub date_window: DateWindow,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            category: None,
            search_query: String::new(),
            search_mode: SearchMode::Item,
            in_stock_only: false,
            rating_range: (MIN_RATING, MAX_RATING),
            flags: BadgeFlags::empty(),
            date_window: DateWindow::default(),
        }
    }
}

impl FilterState {
    /// Sets the rating range, clamping to the valid domain and swapping
    /// reversed bounds.
    pub fn set_rating_range(&mut self, min: f64, max: f64) {
        let clamp = |v: f64| if v.is_nan() { MIN_RATING } else { v.clamp(MIN_RATING, MAX_RATING) };
        let (min, max) = (clamp(min), clamp(max));
        self.rating_range = if min <= max { (min, max) } else { (max, min) };
    }

    fn rating_is_full_range(&self) -> bool {
        self.rating_range.0 <= MIN_RATING && self.rating_range.1 >= MAX_RATING
    }
}

/// Applies every active filter of `state` (search excluded) to `products`.
///
/// Order: category, stock, rating, badge flags, date window. The result does
/// not depend on that order.
#[must_use]
pub fn apply_filters(products: &[Product], state: &FilterState, now: DateTime<Utc>) -> Vec<Product> {
    let check_rating = !state.rating_is_full_range();
    let (min_rating, max_rating) = state.rating_range;

    products
        .iter()
        .filter(|p| {
            state
                .category
                .as_ref()
                .map_or(true, |wanted| p.category.as_ref() == Some(wanted))
        })
        .filter(|p| !state.in_stock_only || p.stock_or_zero() > 0.0)
        .filter(|p| {
            if !check_rating {
                return true;
            }
            let rating = p.rating.unwrap_or(0.0);
            rating >= min_rating && rating <= max_rating
        })
        .filter(|p| state.flags.is_empty() || p.flags.intersects(state.flags))
        .filter(|p| !state.date_window.is_active() || state.date_window.keeps(p, now))
        .cloned()
        .collect()
}

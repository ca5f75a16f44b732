//! Plain-text rendering of the view model.
//!
//! Output is a single `String` so callers decide where it goes. With `ansi`
//! enabled, matched characters are bold and underlined and negative stock is
//! red; otherwise matches are wrapped in brackets.

use crate::app::AppState;
use crate::ui::viewmodel::{compute_viewmodel, DisplayItem, UIViewModel};
use std::fmt::Write as _;

const BOLD_UNDERLINE: &str = "\x1b[1;4m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

const NAME_WIDTH: usize = 28;
const CATEGORY_WIDTH: usize = 10;
const UNIT_WIDTH: usize = 6;
const PRICE_WIDTH: usize = 10;
const STOCK_WIDTH: usize = 8;

/// Renders the current state.
///
/// # Example
///
/// ```rust
/// use ratelist::app::AppState;
/// use ratelist::ui::render;
///
/// let out = render(&AppState::new(true), false);
/// assert!(out.contains("AI Rate List"));
/// ```
#[must_use]
pub fn render(state: &AppState, ansi: bool) -> String {
    render_viewmodel(&compute_viewmodel(state), ansi)
}

/// Renders a precomputed view model.
#[must_use]
pub fn render_viewmodel(vm: &UIViewModel, ansi: bool) -> String {
    let mut out = String::new();

    let header = &vm.header;
    let _ = writeln!(
        out,
        "{} [{}]{}  {}/{} items",
        header.title, header.status, header.updated, header.shown, header.total
    );
    if header.negative_stock_warning {
        let warning = "warning: some items have negative stock";
        if ansi {
            let _ = writeln!(out, "{RED}{warning}{RESET}");
        } else {
            let _ = writeln!(out, "{warning}");
        }
    }

    if let Some(empty) = &vm.empty_state {
        let _ = writeln!(out, "\n  {}\n", empty.message);
    } else {
        let _ = writeln!(
            out,
            "  {:<NAME_WIDTH$} {:<CATEGORY_WIDTH$} {:<UNIT_WIDTH$} {:>PRICE_WIDTH$} {:>STOCK_WIDTH$}  badges",
            "name", "category", "unit", "price", "stock"
        );
        for row in &vm.rows {
            render_row(&mut out, row, ansi);
        }
    }

    let _ = write!(out, "-- {} | {}", vm.footer.summary, vm.footer.hint);
    out
}

fn render_row(out: &mut String, row: &DisplayItem, ansi: bool) {
    let marker = if row.negative_stock { '!' } else { ' ' };
    let name = truncate(&row.name, NAME_WIDTH);
    let padding = NAME_WIDTH.saturating_sub(name.chars().count());
    let highlighted = highlight(&name, &row.highlight_ranges, ansi);

    let stock = format!("{:>STOCK_WIDTH$}", format_stock(row.stock));
    let stock = if ansi && row.negative_stock {
        format!("{RED}{stock}{RESET}")
    } else {
        stock
    };

    let _ = writeln!(
        out,
        "{marker} {highlighted}{:padding$} {:<CATEGORY_WIDTH$} {:<UNIT_WIDTH$} {:>PRICE_WIDTH$} {stock}  {}",
        "",
        truncate(&row.category, CATEGORY_WIDTH),
        truncate(&row.unit, UNIT_WIDTH),
        row.final_price,
        row.badges.join(", "),
    );
}

/// Marks the given character ranges of `text`.
///
/// Ranges are character indices, start inclusive and end exclusive. Ranges
/// past the end of `text` are clipped.
#[must_use]
pub fn highlight(text: &str, ranges: &[(usize, usize)], ansi: bool) -> String {
    if ranges.is_empty() {
        return text.to_string();
    }
    let (open, close) = if ansi { (BOLD_UNDERLINE, RESET) } else { ("[", "]") };

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + ranges.len() * 8);
    let mut pos = 0;

    for &(start, end) in ranges {
        let start = start.clamp(pos, chars.len());
        let end = end.clamp(start, chars.len());
        if start == end {
            continue;
        }
        out.extend(&chars[pos..start]);
        out.push_str(open);
        out.extend(&chars[start..end]);
        out.push_str(close);
        pos = end;
    }
    out.extend(&chars[pos..]);
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('~');
    cut
}

fn format_stock(stock: f64) -> String {
    if stock.fract() == 0.0 && stock.abs() < 1e15 {
        format!("{stock:.0}")
    } else {
        format!("{stock:.2}")
    }
}

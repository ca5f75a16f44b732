//! Line-oriented command parser for the interactive front end.
//!
//! Each input line maps to at most one [`Event`]. Parsing never touches state
//! except to read the current admin config, which `server` amends.

use crate::app::{AppState, Event};
use crate::domain::error::{RateListError, Result};
use crate::domain::BadgeFlag;
use crate::fetch::FetchTrigger;
use crate::pipeline::{DateField, DatePreset, DateWindow, SearchMode, SortField};

/// Usage text printed by `help`.
pub const HELP: &str = "\
commands:
  search <text>                          set the search query (empty clears)
  mode item|rate|hsn                     choose how the query is matched
  category <name>|all                    restrict to one category
  stock on|off                           only show items in stock
  sort <field>|off                       category, name, rating, stock, price, hsn
  rating <min> <max>                     keep ratings in range (0-5)
  flag <name>                            toggle a badge filter
  flags clear                            clear badge filters
  date purchase|sale <preset> [from to]  last-month, last-quarter, last-year, all-time, custom
  reset                                  restore default filters
  refresh                                fetch the list again
  server <address>                       change the price list server
  categories                             list known categories
  quit                                   exit";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Event(Event),
    Help,
    /// Blank line.
    Nothing,
}

fn invalid(message: impl Into<String>) -> RateListError {
    RateListError::InvalidInput(message.into())
}

fn on_off(arg: &str) -> Result<bool> {
    match arg.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(invalid(format!("expected on or off, got '{other}'"))),
    }
}

fn parse_rating(arg: Option<&str>) -> Result<f64> {
    let raw = arg.ok_or_else(|| invalid("usage: rating <min> <max>"))?;
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(format!("invalid rating: {raw}")))
}

fn parse_date(args: &[&str]) -> Result<Event> {
    let [field, preset, rest @ ..] = args else {
        return Err(invalid("usage: date purchase|sale <preset> [from to]"));
    };
    let field: DateField = field.parse().map_err(invalid)?;

    let preset = match (preset.to_ascii_lowercase().as_str(), rest) {
        ("last-month" | "month", []) => DatePreset::LastMonth,
        ("last-quarter" | "quarter", []) => DatePreset::LastQuarter,
        ("last-year" | "year", []) => DatePreset::LastYear,
        ("all-time" | "all", []) => DatePreset::AllTime,
        ("custom", [start, end]) => return DateWindow::custom(field, start, end).map(Event::SetDateWindow).map_err(invalid),
        ("custom", _) => return Err(invalid("usage: date purchase|sale custom <from> <to>")),
        (other, _) => return Err(invalid(format!("unknown date preset: {other}"))),
    };
    Ok(Event::SetDateWindow(DateWindow { field, preset }))
}

/// Parses one input line.
///
/// # Errors
///
/// Returns [`RateListError::InvalidInput`] with a message fit for the user when
/// the line is not a valid command.
pub fn parse_command(line: &str, state: &AppState) -> Result<Command> {
    let line = line.trim();
    let (head, tail) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let tail = tail.trim();
    let args: Vec<&str> = tail.split_whitespace().collect();

    let event = match head.to_ascii_lowercase().as_str() {
        "" => return Ok(Command::Nothing),
        "help" | "?" => return Ok(Command::Help),
        "search" | "s" => Event::SetSearchQuery(tail.to_string()),
        "mode" => Event::SetSearchMode(tail.parse::<SearchMode>().map_err(invalid)?),
        "category" | "cat" => match tail {
            "" => return Err(invalid("usage: category <name>|all")),
            t if t.eq_ignore_ascii_case("all") => Event::SetCategory(None),
            t => Event::SetCategory(Some(t.to_string())),
        },
        "stock" => Event::SetInStockOnly(on_off(tail)?),
        "sort" => match tail {
            t if t.eq_ignore_ascii_case("off") => Event::ClearSort,
            t => Event::SelectSort(t.parse::<SortField>().map_err(invalid)?),
        },
        "rating" => Event::SetRatingRange {
            min: parse_rating(args.first().copied())?,
            max: parse_rating(args.get(1).copied())?,
        },
        "flag" => Event::ToggleFlag(tail.parse::<BadgeFlag>().map_err(invalid)?),
        "flags" if tail.eq_ignore_ascii_case("clear") => Event::ClearFlags,
        "date" => parse_date(&args)?,
        "reset" => Event::ResetFilters,
        "refresh" | "r" => Event::Refresh(FetchTrigger::Manual),
        "server" => {
            if tail.is_empty() {
                return Err(invalid("usage: server <address>"));
            }
            let mut config = state.admin_config.clone();
            config.server_url = Some(tail.to_string());
            Event::UpdateAdminConfig(config)
        }
        "categories" => Event::ListCategories,
        "quit" | "exit" | "q" => Event::Quit,
        other => return Err(invalid(format!("unknown command '{other}', try 'help'"))),
    };
    Ok(Command::Event(event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::AdminConfig;

    fn parse(line: &str) -> Result<Command> {
        parse_command(line, &AppState::new(false))
    }

    fn event(line: &str) -> Event {
        match parse(line) {
            Ok(Command::Event(event)) => event,
            other => panic!("expected event for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn simple_commands() {
        assert_eq!(event("search silk suit"), Event::SetSearchQuery("silk suit".into()));
        assert_eq!(event("search"), Event::SetSearchQuery(String::new()));
        assert_eq!(event("mode rate"), Event::SetSearchMode(SearchMode::Rate));
        assert_eq!(event("category Suit"), Event::SetCategory(Some("Suit".into())));
        assert_eq!(event("category ALL"), Event::SetCategory(None));
        assert_eq!(event("stock off"), Event::SetInStockOnly(false));
        assert_eq!(event("sort price"), Event::SelectSort(SortField::FinalPrice));
        assert_eq!(event("sort off"), Event::ClearSort);
        assert_eq!(event("rating 3 5"), Event::SetRatingRange { min: 3.0, max: 5.0 });
        assert_eq!(event("flag new-arrival"), Event::ToggleFlag(BadgeFlag::NewArrival));
        assert_eq!(event("flags clear"), Event::ClearFlags);
        assert_eq!(event("refresh"), Event::Refresh(FetchTrigger::Manual));
        assert_eq!(event("categories"), Event::ListCategories);
        assert_eq!(event("quit"), Event::Quit);
    }

    #[test]
    fn blank_and_help() {
        assert_eq!(parse("   ").unwrap(), Command::Nothing);
        assert_eq!(parse("help").unwrap(), Command::Help);
    }

    #[test]
    fn date_presets_and_custom_ranges() {
        assert_eq!(
            event("date sale last-quarter"),
            Event::SetDateWindow(DateWindow { field: DateField::Sale, preset: DatePreset::LastQuarter })
        );
        let Event::SetDateWindow(window) = event("date purchase custom 2025-01-01 2025-01-31") else {
            panic!("expected date window");
        };
        assert!(matches!(window.preset, DatePreset::Custom { .. }));

        assert!(parse("date purchase custom 2025-01-01").is_err());
        assert!(parse("date purchase custom yesterday today").is_err());
        assert!(parse("date shipped all-time").is_err());
    }

    #[test]
    fn server_keeps_other_admin_fields() {
        let mut state = AppState::new(false);
        state.admin_config = AdminConfig {
            display_name: Some("Textile House".into()),
            ..AdminConfig::default()
        };
        let Ok(Command::Event(Event::UpdateAdminConfig(config))) = parse_command("server 10.0.0.9:9000", &state) else {
            panic!("expected admin update");
        };
        assert_eq!(config.server(), Some("10.0.0.9:9000"));
        assert_eq!(config.display_name.as_deref(), Some("Textile House"));
    }

    #[test]
    fn bad_input_is_reported() {
        for line in ["stock maybe", "rating 3", "rating x 4", "sort colour", "flag shiny", "dance", "server"] {
            assert!(
                matches!(parse(line), Err(RateListError::InvalidInput(_))),
                "{line} should be rejected"
            );
        }
    }
}

//! Human-readable "time since last update" strings for notifications.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Number of seconds in one minute.
const SECONDS_PER_MINUTE: i64 = 60;

/// Number of minutes in one hour.
const MINUTES_PER_HOUR: i64 = 60;

/// Number of hours in one day.
const HOURS_PER_DAY: i64 = 24;

/// Parses a timestamp as sent by the server or stored in a product record.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` (with optional
/// fractional seconds) and plain `YYYY-MM-DD`. Naive values are taken as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Returns a string describing how long before `now` the timestamp lies.
///
/// - under a minute: "N seconds ago"
/// - under an hour: "N minute(s) ago"
/// - under a day: "H hour(s) ago", or "H.T hours ago" where T counts tenths
///   of an hour from the leftover minutes
/// - otherwise: "D day(s) ago"
///
/// Timestamps in the future count as zero seconds.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use ratelist::domain::freshness::time_ago;
///
/// let now = Utc::now();
/// assert_eq!(time_ago(now - Duration::minutes(5), now), "5 minutes ago");
/// assert_eq!(time_ago(now - Duration::minutes(150), now), "2.5 hours ago");
/// ```
#[must_use]
pub fn time_ago(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - updated_at).num_seconds().max(0);
    if seconds < SECONDS_PER_MINUTE {
        return format!("{seconds} seconds ago");
    }

    let minutes = seconds / SECONDS_PER_MINUTE;
    if minutes < MINUTES_PER_HOUR {
        return format!("{minutes} minute{} ago", plural(minutes));
    }

    let hours = minutes / MINUTES_PER_HOUR;
    if hours < HOURS_PER_DAY {
        let remaining = minutes % MINUTES_PER_HOUR;
        if remaining > 0 {
            return format!("{hours}.{} hour{} ago", remaining / 6, plural(hours));
        }
        return format!("{hours} hour{} ago", plural(hours));
    }

    let days = hours / HOURS_PER_DAY;
    format!("{days} day{} ago", plural(days))
}

/// Formats the " (updated X)" suffix used in notifications, empty when the
/// timestamp is absent or unparsable.
#[must_use]
pub fn updated_suffix(last_update: Option<&str>, now: DateTime<Utc>) -> String {
    last_update
        .and_then(parse_timestamp)
        .map(|at| format!(" (updated {})", time_ago(at, now)))
        .unwrap_or_default()
}

const fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn formats_each_band() {
        assert_eq!(time_ago(now() - Duration::seconds(42), now()), "42 seconds ago");
        assert_eq!(time_ago(now() - Duration::minutes(1), now()), "1 minute ago");
        assert_eq!(time_ago(now() - Duration::hours(1), now()), "1 hour ago");
        assert_eq!(time_ago(now() - Duration::minutes(65), now()), "1.0 hour ago");
        assert_eq!(time_ago(now() - Duration::hours(3), now()), "3 hours ago");
        assert_eq!(time_ago(now() - Duration::days(2), now()), "2 days ago");
    }

    #[test]
    fn future_clamps_to_zero() {
        assert_eq!(time_ago(now() + Duration::minutes(3), now()), "0 seconds ago");
    }

    #[test]
    fn parses_supported_formats() {
        assert_eq!(parse_timestamp("2025-03-15T12:00:00Z"), Some(now()));
        assert_eq!(parse_timestamp("2025-03-15 12:00:00"), Some(now()));
        assert_eq!(parse_timestamp("2025-03-15T12:00:00.000"), Some(now()));
        assert_eq!(
            parse_timestamp("2025-03-15"),
            Some(Utc.with_ymd_and_hms(2025, 3, 15, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn suffix_is_empty_without_timestamp() {
        assert_eq!(updated_suffix(None, now()), "");
        assert_eq!(updated_suffix(Some("garbage"), now()), "");
        assert_eq!(
            updated_suffix(Some("2025-03-15T11:58:00Z"), now()),
            " (updated 2 minutes ago)"
        );
    }
}

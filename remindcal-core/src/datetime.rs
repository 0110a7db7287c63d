//! Timestamp parsing, formatting and normalization.
//!
//! Every timestamp is stored in UTC at whole-second precision. User input and
//! display use one fixed layout interpreted in the local time zone.

use chrono::{DateTime, Local, NaiveDateTime, SubsecRound, TimeZone, Utc};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

use crate::error::{CalendarError, CalendarResult};

/// strftime layout used for both parsing and display.
pub const LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

/// Human-readable form of [`LAYOUT`] for help text.
pub const LAYOUT_HINT: &str = "YYYY-MM-DD HH:MM:SS";

/// Accepted duration form for help text.
pub const DURATION_HINT: &str = "whole hours, minutes and seconds, e.g. 1h50m30s";

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+[hms])+$").expect("valid duration regex"));

/// Parse a local wall-clock string into a UTC instant.
///
/// Ambiguous local times (DST fall-back) resolve to the earliest instant;
/// local times that do not exist (DST spring-forward) are rejected.
pub fn parse_local(input: &str) -> CalendarResult<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(input.trim(), LAYOUT)
        .map_err(|_| CalendarError::InvalidDate)?;

    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or(CalendarError::InvalidDate)?;

    Ok(normalize(local.with_timezone(&Utc)))
}

/// Render a UTC instant in the local layout (inverse of [`parse_local`]).
pub fn format_local(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(LAYOUT).to_string()
}

/// Drop sub-second components so equality and persistence are deterministic.
pub fn normalize(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(0)
}

/// Parse a compact duration such as `10m` or `1h50m30s`.
///
/// Only `h`, `m` and `s` units with whole numbers are accepted. Returns `None`
/// when the input is not such a duration, so callers can fall back to
/// absolute date parsing. Zero and negative durations are reported as
/// [`CalendarError::ZeroDuration`].
pub fn parse_duration(input: &str) -> Option<CalendarResult<Duration>> {
    let input = input.trim();

    if let Some(rest) = input.strip_prefix('-') {
        return is_compact_duration(rest.trim()).then_some(Err(CalendarError::ZeroDuration));
    }

    if !is_compact_duration(input) {
        return None;
    }
    let duration = humantime::parse_duration(input).ok()?;
    if duration.is_zero() {
        return Some(Err(CalendarError::ZeroDuration));
    }
    Some(Ok(duration))
}

fn is_compact_duration(input: &str) -> bool {
    DURATION_RE.is_match(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Timelike};

    #[test]
    fn parse_and_format_round_trip() {
        let parsed = parse_local("2030-03-20 15:04:05").unwrap();
        assert_eq!(format_local(parsed), "2030-03-20 15:04:05");
    }

    #[test]
    fn parse_trims_whitespace() {
        assert!(parse_local("  2030-03-20 15:04:05 ").is_ok());
    }

    #[test]
    fn parse_rejects_other_layouts() {
        for input in ["", "tomorrow", "2030-03-20", "2030-03-20T15:04:05", "20.03.2030 15:04:05"] {
            assert!(
                matches!(parse_local(input), Err(CalendarError::InvalidDate)),
                "expected InvalidDate for {input:?}"
            );
        }
    }

    #[test]
    fn normalize_truncates_subseconds() {
        let at = Utc::now().with_nanosecond(987_654_321).unwrap();
        let normalized = normalize(at);
        assert_eq!(normalized.nanosecond(), 0);
        assert_eq!(normalized.timestamp(), at.timestamp());
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            Utc::now(),
            Utc::now() + ChronoDuration::milliseconds(1),
            Utc::now() - ChronoDuration::nanoseconds(999_999_999),
            DateTime::<Utc>::default(),
        ];
        for at in samples {
            assert_eq!(normalize(normalize(at)), normalize(at));
        }
    }

    #[test]
    fn duration_compact_grammar() {
        let d = parse_duration("1h50m30s").unwrap().unwrap();
        assert_eq!(d, Duration::from_secs(3600 + 50 * 60 + 30));

        let d = parse_duration("10m").unwrap().unwrap();
        assert_eq!(d, Duration::from_secs(600));
    }

    #[test]
    fn duration_zero_and_negative() {
        assert!(matches!(parse_duration("0s"), Some(Err(CalendarError::ZeroDuration))));
        assert!(matches!(parse_duration("-5m"), Some(Err(CalendarError::ZeroDuration))));
    }

    #[test]
    fn non_durations_are_not_claimed() {
        assert!(parse_duration("2030-03-20 15:04:05").is_none());
        assert!(parse_duration("soon").is_none());
        assert!(parse_duration("-later").is_none());
    }

    #[test]
    fn duration_units_limited_to_hours_minutes_seconds() {
        for input in ["2days", "1y", "500ms", "1.5h", "10 m", "1h 30m", "-2days"] {
            assert!(parse_duration(input).is_none(), "{input:?} should not be a duration");
        }
        let d = parse_duration("90s").unwrap().unwrap();
        assert_eq!(d, Duration::from_secs(90));
    }
}

// dashtime - core/duration.rs
//
// Compact, human-readable description of a time range's length, as shown
// under the time picker tooltip ("2 days 3 hours", "45 seconds").
//
// Pure function: no I/O, no logging, no shared state.

use crate::util::constants::{
    DAYS_ONLY_THRESHOLD, MAX_DURATION_UNITS, MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE,
    MS_PER_SECOND,
};
use chrono::{DateTime, Utc};

/// Whole-unit decomposition of a span.
///
/// `hours`, `minutes` and `seconds` are remainders after the larger units
/// have been taken out, so `hours` is always in `0..24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationComponents {
    /// The full span in milliseconds (never negative).
    pub total_ms: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl DurationComponents {
    /// Decompose a millisecond span. Negative spans are clamped to zero.
    pub fn from_millis(ms: i64) -> Self {
        let total_ms = ms.max(0);
        Self {
            total_ms,
            days: total_ms / MS_PER_DAY,
            hours: (total_ms % MS_PER_DAY) / MS_PER_HOUR,
            minutes: (total_ms % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (total_ms % MS_PER_MINUTE) / MS_PER_SECOND,
        }
    }

    /// Decompose the span between two instants.
    pub fn between(from: &DateTime<Utc>, to: &DateTime<Utc>) -> Self {
        Self::from_millis((*to - *from).num_milliseconds())
    }
}

/// One unit group of the label. Receives the components and the number of
/// groups already emitted; returns the group text if it should be shown.
type UnitRule = fn(&DurationComponents, usize) -> Option<String>;

/// Evaluated in priority order until `MAX_DURATION_UNITS` groups exist.
const UNIT_RULES: [UnitRule; 4] = [days_group, hours_group, minutes_group, seconds_group];

fn days_group(c: &DurationComponents, _emitted: usize) -> Option<String> {
    match c.days {
        0 => None,
        1 => Some("1 day".to_string()),
        n => Some(format!("{n} days")),
    }
}

fn hours_group(c: &DurationComponents, _emitted: usize) -> Option<String> {
    (c.hours > 0).then(|| format!("{} hours", c.hours))
}

fn minutes_group(c: &DurationComponents, _emitted: usize) -> Option<String> {
    (c.minutes > 0).then(|| format!("{} minutes", c.minutes))
}

/// Seconds fill the second slot when one larger unit was shown. With no
/// larger unit at all, the whole span is expressed in seconds instead of the
/// remainder so sub-minute ranges still get an accurate label.
fn seconds_group(c: &DurationComponents, emitted: usize) -> Option<String> {
    if emitted == 0 {
        Some(format!("{} seconds", total_seconds_label(c.total_ms)))
    } else if c.seconds > 0 {
        Some(format!("{} seconds", c.seconds))
    } else {
        None
    }
}

/// Total seconds with the millisecond remainder as a trimmed decimal
/// (`1500` -> `"1.5"`, `45000` -> `"45"`).
fn total_seconds_label(total_ms: i64) -> String {
    let whole = total_ms / MS_PER_SECOND;
    let millis = total_ms % MS_PER_SECOND;
    if millis == 0 {
        return whole.to_string();
    }
    let fraction = format!("{millis:03}");
    format!("{whole}.{}", fraction.trim_end_matches('0'))
}

/// Describe already-decomposed components.
pub fn describe_components(components: &DurationComponents) -> String {
    if components.days > DAYS_ONLY_THRESHOLD {
        return format!("{} days", components.days);
    }

    let mut groups: Vec<String> = Vec::with_capacity(MAX_DURATION_UNITS);
    for rule in UNIT_RULES {
        if groups.len() >= MAX_DURATION_UNITS {
            break;
        }
        if let Some(group) = rule(components, groups.len()) {
            groups.push(group);
        }
    }
    groups.join(" ")
}

/// Describe a span given in milliseconds.
pub fn describe_millis(ms: i64) -> String {
    describe_components(&DurationComponents::from_millis(ms))
}

/// Describe the length of the range `from..to`.
///
/// At most two unit groups are shown; ranges over ten days show days only.
/// Inverted ranges (`to < from`) are clamped to zero and read "0 seconds".
pub fn describe_duration(from: &DateTime<Utc>, to: &DateTime<Utc>) -> String {
    describe_components(&DurationComponents::between(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone as _};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn describe_after(span: Duration) -> String {
        let from = start();
        describe_duration(&from, &(from + span))
    }

    #[test]
    fn test_more_than_ten_days_shows_days_only() {
        assert_eq!(describe_after(Duration::days(15)), "15 days");
        assert_eq!(
            describe_after(Duration::days(11) + Duration::hours(5)),
            "11 days"
        );
    }

    #[test]
    fn test_exactly_ten_days_keeps_second_unit() {
        assert_eq!(
            describe_after(Duration::days(10) + Duration::hours(5)),
            "10 days 5 hours"
        );
    }

    #[test]
    fn test_single_day_is_singular() {
        assert_eq!(describe_after(Duration::days(1)), "1 day");
    }

    #[test]
    fn test_days_and_hours() {
        assert_eq!(
            describe_after(Duration::days(2) + Duration::hours(3)),
            "2 days 3 hours"
        );
    }

    #[test]
    fn test_seconds_dropped_after_two_units() {
        let span = Duration::hours(2) + Duration::minutes(30) + Duration::seconds(10);
        assert_eq!(describe_after(span), "2 hours 30 minutes");
    }

    #[test]
    fn test_seconds_as_second_unit() {
        assert_eq!(
            describe_after(Duration::days(1) + Duration::seconds(30)),
            "1 day 30 seconds"
        );
        assert_eq!(
            describe_after(Duration::minutes(3) + Duration::seconds(7)),
            "3 minutes 7 seconds"
        );
    }

    #[test]
    fn test_unit_words_are_not_singularised_below_days() {
        assert_eq!(
            describe_after(Duration::hours(1) + Duration::seconds(5)),
            "1 hours 5 seconds"
        );
    }

    #[test]
    fn test_sub_minute_uses_total_seconds() {
        assert_eq!(describe_after(Duration::seconds(45)), "45 seconds");
        assert_eq!(describe_after(Duration::milliseconds(1_500)), "1.5 seconds");
        assert_eq!(describe_after(Duration::milliseconds(250)), "0.25 seconds");
    }

    #[test]
    fn test_zero_span() {
        assert_eq!(describe_after(Duration::zero()), "0 seconds");
    }

    #[test]
    fn test_inverted_range_clamps_to_zero() {
        let from = start();
        let to = from - Duration::hours(3);
        assert_eq!(describe_duration(&from, &to), "0 seconds");
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let span = Duration::days(3) + Duration::minutes(20);
        assert_eq!(describe_after(span), describe_after(span));
        assert_eq!(describe_after(span), "3 days 20 minutes");
    }

    #[test]
    fn test_components_are_remainders() {
        let c = DurationComponents::from_millis(
            2 * MS_PER_DAY + 5 * MS_PER_HOUR + 6 * MS_PER_MINUTE + 7 * MS_PER_SECOND + 8,
        );
        assert_eq!((c.days, c.hours, c.minutes, c.seconds), (2, 5, 6, 7));
    }
}

// dashtime - core/datemath.rs
//
// Relative time expressions: `now`, `now-6h`, `now/d`, `now-1d/d`,
// `2024-01-01||+1M/M`. Evaluated against an explicit `now` so callers and
// tests control the clock.
//
// Rounding (`/unit`) snaps to the start of the unit, or to its last
// millisecond when rounding up (used for the `to` end of a range), and is
// done in the display zone so "today" means the viewer's day.

use crate::core::model::{RangeEndpoint, RawTimeRange, TimeRange, TimeZone};
use crate::util::constants::MAX_DATE_MATH_LENGTH;
use crate::util::error::DateMathError;
use chrono::{
    DateTime, Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, TimeZone as _,
    Timelike, Utc,
};
use regex::Regex;
use std::sync::OnceLock;

/// Calendar units understood by date math.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    fn from_char(c: char) -> Option<Self> {
        match c {
            's' => Some(Self::Second),
            'm' => Some(Self::Minute),
            'h' => Some(Self::Hour),
            'd' => Some(Self::Day),
            'w' => Some(Self::Week),
            'M' => Some(Self::Month),
            'y' => Some(Self::Year),
            _ => None,
        }
    }
}

/// One parsed step after the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Add(i64, Unit),
    Round(Unit),
}

/// True when `text` is a date-math expression rather than a timestamp.
pub fn is_math_string(text: &str) -> bool {
    text.starts_with("now") || text.contains("||")
}

/// Parse an absolute timestamp: RFC 3339, `YYYY-MM-DD HH:MM:SS`,
/// `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD` (all UTC), or epoch milliseconds.
pub fn parse_absolute(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
        return text
            .parse::<i64>()
            .ok()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single());
    }
    None
}

fn operation_regex() -> &'static Regex {
    static OPERATION: OnceLock<Regex> = OnceLock::new();
    OPERATION.get_or_init(|| {
        Regex::new(r"^(?:([+-])(\d*)|/)(.)").expect("datemath: invalid operation regex")
    })
}

/// Split an expression into its anchor instant and operation list.
fn split(
    text: &str,
    now: DateTime<Utc>,
) -> Result<(DateTime<Utc>, Vec<Operation>), DateMathError> {
    let (anchor, rest) = if let Some(rest) = text.strip_prefix("now") {
        (now, rest)
    } else if let Some((anchor_text, rest)) = text.split_once("||") {
        let anchor = parse_absolute(anchor_text).ok_or_else(|| DateMathError::InvalidAnchor {
            expression: text.to_string(),
            anchor: anchor_text.to_string(),
        })?;
        (anchor, rest)
    } else {
        return Err(DateMathError::InvalidAnchor {
            expression: text.to_string(),
            anchor: text.to_string(),
        });
    };

    let offset = text.len() - rest.len();
    let mut operations = Vec::new();
    let mut pos = 0;
    while pos < rest.len() {
        let invalid = || DateMathError::InvalidOperation {
            expression: text.to_string(),
            position: offset + pos,
        };
        let caps = operation_regex().captures(&rest[pos..]).ok_or_else(invalid)?;
        let whole = caps.get(0).ok_or_else(invalid)?;
        let unit_char = caps
            .get(3)
            .and_then(|m| m.as_str().chars().next())
            .ok_or_else(invalid)?;
        let unit = Unit::from_char(unit_char).ok_or_else(|| DateMathError::UnknownUnit {
            expression: text.to_string(),
            unit: unit_char,
        })?;

        let operation = match caps.get(1) {
            Some(sign) => {
                let digits = caps.get(2).map_or("", |m| m.as_str());
                let amount: i64 = if digits.is_empty() {
                    1
                } else {
                    digits.parse().map_err(|_| invalid())?
                };
                let amount = if sign.as_str() == "-" { -amount } else { amount };
                Operation::Add(amount, unit)
            }
            None => Operation::Round(unit),
        };
        operations.push(operation);
        pos += whole.end();
    }

    Ok((anchor, operations))
}

/// Evaluate a date-math expression or absolute timestamp.
///
/// `round_up` selects end-of-unit rounding for `/unit` operations.
pub fn parse(
    text: &str,
    round_up: bool,
    now: DateTime<Utc>,
    tz: TimeZone,
) -> Result<DateTime<Utc>, DateMathError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DateMathError::Empty);
    }
    if text.len() > MAX_DATE_MATH_LENGTH {
        return Err(DateMathError::TooLong {
            length: text.len(),
            max_length: MAX_DATE_MATH_LENGTH,
        });
    }
    if !is_math_string(text) {
        return parse_absolute(text).ok_or_else(|| DateMathError::InvalidAnchor {
            expression: text.to_string(),
            anchor: text.to_string(),
        });
    }

    let (anchor, operations) = split(text, now)?;
    let out_of_range = || DateMathError::OutOfRange {
        expression: text.to_string(),
    };

    let mut local = to_zone(anchor, tz);
    for operation in operations {
        local = match operation {
            Operation::Add(amount, unit) => add_units(local, amount, unit),
            Operation::Round(unit) => {
                let start = start_of(local, unit);
                if round_up {
                    start
                        .and_then(|s| add_units(s, 1, unit))
                        .and_then(|next| next.checked_sub_signed(Duration::milliseconds(1)))
                } else {
                    start
                }
            }
        }
        .ok_or_else(out_of_range)?;
    }
    from_zone(local, tz).ok_or_else(out_of_range)
}

/// Turn user text into a range endpoint, checking expression syntax.
pub fn parse_endpoint(text: &str) -> Result<RangeEndpoint, DateMathError> {
    let text = text.trim();
    if is_math_string(text) {
        parse(text, false, Utc::now(), TimeZone::Utc)?;
        Ok(RangeEndpoint::Relative(text.to_string()))
    } else {
        parse(text, false, Utc::now(), TimeZone::Utc).map(RangeEndpoint::Absolute)
    }
}

/// Evaluate an endpoint against `now`.
pub fn evaluate(
    endpoint: &RangeEndpoint,
    round_up: bool,
    now: DateTime<Utc>,
    tz: TimeZone,
) -> Result<DateTime<Utc>, DateMathError> {
    match endpoint {
        RangeEndpoint::Absolute(instant) => Ok(*instant),
        RangeEndpoint::Relative(expr) => parse(expr, round_up, now, tz),
    }
}

/// Resolve both ends of a raw range. The `to` end rounds up.
pub fn resolve(
    raw: &RawTimeRange,
    now: DateTime<Utc>,
    tz: TimeZone,
) -> Result<TimeRange, DateMathError> {
    Ok(TimeRange {
        from: evaluate(&raw.from, false, now, tz)?,
        to: evaluate(&raw.to, true, now, tz)?,
        raw: raw.clone(),
    })
}

/// Parse an interval string such as `500ms`, `30s`, `5m`, `1h`, `1d`, `1w`.
pub fn parse_interval(interval: &str) -> Result<Duration, DateMathError> {
    static INTERVAL: OnceLock<Regex> = OnceLock::new();
    let re = INTERVAL.get_or_init(|| {
        Regex::new(r"^(\d+)(ms|s|m|h|d|w)$").expect("datemath: invalid interval regex")
    });

    let invalid = || DateMathError::InvalidInterval {
        interval: interval.to_string(),
    };
    let caps = re.captures(interval.trim()).ok_or_else(invalid)?;
    let amount: i64 = caps[1].parse().map_err(|_| invalid())?;
    let duration = match &caps[2] {
        "ms" => Duration::try_milliseconds(amount),
        "s" => Duration::try_seconds(amount),
        "m" => Duration::try_minutes(amount),
        "h" => Duration::try_hours(amount),
        "d" => Duration::try_days(amount),
        "w" => Duration::try_weeks(amount),
        _ => None,
    };
    duration.ok_or_else(invalid)
}

// -----------------------------------------------------------------------------
// Calendar arithmetic on wall-clock time in the display zone
// -----------------------------------------------------------------------------

fn to_zone(instant: DateTime<Utc>, tz: TimeZone) -> NaiveDateTime {
    match tz {
        TimeZone::Utc => instant.naive_utc(),
        TimeZone::Browser => instant.with_timezone(&Local).naive_local(),
    }
}

fn from_zone(naive: NaiveDateTime, tz: TimeZone) -> Option<DateTime<Utc>> {
    match tz {
        TimeZone::Utc => Some(naive.and_utc()),
        TimeZone::Browser => Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

fn add_units(t: NaiveDateTime, amount: i64, unit: Unit) -> Option<NaiveDateTime> {
    let fixed = match unit {
        Unit::Second => Duration::try_seconds(amount),
        Unit::Minute => Duration::try_minutes(amount),
        Unit::Hour => Duration::try_hours(amount),
        Unit::Day => Duration::try_days(amount),
        Unit::Week => Duration::try_weeks(amount),
        Unit::Month => return add_months(t, amount),
        Unit::Year => return add_months(t, amount.checked_mul(12)?),
    };
    t.checked_add_signed(fixed?)
}

fn add_months(t: NaiveDateTime, amount: i64) -> Option<NaiveDateTime> {
    let months = Months::new(u32::try_from(amount.unsigned_abs()).ok()?);
    if amount >= 0 {
        t.checked_add_months(months)
    } else {
        t.checked_sub_months(months)
    }
}

fn start_of(t: NaiveDateTime, unit: Unit) -> Option<NaiveDateTime> {
    let date = t.date();
    match unit {
        Unit::Second => date.and_hms_opt(t.hour(), t.minute(), t.second()),
        Unit::Minute => date.and_hms_opt(t.hour(), t.minute(), 0),
        Unit::Hour => date.and_hms_opt(t.hour(), 0, 0),
        Unit::Day => date.and_hms_opt(0, 0, 0),
        Unit::Week => {
            let back = i64::from(date.weekday().num_days_from_monday());
            date.checked_sub_signed(Duration::try_days(back)?)?
                .and_hms_opt(0, 0, 0)
        }
        Unit::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?.and_hms_opt(0, 0, 0),
        Unit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1)?.and_hms_opt(0, 0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    fn now() -> DateTime<Utc> {
        // Wednesday
        Utc.with_ymd_and_hms(2024, 5, 15, 13, 45, 30).unwrap()
    }

    fn eval(text: &str, round_up: bool) -> DateTime<Utc> {
        parse(text, round_up, now(), TimeZone::Utc).unwrap()
    }

    #[test]
    fn test_is_math_string() {
        assert!(is_math_string("now"));
        assert!(is_math_string("now-6h"));
        assert!(is_math_string("2024-01-01||+1d"));
        assert!(!is_math_string("2024-01-01 00:00:00"));
    }

    #[test]
    fn test_now_and_offsets() {
        assert_eq!(eval("now", false), now());
        assert_eq!(eval("now-6h", false), now() - Duration::hours(6));
        assert_eq!(eval("now+30m", false), now() + Duration::minutes(30));
        assert_eq!(eval("now-d", false), now() - Duration::days(1));
    }

    #[test]
    fn test_round_down_and_up() {
        assert_eq!(
            eval("now/d", false),
            Utc.with_ymd_and_hms(2024, 5, 15, 0, 0, 0).unwrap()
        );
        assert_eq!(
            eval("now/d", true),
            Utc.with_ymd_and_hms(2024, 5, 16, 0, 0, 0).unwrap() - Duration::milliseconds(1)
        );
        assert_eq!(
            eval("now-1d/d", false),
            Utc.with_ymd_and_hms(2024, 5, 14, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_week_starts_monday() {
        assert_eq!(
            eval("now/w", false),
            Utc.with_ymd_and_hms(2024, 5, 13, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_month_and_year_arithmetic() {
        assert_eq!(
            eval("now-1M/M", false),
            Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            eval("now/y", false),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            eval("now-2y", false),
            Utc.with_ymd_and_hms(2022, 5, 15, 13, 45, 30).unwrap()
        );
    }

    #[test]
    fn test_absolute_anchor() {
        assert_eq!(
            eval("2024-01-31||+1M", false),
            Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_absolute_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(parse_absolute("2024-01-02 03:04:05"), Some(expected));
        assert_eq!(parse_absolute("2024-01-02T03:04:05Z"), Some(expected));
        assert_eq!(parse_absolute("1704164645000"), Some(expected));
        assert_eq!(parse_absolute("yesterday"), None);
    }

    #[test]
    fn test_invalid_expressions() {
        assert_eq!(
            parse("", false, now(), TimeZone::Utc),
            Err(DateMathError::Empty)
        );
        assert!(matches!(
            parse("now-6x", false, now(), TimeZone::Utc),
            Err(DateMathError::UnknownUnit { unit: 'x', .. })
        ));
        assert!(matches!(
            parse("now*2h", false, now(), TimeZone::Utc),
            Err(DateMathError::InvalidOperation { position: 3, .. })
        ));
        assert!(matches!(
            parse("garbage||+1d", false, now(), TimeZone::Utc),
            Err(DateMathError::InvalidAnchor { .. })
        ));
    }

    #[test]
    fn test_resolve_rounds_to_end_up() {
        let raw = RawTimeRange::relative("now/d", "now/d");
        let range = resolve(&raw, now(), TimeZone::Utc).unwrap();
        assert_eq!(range.span_ms(), 86_400_000 - 1);
    }

    #[test]
    fn test_parse_interval() {
        assert_eq!(parse_interval("30s").unwrap(), Duration::seconds(30));
        assert_eq!(parse_interval("5m").unwrap(), Duration::minutes(5));
        assert_eq!(parse_interval("1d").unwrap(), Duration::days(1));
        assert!(parse_interval("5x").is_err());
        assert!(parse_interval("").is_err());
    }

    #[test]
    fn test_parse_endpoint() {
        assert_eq!(
            parse_endpoint("now-1h").unwrap(),
            RangeEndpoint::relative("now-1h")
        );
        assert!(matches!(
            parse_endpoint("2024-01-02").unwrap(),
            RangeEndpoint::Absolute(_)
        ));
        assert!(parse_endpoint("now-1q").is_err());
    }
}

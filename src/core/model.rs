// dashtime - core/model.rs
//
// Core data model types for the time controls. Pure data definitions with
// no I/O and no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::constants::DATE_TIME_FORMAT;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Time zone
// =============================================================================

/// Zone used to display absolute timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeZone {
    /// The local clock of the viewing machine.
    #[default]
    Browser,
    Utc,
}

impl TimeZone {
    /// Parse a zone name ("browser" or "utc", case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "browser" | "local" => Some(Self::Browser),
            "utc" => Some(Self::Utc),
            _ => None,
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            TimeZone::Browser => "Local browser time",
            TimeZone::Utc => "UTC",
        }
    }

    /// Format an instant as `YYYY-MM-DD HH:MM:SS` in this zone.
    pub fn format(&self, instant: &DateTime<Utc>) -> String {
        match self {
            TimeZone::Utc => instant.format(DATE_TIME_FORMAT).to_string(),
            TimeZone::Browser => instant
                .with_timezone(&Local)
                .format(DATE_TIME_FORMAT)
                .to_string(),
        }
    }

    /// Short zone abbreviation for an instant: "UTC", or the local offset.
    pub fn abbreviation(&self, instant: &DateTime<Utc>) -> String {
        match self {
            TimeZone::Utc => "UTC".to_string(),
            TimeZone::Browser => instant.with_timezone(&Local).format("%:z").to_string(),
        }
    }
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeZone::Browser => "browser",
            TimeZone::Utc => "utc",
        })
    }
}

// =============================================================================
// Raw (user-facing) range
// =============================================================================

/// One end of a range as the user picked it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeEndpoint {
    /// A fixed instant.
    Absolute(DateTime<Utc>),

    /// A date-math expression such as `now-6h` or `now/d`, re-evaluated
    /// against the current time whenever the range is resolved.
    Relative(String),
}

impl RangeEndpoint {
    pub fn relative(expression: impl Into<String>) -> Self {
        Self::Relative(expression.into())
    }

    pub fn is_relative(&self) -> bool {
        matches!(self, Self::Relative(_))
    }

    /// True for the literal `now` expression.
    pub fn is_now(&self) -> bool {
        matches!(self, Self::Relative(expr) if expr == "now")
    }

    /// Display text in the given zone: the expression itself for relative
    /// endpoints, a formatted timestamp for absolute ones.
    pub fn display(&self, tz: TimeZone) -> String {
        match self {
            Self::Absolute(instant) => tz.format(instant),
            Self::Relative(expr) => expr.clone(),
        }
    }
}

impl fmt::Display for RangeEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute(instant) => write!(f, "{}", instant.format(DATE_TIME_FORMAT)),
            Self::Relative(expr) => f.write_str(expr),
        }
    }
}

/// A range as picked by the user, before evaluation against a clock.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawTimeRange {
    pub from: RangeEndpoint,
    pub to: RangeEndpoint,
}

impl RawTimeRange {
    pub fn new(from: RangeEndpoint, to: RangeEndpoint) -> Self {
        Self { from, to }
    }

    /// Convenience constructor for two date-math expressions.
    pub fn relative(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: RangeEndpoint::relative(from),
            to: RangeEndpoint::relative(to),
        }
    }

    pub fn absolute(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from: RangeEndpoint::Absolute(from),
            to: RangeEndpoint::Absolute(to),
        }
    }

    /// Key used to look up quick-range options, e.g. `"now-6h to now"`.
    pub fn key(&self) -> String {
        format!("{} to {}", self.from, self.to)
    }
}

impl fmt::Display for RawTimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.from, self.to)
    }
}

// =============================================================================
// Resolved range
// =============================================================================

/// A range with both ends evaluated to instants, plus the raw form it came
/// from.
///
/// `to >= from` is expected but not enforced; callers that build ranges from
/// user input should resolve through `datemath::resolve`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub raw: RawTimeRange,
}

impl TimeRange {
    /// An absolute range whose raw form is the same two instants.
    pub fn absolute(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from,
            to,
            raw: RawTimeRange::absolute(from, to),
        }
    }

    /// Span in milliseconds (negative for inverted ranges).
    pub fn span_ms(&self) -> i64 {
        (self.to - self.from).num_milliseconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    #[test]
    fn test_timezone_parse() {
        assert_eq!(TimeZone::parse("UTC"), Some(TimeZone::Utc));
        assert_eq!(TimeZone::parse(" browser "), Some(TimeZone::Browser));
        assert_eq!(TimeZone::parse("mars"), None);
    }

    #[test]
    fn test_utc_format_and_abbreviation() {
        let t = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(TimeZone::Utc.format(&t), "2024-01-02 03:04:05");
        assert_eq!(TimeZone::Utc.abbreviation(&t), "UTC");
    }

    #[test]
    fn test_raw_range_key() {
        let raw = RawTimeRange::relative("now-6h", "now");
        assert_eq!(raw.key(), "now-6h to now");
        assert!(raw.to.is_now());
        assert!(!raw.from.is_now());
    }

    #[test]
    fn test_absolute_endpoint_display() {
        let t = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let endpoint = RangeEndpoint::Absolute(t);
        assert_eq!(endpoint.display(TimeZone::Utc), "2024-01-02 03:04:05");
        assert!(!endpoint.is_relative());
    }

    #[test]
    fn test_span_ms() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap();
        assert_eq!(TimeRange::absolute(from, to).span_ms(), 3_600_000);
    }
}

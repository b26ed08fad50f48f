// dashtime - core/describe.rs
//
// Text shown on and around the time picker button: the range label
// ("Last 6 hours", "2024-01-01 00:00:00 to now"), the zone abbreviation,
// and the hover tooltip with the range length.

use crate::core::duration::describe_duration;
use crate::core::model::{RangeEndpoint, RawTimeRange, TimeRange, TimeZone};
use std::fmt;

/// A named preset range offered by the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOption {
    pub from: &'static str,
    pub to: &'static str,
    pub display: &'static str,
}

const fn option(from: &'static str, to: &'static str, display: &'static str) -> TimeOption {
    TimeOption { from, to, display }
}

/// "Last N" presets ending at `now`.
pub const QUICK_OPTIONS: &[TimeOption] = &[
    option("now-5m", "now", "Last 5 minutes"),
    option("now-15m", "now", "Last 15 minutes"),
    option("now-30m", "now", "Last 30 minutes"),
    option("now-1h", "now", "Last 1 hour"),
    option("now-3h", "now", "Last 3 hours"),
    option("now-6h", "now", "Last 6 hours"),
    option("now-12h", "now", "Last 12 hours"),
    option("now-24h", "now", "Last 24 hours"),
    option("now-2d", "now", "Last 2 days"),
    option("now-7d", "now", "Last 7 days"),
    option("now-30d", "now", "Last 30 days"),
    option("now-90d", "now", "Last 90 days"),
    option("now-6M", "now", "Last 6 months"),
    option("now-1y", "now", "Last 1 year"),
    option("now-2y", "now", "Last 2 years"),
    option("now-5y", "now", "Last 5 years"),
];

/// Calendar-aligned presets.
pub const OTHER_OPTIONS: &[TimeOption] = &[
    option("now-1d/d", "now-1d/d", "Yesterday"),
    option("now-2d/d", "now-2d/d", "Day before yesterday"),
    option("now-7d/d", "now-7d/d", "This day last week"),
    option("now-1w/w", "now-1w/w", "Previous week"),
    option("now-1M/M", "now-1M/M", "Previous month"),
    option("now-1y/y", "now-1y/y", "Previous year"),
    option("now/d", "now/d", "Today"),
    option("now/d", "now", "Today so far"),
    option("now/w", "now/w", "This week"),
    option("now/w", "now", "This week so far"),
    option("now/M", "now/M", "This month"),
    option("now/M", "now", "This month so far"),
    option("now/y", "now/y", "This year"),
    option("now/y", "now", "This year so far"),
];

impl TimeOption {
    pub fn raw(&self) -> RawTimeRange {
        RawTimeRange::relative(self.from, self.to)
    }
}

/// Find the preset matching a raw range, if any.
pub fn find_option(raw: &RawTimeRange) -> Option<&'static TimeOption> {
    let (RangeEndpoint::Relative(from), RangeEndpoint::Relative(to)) = (&raw.from, &raw.to) else {
        return None;
    };
    QUICK_OPTIONS
        .iter()
        .chain(OTHER_OPTIONS)
        .find(|o| o.from == from.as_str() && o.to == to.as_str())
}

/// Label for the picker button.
pub fn describe_range(raw: &RawTimeRange, tz: TimeZone) -> String {
    if let Some(option) = find_option(raw) {
        return option.display.to_string();
    }
    format!("{} to {}", raw.from.display(tz), raw.to.display(tz))
}

/// Zone abbreviation shown next to the label. Only absolute ranges carry
/// one; relative ranges return an empty string.
pub fn describe_abbreviation(range: &TimeRange, tz: TimeZone) -> String {
    match range.raw.from {
        RangeEndpoint::Absolute(_) => tz.abbreviation(&range.from),
        RangeEndpoint::Relative(_) => String::new(),
    }
}

/// Button label plus optional zone abbreviation. `hidden` suppresses the
/// text entirely (icon-only button).
pub fn button_label(range: &TimeRange, tz: TimeZone, hidden: bool) -> Option<(String, String)> {
    if hidden {
        return None;
    }
    Some((
        describe_range(&range.raw, tz),
        describe_abbreviation(range, tz),
    ))
}

/// Contents of the picker's hover tooltip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub from: String,
    pub to: String,
    pub zone: String,
    pub length: String,
}

impl Tooltip {
    pub fn build(range: &TimeRange, tz: TimeZone) -> Self {
        Self {
            from: tz.format(&range.from),
            to: tz.format(&range.to),
            zone: tz.label().to_string(),
            length: describe_duration(&range.from, &range.to),
        }
    }
}

impl fmt::Display for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.from)?;
        writeln!(f, "to")?;
        writeln!(f, "{}", self.to)?;
        writeln!(f, "{}", self.zone)?;
        write!(f, "{}", self.length)
    }
}

/// Tooltip text for the zoom-out button.
pub const ZOOM_OUT_TOOLTIP: &str = "Time range zoom out\nCTRL+Z";

/// Tooltip text for the default-time button.
pub const DEFAULT_TIME_TOOLTIP: &str = "Return to this dashboard's default time range";

// dashtime - core/navigation.rs
//
// Range navigation behind the dashboard time controls: step backward and
// forward by half a span, zoom out around the centre, the now-delay
// adjustment, and the auto-refresh policy.
//
// Core layer: pure logic on explicit instants, no clock reads.

use crate::core::datemath::parse_interval;
use crate::core::model::{RangeEndpoint, RawTimeRange, TimeRange};
use crate::util::constants::MAX_AUTO_REFRESH_SPAN_MS;
use chrono::{DateTime, Duration, Utc};

/// Direction of a time shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDirection {
    Backward,
    Forward,
}

/// Move a range by half its span.
///
/// Moving forward from a range that ended in the past never overshoots
/// `now`: the end is pinned to `now` and the start is kept. Returns `None`
/// if the result would overflow the representable date range.
pub fn shift(
    range: &TimeRange,
    direction: ShiftDirection,
    now: DateTime<Utc>,
) -> Option<TimeRange> {
    let half = Duration::milliseconds(range.span_ms() / 2);
    match direction {
        ShiftDirection::Backward => Some(TimeRange::absolute(
            range.from.checked_sub_signed(half)?,
            range.to.checked_sub_signed(half)?,
        )),
        ShiftDirection::Forward => {
            let from = range.from.checked_add_signed(half)?;
            let to = range.to.checked_add_signed(half)?;
            if to > now && range.to < now {
                Some(TimeRange::absolute(range.from, now))
            } else {
                Some(TimeRange::absolute(from, to))
            }
        }
    }
}

/// Widen a range around its centre by `factor` (2.0 doubles the span).
///
/// Returns `None` for a non-finite or non-positive factor, or when the
/// result would overflow.
pub fn zoom_out(range: &TimeRange, factor: f64) -> Option<TimeRange> {
    if !factor.is_finite() || factor <= 0.0 {
        return None;
    }
    let span = range.span_ms() as f64;
    let center = range.to.timestamp_millis() as f64 - span / 2.0;
    let half = span * factor / 2.0;
    let from = (center - half).round();
    let to = (center + half).round();
    if !(i64::MIN as f64..=i64::MAX as f64).contains(&from)
        || !(i64::MIN as f64..=i64::MAX as f64).contains(&to)
    {
        return None;
    }
    Some(TimeRange::absolute(
        DateTime::from_timestamp_millis(from as i64)?,
        DateTime::from_timestamp_millis(to as i64)?,
    ))
}

/// Apply the dashboard's now-delay: a range ending exactly at `now` ends at
/// `now-<delay>` instead. Other ranges are returned unchanged.
pub fn apply_now_delay(raw: &RawTimeRange, now_delay: Option<&str>) -> RawTimeRange {
    match now_delay {
        Some(delay) if !delay.is_empty() && raw.to.is_now() => RawTimeRange {
            from: raw.from.clone(),
            to: RangeEndpoint::Relative(format!("now-{delay}")),
        },
        _ => raw.clone(),
    }
}

/// Why auto-refresh was switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshBlock {
    /// The range spans more than a day; refreshing would overload the
    /// data source.
    SpanTooLong,
    /// The user locked the time controls.
    TimeLocked,
}

/// Effective auto-refresh setting after applying the guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshPolicy {
    /// Interval to use, `None` when refresh is off.
    pub interval: Option<String>,
    /// Set when a guard forced refresh off.
    pub blocked: Option<RefreshBlock>,
}

impl RefreshPolicy {
    pub fn evaluate(range: &TimeRange, requested: Option<&str>, locked: bool) -> Self {
        let blocked = if locked {
            Some(RefreshBlock::TimeLocked)
        } else if range.span_ms() > MAX_AUTO_REFRESH_SPAN_MS {
            Some(RefreshBlock::SpanTooLong)
        } else {
            None
        };

        let interval = match blocked {
            Some(_) => None,
            None => requested.filter(|r| !r.is_empty()).map(str::to_string),
        };

        Self { interval, blocked }
    }

    /// Label shown on the refresh picker.
    pub fn label(&self) -> &str {
        self.interval.as_deref().unwrap_or("Off")
    }

    pub fn is_off(&self) -> bool {
        self.interval.is_none()
    }
}

/// Keep the refresh intervals that parse and are at least `min_ms` long.
pub fn valid_intervals<S: AsRef<str>>(intervals: &[S], min_ms: i64) -> Vec<String> {
    intervals
        .iter()
        .map(|interval| interval.as_ref())
        .filter(|interval| {
            parse_interval(interval)
                .map(|d| d.num_milliseconds() >= min_ms)
                .unwrap_or(false)
        })
        .map(str::to_string)
        .collect()
}

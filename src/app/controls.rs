// dashtime - app/controls.rs
//
// Dashboard time controls: the current range and zone, auto-refresh, the
// lock flag, and the picker with its history.
//
// All operations take `now` explicitly so callers (and tests) control the
// clock. Relative ranges stay relative until the user navigates; shifting
// or zooming always produces an absolute range.

use crate::app::history::PickerHistory;
use crate::app::picker::TimeRangePicker;
use crate::core::datemath::resolve;
use crate::core::describe::{button_label, Tooltip};
use crate::core::model::{RawTimeRange, TimeRange, TimeZone};
use crate::core::navigation::{self, apply_now_delay, RefreshPolicy, ShiftDirection};
use crate::platform::config::AppConfig;
use crate::util::constants::DEFAULT_ZOOM_FACTOR;
use crate::util::error::{DateMathError, Result};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct TimeControls {
    raw: RawTimeRange,
    timezone: TimeZone,
    refresh: Option<String>,
    refresh_intervals: Vec<String>,
    now_delay: Option<String>,
    default_range: RawTimeRange,
    pub picker: TimeRangePicker,
    pub history: PickerHistory,
}

impl TimeControls {
    /// Start at the configured default range.
    pub fn new(config: &AppConfig, history: PickerHistory) -> Self {
        Self {
            raw: apply_now_delay(&config.default_range, config.now_delay.as_deref()),
            timezone: config.timezone,
            refresh: config.refresh.clone(),
            refresh_intervals: config.refresh_intervals.clone(),
            now_delay: config.now_delay.clone(),
            default_range: config.default_range.clone(),
            picker: TimeRangePicker::new(config.locked),
            history,
        }
    }

    pub fn raw(&self) -> &RawTimeRange {
        &self.raw
    }

    pub fn timezone(&self) -> TimeZone {
        self.timezone
    }

    pub fn is_locked(&self) -> bool {
        self.picker.is_locked()
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.picker.set_locked(locked);
        tracing::debug!(locked, "Time controls lock changed");
    }

    /// Evaluate the current range against `now`.
    pub fn current(&self, now: DateTime<Utc>) -> Result<TimeRange> {
        Ok(resolve(&self.raw, now, self.timezone)?)
    }

    /// Apply a range picked by the user. The now-delay is applied, the
    /// range is recorded in the history and the picker closes.
    pub fn change_range(&mut self, raw: RawTimeRange) {
        let raw = self.picker.select(raw);
        self.history.push(raw.clone());
        self.raw = apply_now_delay(&raw, self.now_delay.as_deref());
        tracing::debug!(range = %self.raw, "Time range changed");
    }

    pub fn move_backward(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.shift(ShiftDirection::Backward, now)
    }

    pub fn move_forward(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.shift(ShiftDirection::Forward, now)
    }

    fn shift(&mut self, direction: ShiftDirection, now: DateTime<Utc>) -> Result<()> {
        let current = self.current(now)?;
        let shifted = navigation::shift(&current, direction, now)
            .ok_or_else(|| out_of_range(&self.raw))?;
        self.raw = shifted.raw;
        tracing::debug!(?direction, range = %self.raw, "Time range shifted");
        Ok(())
    }

    /// Widen the range around its centre; `None` uses the default factor.
    pub fn zoom_out(&mut self, now: DateTime<Utc>, factor: Option<f64>) -> Result<()> {
        let current = self.current(now)?;
        let zoomed = navigation::zoom_out(&current, factor.unwrap_or(DEFAULT_ZOOM_FACTOR))
            .ok_or_else(|| out_of_range(&self.raw))?;
        self.raw = zoomed.raw;
        tracing::debug!(range = %self.raw, "Time range zoomed out");
        Ok(())
    }

    pub fn reset_to_default(&mut self) {
        self.raw = apply_now_delay(&self.default_range, self.now_delay.as_deref());
        self.picker.close();
        tracing::debug!(range = %self.raw, "Time range reset to default");
    }

    pub fn change_timezone(&mut self, timezone: TimeZone) {
        self.timezone = timezone;
        tracing::debug!(%timezone, "Time zone changed");
    }

    /// Request an auto-refresh interval; `None` or an unknown interval
    /// switches refresh off.
    pub fn set_refresh(&mut self, interval: Option<&str>) {
        self.refresh = interval
            .filter(|i| self.refresh_intervals.iter().any(|known| known == i))
            .map(str::to_string);
        tracing::debug!(refresh = ?self.refresh, "Auto-refresh changed");
    }

    pub fn refresh_intervals(&self) -> &[String] {
        &self.refresh_intervals
    }

    /// Effective auto-refresh for the current range. A blocked refresh is
    /// switched off for good rather than resuming when the guard lifts.
    pub fn refresh_state(&mut self, now: DateTime<Utc>) -> Result<RefreshPolicy> {
        let current = self.current(now)?;
        let policy = RefreshPolicy::evaluate(&current, self.refresh.as_deref(), self.is_locked());
        if let Some(reason) = policy.blocked {
            if self.refresh.take().is_some() {
                tracing::debug!(?reason, "Auto-refresh switched off");
            }
        }
        Ok(policy)
    }

    pub fn tooltip(&self, now: DateTime<Utc>) -> Result<Tooltip> {
        Ok(Tooltip::build(&self.current(now)?, self.timezone))
    }

    /// Picker button text and zone abbreviation.
    pub fn label(&self, now: DateTime<Utc>, hidden: bool) -> Result<Option<(String, String)>> {
        Ok(button_label(&self.current(now)?, self.timezone, hidden))
    }
}

fn out_of_range(raw: &RawTimeRange) -> DateMathError {
    DateMathError::OutOfRange {
        expression: raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::RangeEndpoint;
    use crate::core::navigation::RefreshBlock;
    use chrono::TimeZone as _;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn controls() -> TimeControls {
        let config = AppConfig {
            timezone: TimeZone::Utc,
            ..AppConfig::default()
        };
        TimeControls::new(&config, PickerHistory::new(4))
    }

    #[test]
    fn test_starts_at_default_range() {
        let c = controls();
        let range = c.current(now()).unwrap();
        assert_eq!(range.span_ms(), 6 * 3_600_000);
        let (label, abbr) = c.label(now(), false).unwrap().unwrap();
        assert_eq!(label, "Last 6 hours");
        assert_eq!(abbr, "");
    }

    #[test]
    fn test_change_range_records_history_and_closes_picker() {
        let mut c = controls();
        c.picker.toggle();
        c.change_range(RawTimeRange::relative("now-1h", "now"));
        c.change_range(RawTimeRange::relative("now-24h", "now"));
        assert!(!c.picker.is_open());
        assert_eq!(c.history.ranges()[0], RawTimeRange::relative("now-24h", "now"));
        assert_eq!(c.history.ranges().len(), 2);
    }

    #[test]
    fn test_change_range_applies_now_delay() {
        let config = AppConfig {
            now_delay: Some("5m".to_string()),
            ..AppConfig::default()
        };
        let mut c = TimeControls::new(&config, PickerHistory::new(4));
        assert_eq!(c.raw().to, RangeEndpoint::relative("now-5m"));
        c.change_range(RawTimeRange::relative("now-1h", "now"));
        assert_eq!(c.raw().to, RangeEndpoint::relative("now-5m"));
        assert_eq!(c.history.ranges()[0].to, RangeEndpoint::relative("now"));
    }

    #[test]
    fn test_move_backward_then_forward() {
        let mut c = controls();
        c.change_range(RawTimeRange::relative("now-2h", "now"));
        c.move_backward(now()).unwrap();
        let back = c.current(now()).unwrap();
        assert_eq!(back.from, now() - chrono::Duration::hours(3));
        assert!(!back.raw.from.is_relative());

        c.move_forward(now()).unwrap();
        let forward = c.current(now()).unwrap();
        assert_eq!(forward.from, now() - chrono::Duration::hours(2));
        assert_eq!(forward.to, now());
    }

    #[test]
    fn test_zoom_out_doubles_span() {
        let mut c = controls();
        let from = Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 6, 15, 11, 0, 0).unwrap();
        c.change_range(RawTimeRange::absolute(from, to));
        c.zoom_out(now(), None).unwrap();
        let range = c.current(now()).unwrap();
        assert_eq!(range.from, Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap());
        assert_eq!(range.to, Utc.with_ymd_and_hms(2024, 6, 15, 11, 30, 0).unwrap());
    }

    #[test]
    fn test_reset_to_default() {
        let mut c = controls();
        c.change_range(RawTimeRange::relative("now-7d", "now"));
        c.reset_to_default();
        assert_eq!(c.raw(), &RawTimeRange::relative("now-6h", "now"));
    }

    #[test]
    fn test_refresh_blocked_for_long_range() {
        let mut c = controls();
        c.set_refresh(Some("1m"));
        assert_eq!(c.refresh_state(now()).unwrap().label(), "1m");

        c.change_range(RawTimeRange::relative("now-7d", "now"));
        let policy = c.refresh_state(now()).unwrap();
        assert_eq!(policy.blocked, Some(RefreshBlock::SpanTooLong));
        assert!(policy.is_off());

        c.change_range(RawTimeRange::relative("now-1h", "now"));
        assert!(c.refresh_state(now()).unwrap().is_off());
    }

    #[test]
    fn test_refresh_blocked_when_locked() {
        let mut c = controls();
        c.set_refresh(Some("30s"));
        c.set_locked(true);
        let policy = c.refresh_state(now()).unwrap();
        assert_eq!(policy.blocked, Some(RefreshBlock::TimeLocked));
    }

    #[test]
    fn test_unknown_refresh_interval_is_off() {
        let mut c = controls();
        c.set_refresh(Some("7s"));
        assert!(c.refresh_state(now()).unwrap().is_off());
    }

    #[test]
    fn test_tooltip_follows_timezone() {
        let mut c = controls();
        let from = Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 6, 15, 11, 30, 0).unwrap();
        c.change_range(RawTimeRange::absolute(from, to));
        let tip = c.tooltip(now()).unwrap();
        assert_eq!(tip.zone, "UTC");
        assert_eq!(tip.length, "1 hours 30 minutes");
        c.change_timezone(TimeZone::Browser);
        assert_eq!(c.tooltip(now()).unwrap().zone, "Local browser time");
    }
}

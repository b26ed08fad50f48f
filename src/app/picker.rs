// dashtime - app/picker.rs
//
// Open/closed state of the time range picker dropdown.

use crate::core::model::RawTimeRange;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeRangePicker {
    is_open: bool,
    is_locked: bool,
}

impl TimeRangePicker {
    pub fn new(is_locked: bool) -> Self {
        Self {
            is_open: false,
            is_locked,
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    /// Locking also closes an open picker.
    pub fn set_locked(&mut self, locked: bool) {
        self.is_locked = locked;
        if locked {
            self.is_open = false;
        }
    }

    /// Open or close the dropdown. Ignored while locked.
    pub fn toggle(&mut self) {
        if self.is_locked {
            tracing::debug!("Picker toggle ignored: time controls locked");
            return;
        }
        self.is_open = !self.is_open;
    }

    /// Close the dropdown and hand the chosen range back to the caller.
    pub fn select(&mut self, range: RawTimeRange) -> RawTimeRange {
        self.is_open = false;
        range
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_select() {
        let mut picker = TimeRangePicker::new(false);
        picker.toggle();
        assert!(picker.is_open());
        let range = picker.select(RawTimeRange::relative("now-1h", "now"));
        assert!(!picker.is_open());
        assert_eq!(range, RawTimeRange::relative("now-1h", "now"));
    }

    #[test]
    fn test_locked_picker_stays_closed() {
        let mut picker = TimeRangePicker::new(false);
        picker.toggle();
        picker.set_locked(true);
        assert!(!picker.is_open());
        picker.toggle();
        assert!(!picker.is_open());
    }
}

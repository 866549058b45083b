//! Timeline window policy.
//!
//! A window is the backward/forward day range, anchored at "today", that
//! bounds which task occurrences get materialized and fetched. Overrides
//! arrive as raw strings (query parameters, CLI flags); anything that does
//! not parse falls back to the default rather than erroring.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Days materialized/fetched in each direction when nothing overrides it.
pub const DEFAULT_WINDOW_DAYS: u32 = 200;

/// Upper bound applied to caller-supplied windows so a single request
/// cannot force an unbounded date-range query.
pub const MAX_WINDOW_DAYS: u32 = 1825;

/// The backward/forward day range of interest, anchored at "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineWindow {
    pub days_back: u32,
    pub days_forward: u32,
}

impl Default for TimelineWindow {
    fn default() -> Self {
        Self {
            days_back: DEFAULT_WINDOW_DAYS,
            days_forward: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl TimelineWindow {
    /// Builds a window, clamping both directions to [`MAX_WINDOW_DAYS`].
    pub fn new(days_back: u32, days_forward: u32) -> Self {
        Self {
            days_back: days_back.min(MAX_WINDOW_DAYS),
            days_forward: days_forward.min(MAX_WINDOW_DAYS),
        }
    }

    /// Resolves a window from raw optional overrides against the built-in
    /// default. A present, parseable value wins; absent, empty, or
    /// malformed values fall back silently.
    pub fn resolve(back: Option<&str>, forward: Option<&str>) -> Self {
        Self::resolve_with(Self::default(), back, forward)
    }

    /// Same as [`resolve`](Self::resolve) with caller-supplied defaults
    /// (the configuration layer feeds these).
    pub fn resolve_with(defaults: Self, back: Option<&str>, forward: Option<&str>) -> Self {
        Self::new(
            resolve_days(back, defaults.days_back),
            resolve_days(forward, defaults.days_forward),
        )
    }

    /// The inclusive date range `[today - days_back, today + days_forward]`
    /// consumed by the storage layer.
    pub fn range_from(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = today
            .checked_sub_days(Days::new(u64::from(self.days_back)))
            .unwrap_or(NaiveDate::MIN);
        let end = today
            .checked_add_days(Days::new(u64::from(self.days_forward)))
            .unwrap_or(NaiveDate::MAX);
        (start, end)
    }
}

fn resolve_days(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .unwrap_or(default)
        .min(MAX_WINDOW_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_symmetric() {
        let window = TimelineWindow::default();
        assert_eq!(window.days_back, DEFAULT_WINDOW_DAYS);
        assert_eq!(window.days_forward, DEFAULT_WINDOW_DAYS);
    }

    #[test]
    fn partial_override_keeps_default_for_the_rest() {
        let window = TimelineWindow::resolve(Some("30"), Some(""));
        assert_eq!(window.days_back, 30);
        assert_eq!(window.days_forward, DEFAULT_WINDOW_DAYS);
    }

    #[test]
    fn absent_overrides_use_defaults() {
        assert_eq!(TimelineWindow::resolve(None, None), TimelineWindow::default());
    }

    #[test]
    fn malformed_overrides_fall_back() {
        let window = TimelineWindow::resolve(Some("soon"), Some("-14"));
        assert_eq!(window, TimelineWindow::default());
    }

    #[test]
    fn whitespace_is_tolerated() {
        let window = TimelineWindow::resolve(Some(" 7 "), None);
        assert_eq!(window.days_back, 7);
    }

    #[test]
    fn oversized_overrides_are_clamped() {
        let window = TimelineWindow::resolve(Some("999999"), Some("2000"));
        assert_eq!(window.days_back, MAX_WINDOW_DAYS);
        assert_eq!(window.days_forward, MAX_WINDOW_DAYS);
    }

    #[test]
    fn resolve_with_honors_configured_defaults() {
        let configured = TimelineWindow::new(14, 60);
        let window = TimelineWindow::resolve_with(configured, None, Some("10"));
        assert_eq!(window.days_back, 14);
        assert_eq!(window.days_forward, 10);
    }

    #[test]
    fn range_is_inclusive_on_both_sides() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let (start, end) = TimelineWindow::new(10, 20).range_from(today);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 6, 5).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 7, 5).unwrap());
    }

    #[test]
    fn zero_window_collapses_to_today() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let (start, end) = TimelineWindow::new(0, 0).range_from(today);
        assert_eq!((start, end), (today, today));
    }
}

//! Query windows for provider fetches.
//!
//! Events are fetched one calendar year at a time. The year window is expressed
//! in UTC and includes the final second of the year:
//! `[YYYY-01-01T00:00:00Z, YYYY-12-31T23:59:59Z]`.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A closed interval `[start, end]` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the window (inclusive).
    pub start: DateTime<Utc>,
    /// End of the window (inclusive).
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new time window, or `None` if `start` is after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Creates the window covering the whole of `year`.
    ///
    /// Returns `None` for years chrono cannot represent.
    pub fn for_year(year: i32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let last = NaiveDate::from_ymd_opt(year, 12, 31)?;
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59)?;
        Self::new(
            first.and_time(NaiveTime::MIN).and_utc(),
            last.and_time(end_of_day).and_utc(),
        )
    }

    /// Checks if a datetime falls within this window, both ends included.
    pub fn contains(&self, dt: DateTime<Utc>) -> bool {
        self.start <= dt && dt <= self.end
    }

    /// Returns the start formatted for the provider's `timeMin` parameter.
    pub fn start_rfc3339(&self) -> String {
        self.start.to_rfc3339()
    }

    /// Returns the end formatted for the provider's `timeMax` parameter.
    pub fn end_rfc3339(&self) -> String {
        self.end.to_rfc3339()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn year_window_bounds() {
        let window = TimeWindow::for_year(2025).unwrap();
        assert_eq!(window.start, utc(2025, 1, 1, 0, 0, 0));
        assert_eq!(window.end, utc(2025, 12, 31, 23, 59, 59));
    }

    #[test]
    fn year_window_includes_last_second() {
        let window = TimeWindow::for_year(2024).unwrap();
        assert!(window.contains(utc(2024, 12, 31, 23, 59, 59)));
        assert!(window.contains(utc(2024, 1, 1, 0, 0, 0)));
        assert!(!window.contains(utc(2025, 1, 1, 0, 0, 0)));
        assert!(!window.contains(utc(2023, 12, 31, 23, 59, 59)));
    }

    #[test]
    fn rfc3339_formatting() {
        let window = TimeWindow::for_year(2025).unwrap();
        assert_eq!(window.start_rfc3339(), "2025-01-01T00:00:00+00:00");
        assert_eq!(window.end_rfc3339(), "2025-12-31T23:59:59+00:00");
    }

    #[test]
    fn inverted_window_rejected() {
        assert!(TimeWindow::new(utc(2025, 2, 1, 0, 0, 0), utc(2025, 1, 1, 0, 0, 0)).is_none());
    }

    #[test]
    fn unrepresentable_year_rejected() {
        assert!(TimeWindow::for_year(i32::MAX).is_none());
    }
}

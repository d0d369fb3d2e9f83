//! Canonical period windows for goals.
//!
//! All windows are half-open `[start, end)` at calendar-day granularity.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalPeriod {
    Daily,
    Weekly,
    Monthly,
}

/// The canonical window of the given period containing `date`.
///
/// Weeks start on Monday (ISO); the month window runs from the first of the
/// month to the first of the next month.
pub fn window_containing(period: GoalPeriod, date: NaiveDate) -> (NaiveDate, NaiveDate) {
    match period {
        GoalPeriod::Daily => (date, date + Days::new(1)),
        GoalPeriod::Weekly => {
            let start = date - Days::new(date.weekday().num_days_from_monday() as u64);
            (start, start + Days::new(7))
        }
        GoalPeriod::Monthly => {
            let start = date.with_day(1).unwrap_or(date);
            (start, start + Months::new(1))
        }
    }
}

/// Whether `date` falls inside the half-open `[start, end)` window.
pub fn contains(start: NaiveDate, end: NaiveDate, date: NaiveDate) -> bool {
    date >= start && date < end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn month_window_covers_whole_calendar_month() {
        let (start, end) = window_containing(GoalPeriod::Monthly, d(2026, 2, 14));
        assert_eq!(start, d(2026, 2, 1));
        assert_eq!(end, d(2026, 3, 1));
        assert!(contains(start, end, d(2026, 2, 1)));
        assert!(contains(start, end, d(2026, 2, 28)));
        assert!(!contains(start, end, d(2026, 3, 1)));
    }

    #[test]
    fn month_window_crosses_year_boundary() {
        let (start, end) = window_containing(GoalPeriod::Monthly, d(2025, 12, 31));
        assert_eq!(start, d(2025, 12, 1));
        assert_eq!(end, d(2026, 1, 1));
    }

    #[test]
    fn week_window_starts_monday() {
        // 2026-08-30 is a Sunday
        let (start, end) = window_containing(GoalPeriod::Weekly, d(2026, 8, 30));
        assert_eq!(start, d(2026, 8, 24));
        assert_eq!(end, d(2026, 8, 31));
        assert_eq!(start.weekday(), Weekday::Mon);
    }

    #[test]
    fn day_window_is_one_day() {
        let (start, end) = window_containing(GoalPeriod::Daily, d(2026, 8, 30));
        assert_eq!(start, d(2026, 8, 30));
        assert_eq!(end, d(2026, 8, 31));
    }
}

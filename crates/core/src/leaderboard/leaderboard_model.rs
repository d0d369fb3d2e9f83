//! Leaderboard domain models.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Supported ranking windows, calendar-aligned in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeWindow {
    Day,
    Week,
    Month,
    Year,
    AllTime,
}

impl TimeWindow {
    /// Half-open `[start, end)` bounds of the window containing `now`;
    /// `None` for all-time.
    pub fn range(&self, now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let today = now.date_naive();
        let (start, end) = match self {
            TimeWindow::AllTime => return None,
            TimeWindow::Day => (today, today + Days::new(1)),
            TimeWindow::Week => {
                let monday = today - Days::new(today.weekday().num_days_from_monday() as u64);
                (monday, monday + Days::new(7))
            }
            TimeWindow::Month => {
                let first = today.with_day(1).unwrap_or(today);
                (first, first + Months::new(1))
            }
            TimeWindow::Year => {
                let first = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
                (first, first + Months::new(12))
            }
        };
        Some((
            start.and_time(chrono::NaiveTime::MIN).and_utc(),
            end.and_time(chrono::NaiveTime::MIN).and_utc(),
        ))
    }
}

/// Geographic pre-filter on the candidate user set (not a points filter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegionScope {
    City(String),
    State(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardScope {
    pub window: TimeWindow,
    #[serde(default)]
    pub region: Option<RegionScope>,
}

impl LeaderboardScope {
    pub fn all_time() -> Self {
        LeaderboardScope {
            window: TimeWindow::AllTime,
            region: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// Competition rank: `1 + count(users with strictly greater sum)`.
    /// Tied sums share the rank.
    pub position: i64,
    pub user_id: String,
    pub points: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
    /// Rank of the requested user, when they have in-window points.
    pub user_position: Option<i64>,
}

//! Utility functions for SQLite storage operations.
//!
//! Timestamps are stored as RFC 3339 text in a single normalized shape
//! (UTC, microsecond precision, `Z` suffix) so that lexicographic string
//! comparison in SQL agrees with chronological order.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Formats a timestamp in the canonical stored shape.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parses a stored timestamp, falling back to the Unix epoch on corrupt
/// data so a single bad row cannot take down a whole listing.
pub fn parse_timestamp(value: &str, field_name: &str) -> DateTime<Utc> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(ts) => ts.with_timezone(&Utc),
        Err(e) => {
            log::error!("Failed to parse {} '{}': {}", field_name, value, e);
            DateTime::UNIX_EPOCH
        }
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date(value: &str, field_name: &str) -> NaiveDate {
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => date,
        Err(e) => {
            log::error!("Failed to parse {} '{}': {}", field_name, value, e);
            NaiveDate::MIN
        }
    }
}

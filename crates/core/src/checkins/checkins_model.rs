//! Check-in domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::achievements::UnlockedAchievement;
use crate::geo::Coordinate;

pub const EVENT_STATUS_ACTIVE: &str = "ACTIVE";
pub const EVENT_STATUS_INACTIVE: &str = "INACTIVE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Active,
    Inactive,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Active => EVENT_STATUS_ACTIVE,
            EventStatus::Inactive => EVENT_STATUS_INACTIVE,
        }
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            EVENT_STATUS_ACTIVE => Ok(EventStatus::Active),
            EVENT_STATUS_INACTIVE => Ok(EventStatus::Inactive),
            _ => Err(format!("unknown event status: {}", s)),
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Check-in target, owned by the event directory collaborator. Read-only
/// from the engine's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub location: Coordinate,
    /// `None` means unlimited admission.
    pub capacity: Option<i64>,
    pub secret_code: Option<String>,
    pub status: EventStatus,
}

/// A recorded attendance. At most one per (user, event).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    /// The reporting device's position; absent for secret-code check-ins.
    pub location: Option<Coordinate>,
    pub checked_in_at: DateTime<Utc>,
}

/// Input model for recording a check-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCheckIn {
    pub user_id: String,
    pub event_id: String,
    pub location: Option<Coordinate>,
}

/// How the user proves attendance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckInMode {
    Geo { lat: f64, lng: f64 },
    Secret { code: String },
}

/// Outcome of a successful check-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInResult {
    pub check_in: CheckIn,
    pub points_awarded: i64,
    pub unlocked: Vec<UnlockedAchievement>,
    /// Set when the check-in was recorded but the reward step hit a
    /// transient storage failure; the recorded check-in is never reverted
    /// and the reward is retried by the caller.
    pub reward_pending: bool,
}

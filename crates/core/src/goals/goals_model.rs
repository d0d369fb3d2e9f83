//! Goal tracker domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const GOAL_TYPE_POINTS: &str = "POINTS";
pub const GOAL_TYPE_CHECKINS: &str = "CHECKINS";
pub const GOAL_TYPE_QUIZZES: &str = "QUIZZES";

pub const GOAL_STATUS_ACTIVE: &str = "ACTIVE";
pub const GOAL_STATUS_COMPLETED: &str = "COMPLETED";
pub const GOAL_STATUS_EXPIRED: &str = "EXPIRED";

/// What a goal measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalType {
    Points,
    CheckIns,
    Quizzes,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Points => GOAL_TYPE_POINTS,
            GoalType::CheckIns => GOAL_TYPE_CHECKINS,
            GoalType::Quizzes => GOAL_TYPE_QUIZZES,
        }
    }
}

impl FromStr for GoalType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            GOAL_TYPE_POINTS => Ok(GoalType::Points),
            GOAL_TYPE_CHECKINS => Ok(GoalType::CheckIns),
            GOAL_TYPE_QUIZZES => Ok(GoalType::Quizzes),
            _ => Err(format!("unknown goal type: {}", s)),
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalStatus {
    Active,
    Completed,
    Expired,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => GOAL_STATUS_ACTIVE,
            GoalStatus::Completed => GOAL_STATUS_COMPLETED,
            GoalStatus::Expired => GOAL_STATUS_EXPIRED,
        }
    }
}

impl FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            GOAL_STATUS_ACTIVE => Ok(GoalStatus::Active),
            GOAL_STATUS_COMPLETED => Ok(GoalStatus::Completed),
            GOAL_STATUS_EXPIRED => Ok(GoalStatus::Expired),
            _ => Err(format!("unknown goal status: {}", s)),
        }
    }
}

/// A user-scoped, time-windowed target. At most one active goal exists per
/// (user, type) for any given period window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub goal_type: GoalType,
    pub target_value: i64,
    pub current_value: i64,
    /// Half-open window `[period_start, period_end)`.
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub status: GoalStatus,
    pub auto_generated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    pub fn is_overdue(&self, on: NaiveDate) -> bool {
        self.status == GoalStatus::Active && on >= self.period_end
    }
}

/// Input model for creating a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub user_id: String,
    pub goal_type: GoalType,
    pub target_value: i64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub auto_generated: bool,
}

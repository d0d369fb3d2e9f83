//! Point ledger domain models.
//!
//! A user's ledger is an append-only sequence of signed point transactions.
//! Balance and level are derived on read and never stored.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::POINTS_PER_LEVEL;
use crate::errors::{Error, Result, ValidationError};

pub const POINT_SOURCE_CHECKIN: &str = "CHECKIN";
pub const POINT_SOURCE_QUIZ: &str = "QUIZ";
pub const POINT_SOURCE_AI_CONVERSATION: &str = "AI_CONVERSATION";
pub const POINT_SOURCE_ACHIEVEMENT: &str = "ACHIEVEMENT";
pub const POINT_SOURCE_MANUAL: &str = "MANUAL";
pub const POINT_SOURCE_OTHER: &str = "OTHER";

/// Origin of a point transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PointSource {
    CheckIn,
    Quiz,
    AiConversation,
    Achievement,
    Manual,
    Other,
}

impl PointSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointSource::CheckIn => POINT_SOURCE_CHECKIN,
            PointSource::Quiz => POINT_SOURCE_QUIZ,
            PointSource::AiConversation => POINT_SOURCE_AI_CONVERSATION,
            PointSource::Achievement => POINT_SOURCE_ACHIEVEMENT,
            PointSource::Manual => POINT_SOURCE_MANUAL,
            PointSource::Other => POINT_SOURCE_OTHER,
        }
    }
}

impl FromStr for PointSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            POINT_SOURCE_CHECKIN => Ok(PointSource::CheckIn),
            POINT_SOURCE_QUIZ => Ok(PointSource::Quiz),
            POINT_SOURCE_AI_CONVERSATION => Ok(PointSource::AiConversation),
            POINT_SOURCE_ACHIEVEMENT => Ok(PointSource::Achievement),
            POINT_SOURCE_MANUAL => Ok(PointSource::Manual),
            POINT_SOURCE_OTHER => Ok(PointSource::Other),
            _ => Err(format!("unknown point source: {}", s)),
        }
    }
}

impl fmt::Display for PointSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One immutable row of a user's point ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointTransaction {
    pub id: String,
    pub user_id: String,
    pub amount: i64,
    pub reason: String,
    pub source: PointSource,
    /// Opaque key/value payload attached by the event source.
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Input model for appending a ledger row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPointTransaction {
    pub user_id: String,
    pub amount: i64,
    pub reason: String,
    pub source: PointSource,
    pub metadata: Option<serde_json::Value>,
}

impl NewPointTransaction {
    pub fn new(
        user_id: impl Into<String>,
        amount: i64,
        reason: impl Into<String>,
        source: PointSource,
    ) -> Self {
        NewPointTransaction {
            user_id: user_id.into(),
            amount,
            reason: reason.into(),
            source,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Zero and negative amounts are permitted (corrections); the user and
    /// reason must be present.
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "userId".to_string(),
            )));
        }
        if self.reason.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "reason".to_string(),
            )));
        }
        Ok(())
    }
}

/// Level information derived from a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelInfo {
    pub level: i64,
    pub points_to_next_level: i64,
}

/// Pure derivation of level from balance: `floor(balance / 100) + 1`.
/// Balances below zero (possible after corrections) clamp to level 1.
pub fn level_for_balance(balance: i64) -> LevelInfo {
    let effective = balance.max(0);
    let level = effective / POINTS_PER_LEVEL + 1;
    LevelInfo {
        level,
        points_to_next_level: level * POINTS_PER_LEVEL - effective,
    }
}

/// One page of a user's transaction history, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub data: Vec<PointTransaction>,
    pub meta: TransactionPageMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPageMeta {
    pub total_row_count: i64,
}

/// Aggregated in-window points for one user, as read by the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPointsSum {
    pub user_id: String,
    pub total: i64,
    /// Timestamp of the user's earliest in-window transaction; used as the
    /// deterministic tie-break.
    pub first_earned_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_user_is_level_one() {
        let info = level_for_balance(0);
        assert_eq!(info.level, 1);
        assert_eq!(info.points_to_next_level, 100);
    }

    #[test]
    fn balance_250_is_level_three_needing_50() {
        let info = level_for_balance(250);
        assert_eq!(info.level, 3);
        assert_eq!(info.points_to_next_level, 50);
    }

    #[test]
    fn level_boundary_is_inclusive() {
        assert_eq!(level_for_balance(99).level, 1);
        assert_eq!(level_for_balance(100).level, 2);
        assert_eq!(level_for_balance(100).points_to_next_level, 100);
    }

    #[test]
    fn negative_balance_clamps_to_level_one() {
        let info = level_for_balance(-50);
        assert_eq!(info.level, 1);
        assert_eq!(info.points_to_next_level, 100);
    }

    #[test]
    fn point_source_round_trips_storage_code() {
        for source in [
            PointSource::CheckIn,
            PointSource::Quiz,
            PointSource::AiConversation,
            PointSource::Achievement,
            PointSource::Manual,
            PointSource::Other,
        ] {
            assert_eq!(source.as_str().parse::<PointSource>(), Ok(source));
        }
    }

    #[test]
    fn blank_reason_is_rejected() {
        let tx = NewPointTransaction::new("u1", 10, "  ", PointSource::Manual);
        assert!(tx.validate().is_err());
    }
}

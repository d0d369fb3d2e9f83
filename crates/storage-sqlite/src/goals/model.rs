//! Database models for goals.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use civicly_core::goals::{Goal, GoalStatus, GoalType};

use crate::utils::{format_date, format_timestamp, parse_date, parse_timestamp};

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, Serialize, Deserialize, Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalDB {
    pub id: String,
    pub user_id: String,
    pub goal_type: String,
    pub target_value: i64,
    pub current_value: i64,
    pub period_start: String,
    pub period_end: String,
    pub status: String,
    pub auto_generated: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<GoalDB> for Goal {
    fn from(db: GoalDB) -> Self {
        let goal_type = GoalType::from_str(&db.goal_type).unwrap_or_else(|e| {
            log::error!("Unknown goal type on goal {}: {}", db.id, e);
            GoalType::Points
        });
        // A goal with an unreadable status is treated as expired rather than
        // resurrected as active.
        let status = GoalStatus::from_str(&db.status).unwrap_or_else(|e| {
            log::error!("Unknown goal status on goal {}: {}", db.id, e);
            GoalStatus::Expired
        });
        Goal {
            goal_type,
            status,
            period_start: parse_date(&db.period_start, "goals.period_start"),
            period_end: parse_date(&db.period_end, "goals.period_end"),
            created_at: parse_timestamp(&db.created_at, "goals.created_at"),
            updated_at: parse_timestamp(&db.updated_at, "goals.updated_at"),
            id: db.id,
            user_id: db.user_id,
            target_value: db.target_value,
            current_value: db.current_value,
            auto_generated: db.auto_generated,
        }
    }
}

impl From<Goal> for GoalDB {
    fn from(goal: Goal) -> Self {
        GoalDB {
            id: goal.id,
            user_id: goal.user_id,
            goal_type: goal.goal_type.as_str().to_string(),
            target_value: goal.target_value,
            current_value: goal.current_value,
            period_start: format_date(goal.period_start),
            period_end: format_date(goal.period_end),
            status: goal.status.as_str().to_string(),
            auto_generated: goal.auto_generated,
            created_at: format_timestamp(goal.created_at),
            updated_at: format_timestamp(goal.updated_at),
        }
    }
}

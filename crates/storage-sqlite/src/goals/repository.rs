use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use uuid::Uuid;

use civicly_core::goals::{Goal, GoalRepositoryTrait, GoalStatus, GoalType, NewGoal};
use civicly_core::Result;

use super::model::GoalDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::goals;
use crate::utils::{format_date, format_timestamp};

pub struct GoalRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl GoalRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        GoalRepository { pool, writer }
    }
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    fn find_active_goal(&self, user_id: &str, goal_type: GoalType) -> Result<Option<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let goal_db = goals::table
            .filter(goals::user_id.eq(user_id))
            .filter(goals::goal_type.eq(goal_type.as_str()))
            .filter(goals::status.eq(GoalStatus::Active.as_str()))
            .select(GoalDB::as_select())
            .first::<GoalDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(goal_db.map(Goal::from))
    }

    async fn insert_goal_if_absent(&self, new_goal: NewGoal) -> Result<Goal> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Goal> {
                // The lookup and insert share one transaction on the single
                // writer connection; concurrent provisioning for the same
                // window converges on whichever row lands first. The unique
                // index on (user_id, goal_type, period_start) backs this up.
                let period_start_str = format_date(new_goal.period_start);
                let existing = goals::table
                    .filter(goals::user_id.eq(&new_goal.user_id))
                    .filter(goals::goal_type.eq(new_goal.goal_type.as_str()))
                    .filter(goals::period_start.eq(&period_start_str))
                    .select(GoalDB::as_select())
                    .first::<GoalDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?;
                if let Some(goal_db) = existing {
                    return Ok(Goal::from(goal_db));
                }

                let now = format_timestamp(Utc::now());
                let goal_db = GoalDB {
                    id: Uuid::new_v4().to_string(),
                    user_id: new_goal.user_id,
                    goal_type: new_goal.goal_type.as_str().to_string(),
                    target_value: new_goal.target_value,
                    current_value: 0,
                    period_start: period_start_str,
                    period_end: format_date(new_goal.period_end),
                    status: GoalStatus::Active.as_str().to_string(),
                    auto_generated: new_goal.auto_generated,
                    created_at: now.clone(),
                    updated_at: now,
                };
                let result_db = diesel::insert_into(goals::table)
                    .values(&goal_db)
                    .returning(GoalDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Goal::from(result_db))
            })
            .await
    }

    async fn update_goal(&self, goal: Goal) -> Result<Goal> {
        let goal_db = GoalDB::from(goal);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Goal> {
                let result_db = diesel::update(goals::table.find(&goal_db.id))
                    .set(&goal_db)
                    .returning(GoalDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Goal::from(result_db))
            })
            .await
    }

    fn list_goals_for_user(&self, user_id: &str) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = goals::table
            .filter(goals::user_id.eq(user_id))
            .order(goals::period_start.desc())
            .select(GoalDB::as_select())
            .load::<GoalDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Goal::from).collect())
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::constants::{MIN_GOAL_TARGET, POINTS_PER_LEVEL};
use crate::errors::{Error, Result};
use crate::goals::goals_errors::GoalError;
use crate::goals::goals_model::{Goal, GoalStatus, GoalType, NewGoal};
use crate::goals::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use crate::goals::period::{self, GoalPeriod};

pub struct GoalService {
    goal_repo: Arc<dyn GoalRepositoryTrait>,
}

impl GoalService {
    pub fn new(goal_repo: Arc<dyn GoalRepositoryTrait>) -> Self {
        GoalService { goal_repo }
    }

    /// Marks an overdue active goal expired. Expiry is swept lazily on read
    /// rather than by a timer.
    async fn expire(&self, mut goal: Goal) -> Result<()> {
        goal.status = GoalStatus::Expired;
        goal.updated_at = Utc::now();
        log::debug!(
            "goal {} for user {} expired at end of period {}",
            goal.id,
            goal.user_id,
            goal.period_end
        );
        self.goal_repo.update_goal(goal).await?;
        Ok(())
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    async fn get_active_goal(
        &self,
        user_id: &str,
        goal_type: GoalType,
        on: NaiveDate,
    ) -> Result<Option<Goal>> {
        match self.goal_repo.find_active_goal(user_id, goal_type)? {
            Some(goal) if goal.is_overdue(on) => {
                self.expire(goal).await?;
                Ok(None)
            }
            Some(goal) if period::contains(goal.period_start, goal.period_end, on) => {
                Ok(Some(goal))
            }
            _ => Ok(None),
        }
    }

    async fn auto_create_goal(
        &self,
        user_id: &str,
        goal_type: GoalType,
        level: i64,
    ) -> Result<Goal> {
        let today = Utc::now().date_naive();
        let (period_start, period_end) = period::window_containing(GoalPeriod::Monthly, today);
        let target_value = (level * POINTS_PER_LEVEL).max(MIN_GOAL_TARGET);

        self.goal_repo
            .insert_goal_if_absent(NewGoal {
                user_id: user_id.to_string(),
                goal_type,
                target_value,
                period_start,
                period_end,
                auto_generated: true,
            })
            .await
    }

    async fn create_goal(
        &self,
        user_id: &str,
        goal_type: GoalType,
        target_value: i64,
    ) -> Result<Goal> {
        if target_value <= 0 {
            return Err(Error::Goal(GoalError::Invalid(
                "target value must be positive".to_string(),
            )));
        }

        let today = Utc::now().date_naive();
        if self.get_active_goal(user_id, goal_type, today).await?.is_some() {
            return Err(Error::Goal(GoalError::AlreadyActive(format!(
                "user {} already has an active {} goal",
                user_id, goal_type
            ))));
        }

        let (period_start, period_end) = period::window_containing(GoalPeriod::Monthly, today);
        self.goal_repo
            .insert_goal_if_absent(NewGoal {
                user_id: user_id.to_string(),
                goal_type,
                target_value,
                period_start,
                period_end,
                auto_generated: false,
            })
            .await
    }

    async fn update_progress(
        &self,
        user_id: &str,
        goal_type: GoalType,
        delta: i64,
    ) -> Result<Option<Goal>> {
        let today = Utc::now().date_naive();
        let mut goal = match self.get_active_goal(user_id, goal_type, today).await? {
            Some(goal) => goal,
            None => return Ok(None),
        };

        goal.current_value += delta;
        if goal.current_value >= goal.target_value {
            goal.status = GoalStatus::Completed;
            log::info!(
                "user {} completed {} goal {} ({}/{})",
                user_id,
                goal_type,
                goal.id,
                goal.current_value,
                goal.target_value
            );
        }
        goal.updated_at = Utc::now();

        let updated = self.goal_repo.update_goal(goal).await?;
        Ok(Some(updated))
    }
}

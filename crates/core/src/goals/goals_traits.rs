use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::Result;
use crate::goals::goals_model::{Goal, GoalType, NewGoal};

/// Trait for goal repository operations.
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    /// The user's current `ACTIVE` goal of the given type, if any.
    fn find_active_goal(&self, user_id: &str, goal_type: GoalType) -> Result<Option<Goal>>;

    /// Inserts the goal unless one already exists for the same
    /// (user, type, period_start); in that case the existing row is returned
    /// unchanged. Backed by a unique index, so concurrent provisioning for
    /// the same window converges on one row.
    async fn insert_goal_if_absent(&self, new_goal: NewGoal) -> Result<Goal>;

    async fn update_goal(&self, goal: Goal) -> Result<Goal>;

    fn list_goals_for_user(&self, user_id: &str) -> Result<Vec<Goal>>;
}

/// Trait for goal service operations.
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    /// The active goal whose window contains `on`. An overdue active goal is
    /// lazily marked expired on fetch and not returned.
    async fn get_active_goal(
        &self,
        user_id: &str,
        goal_type: GoalType,
        on: NaiveDate,
    ) -> Result<Option<Goal>>;

    /// Idempotently provisions the calendar-month goal for "now":
    /// `target = max(500, level * 100)`.
    async fn auto_create_goal(&self, user_id: &str, goal_type: GoalType, level: i64)
        -> Result<Goal>;

    /// Explicit user-created goal for the current month window.
    async fn create_goal(&self, user_id: &str, goal_type: GoalType, target_value: i64)
        -> Result<Goal>;

    /// Adds `delta` to the active goal's progress, completing it when the
    /// target is reached. Returns the updated goal, or `None` when no goal
    /// is active.
    async fn update_progress(
        &self,
        user_id: &str,
        goal_type: GoalType,
        delta: i64,
    ) -> Result<Option<Goal>>;
}

use std::collections::HashMap;

use async_trait::async_trait;

use crate::achievements::achievements_model::{
    AchievementProgress, EngagementAction, Metric, UnlockedAchievement,
};
use crate::auth::Requester;
use crate::errors::Result;

/// Trait for the unlocked-achievement store.
///
/// The storage layer enforces uniqueness of (user_id, achievement_id); the
/// insert reports whether a row was actually written so a losing racer can
/// treat its attempt as a no-op instead of double-awarding.
#[async_trait]
pub trait UnlockedAchievementRepositoryTrait: Send + Sync {
    /// Returns `true` when the unlock row was written, `false` when it
    /// already existed.
    async fn insert_if_absent(&self, unlock: UnlockedAchievement) -> Result<bool>;

    fn get_unlocked(&self, user_id: &str) -> Result<Vec<UnlockedAchievement>>;
}

/// Trait for the incremental per-user metric counters.
///
/// Counters keep requirement evaluation O(1) as history grows; they are a
/// read-model over the source-of-truth tables, maintained on every action.
#[async_trait]
pub trait EngagementMetricsRepositoryTrait: Send + Sync {
    /// Adds `by` to the counter and returns the new value.
    async fn increment(&self, user_id: &str, metric: Metric, by: i64) -> Result<i64>;

    fn get_count(&self, user_id: &str, metric: Metric) -> Result<i64>;

    fn get_counts(&self, user_id: &str) -> Result<HashMap<Metric, i64>>;
}

/// Trait for achievement service operations.
#[async_trait]
pub trait AchievementServiceTrait: Send + Sync {
    /// Evaluates the catalog against the user's metrics after a qualifying
    /// action; unlocks and rewards at most once per achievement. Returns
    /// the achievements unlocked by this call.
    async fn on_action(
        &self,
        user_id: &str,
        action: &EngagementAction,
    ) -> Result<Vec<UnlockedAchievement>>;

    /// Unlocked and locked catalog entries with per-achievement progress.
    fn get_progress(&self, requester: &Requester, user_id: &str)
        -> Result<Vec<AchievementProgress>>;
}

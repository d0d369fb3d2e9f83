use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use crate::achievements::achievements_model::{
    AchievementDefinition, AchievementProgress, EngagementAction, Metric, UnlockedAchievement,
};
use crate::achievements::achievements_traits::{
    AchievementServiceTrait, EngagementMetricsRepositoryTrait, UnlockedAchievementRepositoryTrait,
};
use crate::achievements::catalog::AchievementCatalog;
use crate::auth::Requester;
use crate::errors::Result;
use crate::ledger::{LedgerServiceTrait, NewPointTransaction, PointSource};

/// Predicate-based rule engine over the static achievement catalog.
///
/// Unlocking is monotonic and idempotent: the storage-level uniqueness of
/// (user, achievement) is the boundary, and the reward is only emitted when
/// this call actually wrote the unlock row.
pub struct AchievementService {
    catalog: Arc<AchievementCatalog>,
    unlocked_repo: Arc<dyn UnlockedAchievementRepositoryTrait>,
    metrics_repo: Arc<dyn EngagementMetricsRepositoryTrait>,
    ledger_service: Arc<dyn LedgerServiceTrait>,
}

impl AchievementService {
    pub fn new(
        catalog: Arc<AchievementCatalog>,
        unlocked_repo: Arc<dyn UnlockedAchievementRepositoryTrait>,
        metrics_repo: Arc<dyn EngagementMetricsRepositoryTrait>,
        ledger_service: Arc<dyn LedgerServiceTrait>,
    ) -> Self {
        AchievementService {
            catalog,
            unlocked_repo,
            metrics_repo,
            ledger_service,
        }
    }

    /// Whether every requirement of the definition currently holds.
    /// Cumulative metrics read the counter store; a single-event threshold
    /// is only ever satisfied by the triggering action's own payload.
    fn is_satisfied(
        definition: &AchievementDefinition,
        counts: &HashMap<Metric, i64>,
        action: &EngagementAction,
    ) -> bool {
        definition.requirements.iter().all(|req| match req.metric {
            Metric::QuizScore => match action {
                EngagementAction::QuizCompleted(outcome) => outcome.score >= req.target,
                _ => false,
            },
            metric => counts.get(&metric).copied().unwrap_or(0) >= req.target,
        })
    }

    fn requirement_progress(req_current: i64, target: i64) -> f64 {
        if target <= 0 {
            return 1.0;
        }
        (req_current as f64 / target as f64).clamp(0.0, 1.0)
    }
}

#[async_trait]
impl AchievementServiceTrait for AchievementService {
    async fn on_action(
        &self,
        user_id: &str,
        action: &EngagementAction,
    ) -> Result<Vec<UnlockedAchievement>> {
        // Maintain the O(1) counters before evaluating anything.
        for metric in action.affected_metrics() {
            if metric.is_cumulative() {
                self.metrics_repo.increment(user_id, *metric, 1).await?;
            }
        }

        let already_unlocked: HashSet<String> = self
            .unlocked_repo
            .get_unlocked(user_id)?
            .into_iter()
            .map(|u| u.achievement_id)
            .collect();

        let counts = self.metrics_repo.get_counts(user_id)?;

        let mut newly_unlocked = Vec::new();
        for definition in self.catalog.definitions() {
            if already_unlocked.contains(&definition.id)
                || !definition.is_candidate_for(action)
                || !Self::is_satisfied(definition, &counts, action)
            {
                continue;
            }

            let unlock = UnlockedAchievement {
                user_id: user_id.to_string(),
                achievement_id: definition.id.clone(),
                earned_at: Utc::now(),
            };

            // A concurrent trigger may have won the insert; losing is a
            // successful no-op and must not award a second time.
            if !self.unlocked_repo.insert_if_absent(unlock.clone()).await? {
                continue;
            }

            log::info!(
                "user {} unlocked achievement '{}' (+{} points)",
                user_id,
                definition.id,
                definition.reward_points
            );

            self.ledger_service
                .award(
                    NewPointTransaction::new(
                        user_id,
                        definition.reward_points,
                        definition.name.clone(),
                        PointSource::Achievement,
                    )
                    .with_metadata(json!({ "achievementId": definition.id })),
                )
                .await?;

            newly_unlocked.push(unlock);
        }

        Ok(newly_unlocked)
    }

    fn get_progress(
        &self,
        requester: &Requester,
        user_id: &str,
    ) -> Result<Vec<AchievementProgress>> {
        requester.ensure_can_view(user_id)?;

        let unlocked: HashMap<String, _> = self
            .unlocked_repo
            .get_unlocked(user_id)?
            .into_iter()
            .map(|u| (u.achievement_id.clone(), u.earned_at))
            .collect();
        let counts = self.metrics_repo.get_counts(user_id)?;

        let progress = self
            .catalog
            .definitions()
            .iter()
            .map(|definition| {
                let earned_at = unlocked.get(&definition.id).copied();
                let progress_percent = if earned_at.is_some() {
                    100.0
                } else {
                    let total: f64 = definition
                        .requirements
                        .iter()
                        .map(|req| {
                            let current = if req.metric.is_cumulative() {
                                counts.get(&req.metric).copied().unwrap_or(0)
                            } else {
                                // Single-event thresholds have no running
                                // value to report.
                                0
                            };
                            Self::requirement_progress(current, req.target)
                        })
                        .sum();
                    total / definition.requirements.len() as f64 * 100.0
                };
                AchievementProgress {
                    definition: definition.clone(),
                    unlocked: earned_at.is_some(),
                    earned_at,
                    progress_percent,
                }
            })
            .collect();

        Ok(progress)
    }
}

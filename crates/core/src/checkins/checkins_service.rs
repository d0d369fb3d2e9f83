use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::achievements::{AchievementServiceTrait, EngagementAction, UnlockedAchievement};
use crate::checkins::checkins_errors::CheckInError;
use crate::checkins::checkins_model::{CheckIn, CheckInMode, CheckInResult, NewCheckIn};
use crate::checkins::checkins_traits::{
    CheckInRepositoryTrait, CheckInServiceTrait, EventRepositoryTrait,
};
use crate::constants::{CHECKIN_BASE_POINTS, CHECKIN_GEO_POINTS};
use crate::errors::Result;
use crate::geo::{self, Admission, Coordinate};
use crate::goals::{GoalServiceTrait, GoalType};
use crate::ledger::{LedgerServiceTrait, NewPointTransaction, PointSource};

/// Orchestrates the check-in intake: event validation, geofence or secret
/// code, the atomic capacity-checked insert, and the reward fan-out.
pub struct CheckInService {
    event_repo: Arc<dyn EventRepositoryTrait>,
    checkin_repo: Arc<dyn CheckInRepositoryTrait>,
    ledger_service: Arc<dyn LedgerServiceTrait>,
    achievement_service: Arc<dyn AchievementServiceTrait>,
    goal_service: Arc<dyn GoalServiceTrait>,
}

impl CheckInService {
    pub fn new(
        event_repo: Arc<dyn EventRepositoryTrait>,
        checkin_repo: Arc<dyn CheckInRepositoryTrait>,
        ledger_service: Arc<dyn LedgerServiceTrait>,
        achievement_service: Arc<dyn AchievementServiceTrait>,
        goal_service: Arc<dyn GoalServiceTrait>,
    ) -> Self {
        CheckInService {
            event_repo,
            checkin_repo,
            ledger_service,
            achievement_service,
            goal_service,
        }
    }

    /// Awards the check-in points, runs the rule engine, and bumps goal
    /// progress. Runs after the check-in row is committed; failures here
    /// must not revert it.
    async fn reward(
        &self,
        user_id: &str,
        event_id: &str,
        points: i64,
    ) -> Result<Vec<UnlockedAchievement>> {
        self.ledger_service
            .award(
                NewPointTransaction::new(user_id, points, "Event check-in", PointSource::CheckIn)
                    .with_metadata(json!({ "eventId": event_id })),
            )
            .await?;

        let unlocked = self
            .achievement_service
            .on_action(user_id, &EngagementAction::CheckInCreated)
            .await?;

        self.goal_service
            .update_progress(user_id, GoalType::CheckIns, 1)
            .await?;
        self.goal_service
            .update_progress(user_id, GoalType::Points, points)
            .await?;

        Ok(unlocked)
    }
}

#[async_trait]
impl CheckInServiceTrait for CheckInService {
    async fn check_in(
        &self,
        user_id: &str,
        event_id: &str,
        mode: CheckInMode,
    ) -> Result<CheckInResult> {
        let event = self
            .event_repo
            .get_event(event_id)?
            .ok_or_else(|| CheckInError::EventNotFound(event_id.to_string()))?;
        if event.status != crate::checkins::EventStatus::Active {
            return Err(CheckInError::EventInactive(event_id.to_string()).into());
        }

        let (points, location) = match &mode {
            CheckInMode::Secret { code } => {
                if event.secret_code.as_deref() != Some(code.as_str()) {
                    return Err(CheckInError::InvalidCode.into());
                }
                // The secret-code path skips distance validation entirely.
                (CHECKIN_BASE_POINTS, None)
            }
            CheckInMode::Geo { lat, lng } => {
                let reported = Coordinate::new(*lat, *lng);
                reported.validate()?;

                let existing_count = self.checkin_repo.count_for_event(event_id)?;
                let already = self.checkin_repo.has_checked_in(user_id, event_id)?;
                match geo::validate_admission(
                    reported,
                    event.location,
                    event.capacity,
                    existing_count,
                    already,
                ) {
                    Admission::Admitted { .. } => {}
                    Admission::TooFar { distance_m } => {
                        return Err(CheckInError::TooFar { distance_m }.into());
                    }
                    Admission::AtCapacity => {
                        return Err(CheckInError::AtCapacity(event_id.to_string()).into());
                    }
                    Admission::AlreadyCheckedIn => {
                        return Err(CheckInError::AlreadyCheckedIn(event_id.to_string()).into());
                    }
                }
                (CHECKIN_GEO_POINTS, Some(reported))
            }
        };

        // The pre-flight admission check above is advisory; the capacity
        // and duplicate invariants are enforced inside this single storage
        // transaction.
        let check_in = self
            .checkin_repo
            .insert_check_in(
                NewCheckIn {
                    user_id: user_id.to_string(),
                    event_id: event_id.to_string(),
                    location,
                },
                event.capacity,
            )
            .await?;

        match self.reward(user_id, event_id, points).await {
            Ok(unlocked) => Ok(CheckInResult {
                check_in,
                points_awarded: points,
                unlocked,
                reward_pending: false,
            }),
            Err(err) => {
                // The validated check-in stays recorded; losing a reward is
                // recoverable, losing the attendance record is not.
                log::error!(
                    "reward step failed for user {} at event {} ({}); check-in kept, reward pending",
                    user_id,
                    event_id,
                    err
                );
                Ok(CheckInResult {
                    check_in,
                    points_awarded: 0,
                    unlocked: Vec::new(),
                    reward_pending: true,
                })
            }
        }
    }

    fn get_event_check_in_count(&self, event_id: &str) -> Result<i64> {
        self.checkin_repo.count_for_event(event_id)
    }

    fn get_user_check_ins(&self, user_id: &str) -> Result<Vec<CheckIn>> {
        self.checkin_repo.get_check_ins_for_user(user_id)
    }
}

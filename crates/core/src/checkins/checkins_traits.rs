use async_trait::async_trait;

use crate::checkins::checkins_model::{CheckIn, CheckInMode, CheckInResult, Event, NewCheckIn};
use crate::errors::Result;

/// Read access to event records owned by the event directory collaborator.
/// The upsert exists for that collaborator's administrative path.
#[async_trait]
pub trait EventRepositoryTrait: Send + Sync {
    fn get_event(&self, event_id: &str) -> Result<Option<Event>>;
    async fn upsert_event(&self, event: Event) -> Result<Event>;
}

/// Trait for the check-in store.
#[async_trait]
pub trait CheckInRepositoryTrait: Send + Sync {
    /// Capacity-checked insert. The count, the comparison against
    /// `capacity`, and the insert run in one storage transaction so that
    /// concurrent admissions can never together exceed capacity. A
    /// duplicate (user, event) pair fails with `AlreadyCheckedIn`; a full
    /// event fails with `AtCapacity`.
    async fn insert_check_in(
        &self,
        new_check_in: NewCheckIn,
        capacity: Option<i64>,
    ) -> Result<CheckIn>;

    fn has_checked_in(&self, user_id: &str, event_id: &str) -> Result<bool>;

    fn count_for_event(&self, event_id: &str) -> Result<i64>;

    fn get_check_ins_for_user(&self, user_id: &str) -> Result<Vec<CheckIn>>;
}

/// Trait for check-in intake operations.
#[async_trait]
pub trait CheckInServiceTrait: Send + Sync {
    /// Validates and records a check-in, then awards points and runs the
    /// achievement rule engine.
    async fn check_in(
        &self,
        user_id: &str,
        event_id: &str,
        mode: CheckInMode,
    ) -> Result<CheckInResult>;

    fn get_event_check_in_count(&self, event_id: &str) -> Result<i64>;

    fn get_user_check_ins(&self, user_id: &str) -> Result<Vec<CheckIn>>;
}

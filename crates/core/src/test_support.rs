//! In-memory repository implementations shared by the service test modules.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::achievements::{
    EngagementMetricsRepositoryTrait, Metric, UnlockedAchievement,
    UnlockedAchievementRepositoryTrait,
};
use crate::checkins::{CheckIn, CheckInError, Event, EventRepositoryTrait, NewCheckIn};
use crate::checkins::CheckInRepositoryTrait;
use crate::errors::{DatabaseError, Error, Result};
use crate::goals::{Goal, GoalRepositoryTrait, GoalStatus, GoalType, NewGoal};
use crate::leaderboard::{RegionDirectoryTrait, RegionScope};
use crate::ledger::{
    LedgerRepositoryTrait, NewPointTransaction, PointTransaction, TransactionPage,
    TransactionPageMeta, UserPointsSum,
};

// --- Ledger ---

#[derive(Default)]
pub struct InMemoryLedgerRepository {
    pub rows: Mutex<Vec<PointTransaction>>,
    /// When set, writes fail with a retryable storage error.
    pub fail_writes: AtomicBool,
}

impl InMemoryLedgerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Seeds a row with an explicit timestamp (for window tests).
    pub fn push_at(&self, user_id: &str, amount: i64, created_at: DateTime<Utc>) {
        self.rows.lock().unwrap().push(PointTransaction {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            amount,
            reason: "seed".to_string(),
            source: crate::ledger::PointSource::Other,
            metadata: None,
            created_at,
        });
    }
}

#[async_trait]
impl LedgerRepositoryTrait for InMemoryLedgerRepository {
    async fn insert_transaction(&self, new_tx: NewPointTransaction) -> Result<PointTransaction> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Database(DatabaseError::ConnectionFailed(
                "simulated outage".to_string(),
            )));
        }
        let tx = PointTransaction {
            id: Uuid::new_v4().to_string(),
            user_id: new_tx.user_id,
            amount: new_tx.amount,
            reason: new_tx.reason,
            source: new_tx.source,
            metadata: new_tx.metadata,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(tx.clone());
        Ok(tx)
    }

    fn sum_amount_for_user(&self, user_id: &str, as_of: Option<DateTime<Utc>>) -> Result<i64> {
        let cutoff = as_of.unwrap_or_else(Utc::now);
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id && t.created_at <= cutoff)
            .map(|t| t.amount)
            .sum())
    }

    fn get_transactions_page(
        &self,
        user_id: &str,
        page: i64,
        page_size: i64,
    ) -> Result<TransactionPage> {
        let rows = self.rows.lock().unwrap();
        let mut mine: Vec<_> = rows.iter().filter(|t| t.user_id == user_id).cloned().collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total_row_count = mine.len() as i64;
        let data = mine
            .into_iter()
            .skip((page * page_size) as usize)
            .take(page_size as usize)
            .collect();
        Ok(TransactionPage {
            data,
            meta: TransactionPageMeta { total_row_count },
        })
    }

    fn sum_points_by_user(
        &self,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
        user_filter: Option<&[String]>,
    ) -> Result<Vec<UserPointsSum>> {
        let rows = self.rows.lock().unwrap();
        let mut sums: HashMap<String, (i64, DateTime<Utc>)> = HashMap::new();
        for tx in rows.iter() {
            if let Some((start, end)) = range {
                if tx.created_at < start || tx.created_at >= end {
                    continue;
                }
            }
            if let Some(filter) = user_filter {
                if !filter.iter().any(|u| u == &tx.user_id) {
                    continue;
                }
            }
            let entry = sums
                .entry(tx.user_id.clone())
                .or_insert((0, tx.created_at));
            entry.0 += tx.amount;
            entry.1 = entry.1.min(tx.created_at);
        }
        Ok(sums
            .into_iter()
            .map(|(user_id, (total, first_earned_at))| UserPointsSum {
                user_id,
                total,
                first_earned_at,
            })
            .collect())
    }
}

// --- Achievements ---

#[derive(Default)]
pub struct InMemoryUnlockedAchievementRepository {
    pub rows: Mutex<Vec<UnlockedAchievement>>,
}

impl InMemoryUnlockedAchievementRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UnlockedAchievementRepositoryTrait for InMemoryUnlockedAchievementRepository {
    async fn insert_if_absent(&self, unlock: UnlockedAchievement) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let exists = rows
            .iter()
            .any(|u| u.user_id == unlock.user_id && u.achievement_id == unlock.achievement_id);
        if exists {
            return Ok(false);
        }
        rows.push(unlock);
        Ok(true)
    }

    fn get_unlocked(&self, user_id: &str) -> Result<Vec<UnlockedAchievement>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryMetricsRepository {
    pub counts: Mutex<HashMap<(String, Metric), i64>>,
}

impl InMemoryMetricsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, user_id: &str, metric: Metric, count: i64) {
        self.counts
            .lock()
            .unwrap()
            .insert((user_id.to_string(), metric), count);
    }
}

#[async_trait]
impl EngagementMetricsRepositoryTrait for InMemoryMetricsRepository {
    async fn increment(&self, user_id: &str, metric: Metric, by: i64) -> Result<i64> {
        let mut counts = self.counts.lock().unwrap();
        let entry = counts.entry((user_id.to_string(), metric)).or_insert(0);
        *entry += by;
        Ok(*entry)
    }

    fn get_count(&self, user_id: &str, metric: Metric) -> Result<i64> {
        Ok(self
            .counts
            .lock()
            .unwrap()
            .get(&(user_id.to_string(), metric))
            .copied()
            .unwrap_or(0))
    }

    fn get_counts(&self, user_id: &str) -> Result<HashMap<Metric, i64>> {
        Ok(self
            .counts
            .lock()
            .unwrap()
            .iter()
            .filter(|((u, _), _)| u == user_id)
            .map(|((_, m), c)| (*m, *c))
            .collect())
    }
}

// --- Goals ---

#[derive(Default)]
pub struct InMemoryGoalRepository {
    pub rows: Mutex<Vec<Goal>>,
}

impl InMemoryGoalRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GoalRepositoryTrait for InMemoryGoalRepository {
    fn find_active_goal(&self, user_id: &str, goal_type: GoalType) -> Result<Option<Goal>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|g| {
                g.user_id == user_id && g.goal_type == goal_type && g.status == GoalStatus::Active
            })
            .cloned())
    }

    async fn insert_goal_if_absent(&self, new_goal: NewGoal) -> Result<Goal> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows.iter().find(|g| {
            g.user_id == new_goal.user_id
                && g.goal_type == new_goal.goal_type
                && g.period_start == new_goal.period_start
        }) {
            return Ok(existing.clone());
        }
        let now = Utc::now();
        let goal = Goal {
            id: Uuid::new_v4().to_string(),
            user_id: new_goal.user_id,
            goal_type: new_goal.goal_type,
            target_value: new_goal.target_value,
            current_value: 0,
            period_start: new_goal.period_start,
            period_end: new_goal.period_end,
            status: GoalStatus::Active,
            auto_generated: new_goal.auto_generated,
            created_at: now,
            updated_at: now,
        };
        rows.push(goal.clone());
        Ok(goal)
    }

    async fn update_goal(&self, goal: Goal) -> Result<Goal> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|g| g.id == goal.id) {
            Some(slot) => {
                *slot = goal.clone();
                Ok(goal)
            }
            None => Err(Error::Database(DatabaseError::NotFound(goal.id))),
        }
    }

    fn list_goals_for_user(&self, user_id: &str) -> Result<Vec<Goal>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect())
    }
}

// --- Events / check-ins ---

#[derive(Default)]
pub struct InMemoryEventRepository {
    pub rows: Mutex<Vec<Event>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, event: Event) {
        self.rows.lock().unwrap().push(event);
    }
}

#[async_trait]
impl EventRepositoryTrait for InMemoryEventRepository {
    fn get_event(&self, event_id: &str) -> Result<Option<Event>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == event_id)
            .cloned())
    }

    async fn upsert_event(&self, event: Event) -> Result<Event> {
        let mut rows = self.rows.lock().unwrap();
        rows.retain(|e| e.id != event.id);
        rows.push(event.clone());
        Ok(event)
    }
}

#[derive(Default)]
pub struct InMemoryCheckInRepository {
    pub rows: Mutex<Vec<CheckIn>>,
}

impl InMemoryCheckInRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CheckInRepositoryTrait for InMemoryCheckInRepository {
    async fn insert_check_in(
        &self,
        new_check_in: NewCheckIn,
        capacity: Option<i64>,
    ) -> Result<CheckIn> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|c| c.user_id == new_check_in.user_id && c.event_id == new_check_in.event_id)
        {
            return Err(Error::CheckIn(CheckInError::AlreadyCheckedIn(
                new_check_in.event_id,
            )));
        }
        if let Some(max) = capacity {
            let count = rows
                .iter()
                .filter(|c| c.event_id == new_check_in.event_id)
                .count() as i64;
            if count >= max {
                return Err(Error::CheckIn(CheckInError::AtCapacity(
                    new_check_in.event_id,
                )));
            }
        }
        let check_in = CheckIn {
            id: Uuid::new_v4().to_string(),
            user_id: new_check_in.user_id,
            event_id: new_check_in.event_id,
            location: new_check_in.location,
            checked_in_at: Utc::now(),
        };
        rows.push(check_in.clone());
        Ok(check_in)
    }

    fn has_checked_in(&self, user_id: &str, event_id: &str) -> Result<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.user_id == user_id && c.event_id == event_id))
    }

    fn count_for_event(&self, event_id: &str) -> Result<i64> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.event_id == event_id)
            .count() as i64)
    }

    fn get_check_ins_for_user(&self, user_id: &str) -> Result<Vec<CheckIn>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }
}

// --- Regions ---

pub struct StaticRegionDirectory {
    pub members: HashMap<String, Vec<String>>,
}

impl StaticRegionDirectory {
    pub fn new() -> Self {
        StaticRegionDirectory {
            members: HashMap::new(),
        }
    }

    pub fn with_city(mut self, city: &str, users: &[&str]) -> Self {
        self.members.insert(
            format!("city:{}", city),
            users.iter().map(|u| u.to_string()).collect(),
        );
        self
    }
}

impl RegionDirectoryTrait for StaticRegionDirectory {
    fn users_in(&self, region: &RegionScope) -> Result<Vec<String>> {
        let key = match region {
            RegionScope::City(city) => format!("city:{}", city),
            RegionScope::State(state) => format!("state:{}", state),
        };
        Ok(self.members.get(&key).cloned().unwrap_or_default())
    }
}

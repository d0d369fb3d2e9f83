use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;

use civicly_core::achievements::{
    EngagementMetricsRepositoryTrait, Metric, UnlockedAchievement,
    UnlockedAchievementRepositoryTrait,
};
use civicly_core::Result;

use super::model::{UnlockedAchievementDB, UserMetricDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{unlocked_achievements, user_metrics};
use crate::utils::format_timestamp;

/// Repository for achievement unlock rows.
pub struct UnlockedAchievementRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl UnlockedAchievementRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        UnlockedAchievementRepository { pool, writer }
    }
}

#[async_trait]
impl UnlockedAchievementRepositoryTrait for UnlockedAchievementRepository {
    async fn insert_if_absent(&self, unlock: UnlockedAchievement) -> Result<bool> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<bool> {
                let unlock_db = UnlockedAchievementDB::from(unlock);
                // INSERT OR IGNORE against the composite primary key; zero
                // affected rows means somebody else unlocked it first.
                let written = diesel::insert_or_ignore_into(unlocked_achievements::table)
                    .values(&unlock_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(written > 0)
            })
            .await
    }

    fn get_unlocked(&self, user_id: &str) -> Result<Vec<UnlockedAchievement>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = unlocked_achievements::table
            .filter(unlocked_achievements::user_id.eq(user_id))
            .order(unlocked_achievements::earned_at.asc())
            .select(UnlockedAchievementDB::as_select())
            .load::<UnlockedAchievementDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(UnlockedAchievement::from).collect())
    }
}

/// Repository for the per-user engagement counters.
pub struct EngagementMetricsRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl EngagementMetricsRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        EngagementMetricsRepository { pool, writer }
    }
}

#[async_trait]
impl EngagementMetricsRepositoryTrait for EngagementMetricsRepository {
    async fn increment(&self, user_id: &str, metric: Metric, by: i64) -> Result<i64> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<i64> {
                let now = format_timestamp(Utc::now());
                let row = UserMetricDB {
                    user_id: user_id.clone(),
                    metric: metric.as_str().to_string(),
                    count: by,
                    updated_at: now.clone(),
                };
                diesel::insert_into(user_metrics::table)
                    .values(&row)
                    .on_conflict((user_metrics::user_id, user_metrics::metric))
                    .do_update()
                    .set((
                        user_metrics::count.eq(user_metrics::count + by),
                        user_metrics::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let updated: i64 = user_metrics::table
                    .filter(user_metrics::user_id.eq(&user_id))
                    .filter(user_metrics::metric.eq(metric.as_str()))
                    .select(user_metrics::count)
                    .first(conn)
                    .map_err(StorageError::from)?;
                Ok(updated)
            })
            .await
    }

    fn get_count(&self, user_id: &str, metric: Metric) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        let count = user_metrics::table
            .filter(user_metrics::user_id.eq(user_id))
            .filter(user_metrics::metric.eq(metric.as_str()))
            .select(user_metrics::count)
            .first::<i64>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(count.unwrap_or(0))
    }

    fn get_counts(&self, user_id: &str) -> Result<HashMap<Metric, i64>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = user_metrics::table
            .filter(user_metrics::user_id.eq(user_id))
            .select(UserMetricDB::as_select())
            .load::<UserMetricDB>(&mut conn)
            .map_err(StorageError::from)?;

        let mut counts = HashMap::new();
        for row in rows {
            match Metric::from_str(&row.metric) {
                Ok(metric) => {
                    counts.insert(metric, row.count);
                }
                Err(e) => log::warn!("Skipping unknown metric for user {}: {}", user_id, e),
            }
        }
        Ok(counts)
    }
}

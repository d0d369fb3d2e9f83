use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use uuid::Uuid;

use civicly_core::checkins::{
    CheckIn, CheckInError, CheckInRepositoryTrait, NewCheckIn,
};
use civicly_core::{Error, Result};

use super::model::CheckInDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{is_unique_violation, StorageError};
use crate::schema::check_ins;
use crate::utils::format_timestamp;

/// Repository for check-in rows.
pub struct CheckInRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl CheckInRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        CheckInRepository { pool, writer }
    }
}

#[async_trait]
impl CheckInRepositoryTrait for CheckInRepository {
    async fn insert_check_in(
        &self,
        new_check_in: NewCheckIn,
        capacity: Option<i64>,
    ) -> Result<CheckIn> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<CheckIn> {
                // Duplicate, count, capacity comparison and insert all run in
                // the writer's single immediate transaction, so two racing
                // check-ins can never together exceed capacity.
                let duplicate: i64 = check_ins::table
                    .filter(check_ins::user_id.eq(&new_check_in.user_id))
                    .filter(check_ins::event_id.eq(&new_check_in.event_id))
                    .count()
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                if duplicate > 0 {
                    return Err(Error::CheckIn(CheckInError::AlreadyCheckedIn(
                        new_check_in.event_id,
                    )));
                }

                if let Some(max) = capacity {
                    let current: i64 = check_ins::table
                        .filter(check_ins::event_id.eq(&new_check_in.event_id))
                        .count()
                        .get_result(conn)
                        .map_err(StorageError::from)?;
                    if current >= max {
                        return Err(Error::CheckIn(CheckInError::AtCapacity(
                            new_check_in.event_id,
                        )));
                    }
                }

                let check_in_db = CheckInDB {
                    id: Uuid::new_v4().to_string(),
                    user_id: new_check_in.user_id,
                    event_id: new_check_in.event_id,
                    latitude: new_check_in.location.map(|c| c.lat),
                    longitude: new_check_in.location.map(|c| c.lng),
                    checked_in_at: format_timestamp(Utc::now()),
                };
                let result_db = diesel::insert_into(check_ins::table)
                    .values(&check_in_db)
                    .returning(CheckInDB::as_returning())
                    .get_result(conn)
                    .map_err(|e| {
                        // The unique index is the last line of defence for
                        // writers outside this actor.
                        if is_unique_violation(&e) {
                            Error::CheckIn(CheckInError::AlreadyCheckedIn(
                                check_in_db.event_id.clone(),
                            ))
                        } else {
                            Error::from(StorageError::from(e))
                        }
                    })?;
                Ok(CheckIn::from(result_db))
            })
            .await
    }

    fn has_checked_in(&self, user_id: &str, event_id: &str) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let count: i64 = check_ins::table
            .filter(check_ins::user_id.eq(user_id))
            .filter(check_ins::event_id.eq(event_id))
            .count()
            .get_result(&mut conn)
            .map_err(StorageError::from)?;
        Ok(count > 0)
    }

    fn count_for_event(&self, event_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        let count = check_ins::table
            .filter(check_ins::event_id.eq(event_id))
            .count()
            .get_result(&mut conn)
            .map_err(StorageError::from)?;
        Ok(count)
    }

    fn get_check_ins_for_user(&self, user_id: &str) -> Result<Vec<CheckIn>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = check_ins::table
            .filter(check_ins::user_id.eq(user_id))
            .order(check_ins::checked_in_at.desc())
            .select(CheckInDB::as_select())
            .load::<CheckInDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(CheckIn::from).collect())
    }
}

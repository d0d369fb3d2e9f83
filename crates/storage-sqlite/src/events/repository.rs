use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;

use civicly_core::checkins::{Event, EventRepositoryTrait};
use civicly_core::Result;

use super::model::EventDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::events;
use crate::utils::format_timestamp;

/// Repository for event records. The engine only reads events; the upsert
/// serves the administrative path that mirrors the event directory.
pub struct EventRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl EventRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        EventRepository { pool, writer }
    }
}

#[async_trait]
impl EventRepositoryTrait for EventRepository {
    fn get_event(&self, event_id: &str) -> Result<Option<Event>> {
        let mut conn = get_connection(&self.pool)?;
        let event_db = events::table
            .find(event_id)
            .select(EventDB::as_select())
            .first::<EventDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(event_db.map(Event::from))
    }

    async fn upsert_event(&self, event: Event) -> Result<Event> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Event> {
                let now = format_timestamp(Utc::now());
                let event_db = EventDB {
                    id: event.id,
                    name: event.name,
                    latitude: event.location.lat,
                    longitude: event.location.lng,
                    capacity: event.capacity,
                    secret_code: event.secret_code,
                    status: event.status.as_str().to_string(),
                    created_at: now.clone(),
                    updated_at: now,
                };
                let result_db = diesel::insert_into(events::table)
                    .values(&event_db)
                    .on_conflict(events::id)
                    .do_update()
                    .set(&event_db)
                    .returning(EventDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Event::from(result_db))
            })
            .await
    }
}

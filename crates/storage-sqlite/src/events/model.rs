//! Database models for events.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use civicly_core::checkins::{Event, EventStatus};
use civicly_core::geo::Coordinate;

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, Serialize, Deserialize, Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EventDB {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity: Option<i64>,
    pub secret_code: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<EventDB> for Event {
    fn from(db: EventDB) -> Self {
        // An event with an unreadable status must not admit anyone.
        let status = EventStatus::from_str(&db.status).unwrap_or_else(|e| {
            log::error!("Unknown status on event {}: {}", db.id, e);
            EventStatus::Inactive
        });
        Event {
            status,
            location: Coordinate::new(db.latitude, db.longitude),
            id: db.id,
            name: db.name,
            capacity: db.capacity,
            secret_code: db.secret_code,
        }
    }
}

//! Database models for check-ins.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use civicly_core::checkins::CheckIn;
use civicly_core::geo::Coordinate;

use crate::utils::parse_timestamp;

#[derive(Queryable, Identifiable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::check_ins)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CheckInDB {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub checked_in_at: String,
}

impl From<CheckInDB> for CheckIn {
    fn from(db: CheckInDB) -> Self {
        let location = match (db.latitude, db.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
            _ => None,
        };
        CheckIn {
            location,
            checked_in_at: parse_timestamp(&db.checked_in_at, "check_ins.checked_in_at"),
            id: db.id,
            user_id: db.user_id,
            event_id: db.event_id,
        }
    }
}

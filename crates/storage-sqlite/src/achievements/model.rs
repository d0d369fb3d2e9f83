//! Database models for achievement unlocks and engagement metric counters.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use civicly_core::achievements::UnlockedAchievement;

use crate::utils::{format_timestamp, parse_timestamp};

#[derive(Queryable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::unlocked_achievements)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UnlockedAchievementDB {
    pub user_id: String,
    pub achievement_id: String,
    pub earned_at: String,
}

impl From<UnlockedAchievementDB> for UnlockedAchievement {
    fn from(db: UnlockedAchievementDB) -> Self {
        UnlockedAchievement {
            earned_at: parse_timestamp(&db.earned_at, "unlocked_achievements.earned_at"),
            user_id: db.user_id,
            achievement_id: db.achievement_id,
        }
    }
}

impl From<UnlockedAchievement> for UnlockedAchievementDB {
    fn from(unlock: UnlockedAchievement) -> Self {
        UnlockedAchievementDB {
            user_id: unlock.user_id,
            achievement_id: unlock.achievement_id,
            earned_at: format_timestamp(unlock.earned_at),
        }
    }
}

#[derive(Queryable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::user_metrics)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserMetricDB {
    pub user_id: String,
    pub metric: String,
    pub count: i64,
    pub updated_at: String,
}

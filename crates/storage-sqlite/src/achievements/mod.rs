//! SQLite storage implementation for achievement unlocks and metrics.

mod model;
mod repository;

pub use model::{UnlockedAchievementDB, UserMetricDB};
pub use repository::{EngagementMetricsRepository, UnlockedAchievementRepository};

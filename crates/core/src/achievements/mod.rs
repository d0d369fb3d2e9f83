//! Achievement rule engine - catalog, models, service, and traits.

mod achievements_errors;
mod achievements_model;
mod achievements_service;
mod achievements_traits;
mod catalog;


pub use achievements_errors::AchievementError;
pub use achievements_model::{
    AchievementDefinition, AchievementProgress, EngagementAction, Metric, QuizOutcome, Rarity,
    Requirement, UnlockedAchievement,
};
pub use achievements_service::AchievementService;
pub use achievements_traits::{
    AchievementServiceTrait, EngagementMetricsRepositoryTrait, UnlockedAchievementRepositoryTrait,
};
pub use catalog::AchievementCatalog;

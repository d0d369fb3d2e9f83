//! Goal tracker module - periodic per-user targets.

mod goals_errors;
mod goals_model;
mod goals_service;
mod goals_traits;
pub mod period;

#[cfg(test)]
mod goals_service_tests;

pub use goals_errors::GoalError;
pub use goals_model::{Goal, GoalStatus, GoalType, NewGoal};
pub use goals_service::GoalService;
pub use goals_traits::{GoalRepositoryTrait, GoalServiceTrait};

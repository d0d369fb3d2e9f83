//! Leaderboard module - on-demand ranking over the point ledger.

mod leaderboard_model;
mod leaderboard_service;
mod leaderboard_traits;


pub use leaderboard_model::{
    Leaderboard, LeaderboardEntry, LeaderboardScope, RegionScope, TimeWindow,
};
pub use leaderboard_service::LeaderboardService;
pub use leaderboard_traits::{LeaderboardServiceTrait, RegionDirectoryTrait};

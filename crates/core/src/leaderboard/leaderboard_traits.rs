use crate::errors::Result;
use crate::leaderboard::leaderboard_model::{Leaderboard, LeaderboardScope, RegionScope};

/// User/geography lookup owned by the identity collaborator.
///
/// The engine does not persist user profiles; the embedding application
/// supplies the set of users sharing a city or state.
pub trait RegionDirectoryTrait: Send + Sync {
    fn users_in(&self, region: &RegionScope) -> Result<Vec<String>>;
}

/// Trait for leaderboard service operations.
pub trait LeaderboardServiceTrait: Send + Sync {
    /// Ranks users by summed in-window points, highest first. Read-only;
    /// may run against a slightly stale snapshot of the ledger.
    fn rank(&self, scope: &LeaderboardScope, for_user: Option<&str>) -> Result<Leaderboard>;
}

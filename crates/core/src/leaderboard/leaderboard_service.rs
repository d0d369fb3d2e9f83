use std::sync::Arc;

use chrono::Utc;

use crate::errors::Result;
use crate::leaderboard::leaderboard_model::{Leaderboard, LeaderboardEntry, LeaderboardScope};
use crate::leaderboard::leaderboard_traits::{LeaderboardServiceTrait, RegionDirectoryTrait};
use crate::ledger::LedgerRepositoryTrait;

/// Computes rankings on demand from ledger transactions. Nothing is stored;
/// the leaderboard is a pure read path.
pub struct LeaderboardService {
    ledger_repo: Arc<dyn LedgerRepositoryTrait>,
    region_directory: Option<Arc<dyn RegionDirectoryTrait>>,
}

impl LeaderboardService {
    pub fn new(
        ledger_repo: Arc<dyn LedgerRepositoryTrait>,
        region_directory: Option<Arc<dyn RegionDirectoryTrait>>,
    ) -> Self {
        LeaderboardService {
            ledger_repo,
            region_directory,
        }
    }
}

impl LeaderboardServiceTrait for LeaderboardService {
    fn rank(&self, scope: &LeaderboardScope, for_user: Option<&str>) -> Result<Leaderboard> {
        let range = scope.window.range(Utc::now());

        // Geography restricts the candidate user set before any sums are
        // taken; it never filters individual transactions.
        let user_filter = match (&scope.region, &self.region_directory) {
            (Some(region), Some(directory)) => Some(directory.users_in(region)?),
            (Some(_), None) => {
                log::warn!("geographic scope requested but no region directory is configured");
                Some(Vec::new())
            }
            (None, _) => None,
        };

        if let Some(filter) = &user_filter {
            if filter.is_empty() {
                return Ok(Leaderboard {
                    entries: Vec::new(),
                    user_position: None,
                });
            }
        }

        let mut sums = self
            .ledger_repo
            .sum_points_by_user(range, user_filter.as_deref())?;

        // Descending by points; ties ordered deterministically by earliest
        // in-window activity, then user id.
        sums.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.first_earned_at.cmp(&b.first_earned_at))
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        let mut entries = Vec::with_capacity(sums.len());
        let mut position = 0i64;
        let mut prev_total = None;
        for (idx, sum) in sums.into_iter().enumerate() {
            if prev_total != Some(sum.total) {
                position = idx as i64 + 1;
                prev_total = Some(sum.total);
            }
            entries.push(LeaderboardEntry {
                position,
                user_id: sum.user_id,
                points: sum.total,
            });
        }

        let user_position = for_user.and_then(|user_id| {
            entries
                .iter()
                .find(|e| e.user_id == user_id)
                .map(|e| e.position)
        });

        Ok(Leaderboard {
            entries,
            user_position,
        })
    }
}

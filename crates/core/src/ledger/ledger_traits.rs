use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::auth::Requester;
use crate::errors::Result;
use crate::ledger::ledger_model::{
    LevelInfo, NewPointTransaction, PointTransaction, TransactionPage, UserPointsSum,
};

/// Trait for ledger repository operations.
///
/// The ledger is append-only: implementations expose no update or delete.
#[async_trait]
pub trait LedgerRepositoryTrait: Send + Sync {
    async fn insert_transaction(&self, new_tx: NewPointTransaction) -> Result<PointTransaction>;

    /// Signed sum of the user's transactions up to `as_of` (inclusive,
    /// default: now).
    fn sum_amount_for_user(&self, user_id: &str, as_of: Option<DateTime<Utc>>) -> Result<i64>;

    fn get_transactions_page(
        &self,
        user_id: &str,
        page: i64,
        page_size: i64,
    ) -> Result<TransactionPage>;

    /// Per-user signed sums over a half-open `[start, end)` window
    /// (`None` = all-time), optionally restricted to a candidate user set.
    fn sum_points_by_user(
        &self,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
        user_filter: Option<&[String]>,
    ) -> Result<Vec<UserPointsSum>>;
}

/// Trait for ledger service operations.
#[async_trait]
pub trait LedgerServiceTrait: Send + Sync {
    async fn award(&self, new_tx: NewPointTransaction) -> Result<PointTransaction>;
    fn get_balance(&self, user_id: &str, as_of: Option<DateTime<Utc>>) -> Result<i64>;
    fn get_level_info(&self, user_id: &str) -> Result<LevelInfo>;
    fn get_history(
        &self,
        requester: &Requester,
        user_id: &str,
        page: i64,
        page_size: i64,
    ) -> Result<TransactionPage>;
}

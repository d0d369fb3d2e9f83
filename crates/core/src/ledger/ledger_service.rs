use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::auth::Requester;
use crate::errors::Result;
use crate::ledger::ledger_model::{
    level_for_balance, LevelInfo, NewPointTransaction, PointTransaction, TransactionPage,
};
use crate::ledger::ledger_traits::{LedgerRepositoryTrait, LedgerServiceTrait};

pub struct LedgerService {
    ledger_repo: Arc<dyn LedgerRepositoryTrait>,
}

impl LedgerService {
    pub fn new(ledger_repo: Arc<dyn LedgerRepositoryTrait>) -> Self {
        LedgerService { ledger_repo }
    }
}

#[async_trait]
impl LedgerServiceTrait for LedgerService {
    async fn award(&self, new_tx: NewPointTransaction) -> Result<PointTransaction> {
        new_tx.validate()?;
        log::debug!(
            "awarding {} points to user {} (source {}, reason '{}')",
            new_tx.amount,
            new_tx.user_id,
            new_tx.source,
            new_tx.reason
        );
        self.ledger_repo.insert_transaction(new_tx).await
    }

    fn get_balance(&self, user_id: &str, as_of: Option<DateTime<Utc>>) -> Result<i64> {
        self.ledger_repo.sum_amount_for_user(user_id, as_of)
    }

    fn get_level_info(&self, user_id: &str) -> Result<LevelInfo> {
        let balance = self.ledger_repo.sum_amount_for_user(user_id, None)?;
        Ok(level_for_balance(balance))
    }

    fn get_history(
        &self,
        requester: &Requester,
        user_id: &str,
        page: i64,
        page_size: i64,
    ) -> Result<TransactionPage> {
        requester.ensure_can_view(user_id)?;
        self.ledger_repo
            .get_transactions_page(user_id, page.max(0), page_size.clamp(1, 500))
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_types::{BigInt, Nullable};
use diesel::sqlite::SqliteConnection;
use uuid::Uuid;

use civicly_core::ledger::{
    LedgerRepositoryTrait, NewPointTransaction, PointTransaction, TransactionPage,
    TransactionPageMeta, UserPointsSum,
};
use civicly_core::Result;

use super::model::PointTransactionDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::point_transactions;
use crate::utils::{format_timestamp, parse_timestamp};

/// Repository for the append-only point ledger.
pub struct LedgerRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl LedgerRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        LedgerRepository { pool, writer }
    }
}

#[async_trait]
impl LedgerRepositoryTrait for LedgerRepository {
    async fn insert_transaction(&self, new_tx: NewPointTransaction) -> Result<PointTransaction> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<PointTransaction> {
                let tx_db = PointTransactionDB::from_new(
                    new_tx,
                    Uuid::new_v4().to_string(),
                    format_timestamp(Utc::now()),
                );
                let result_db = diesel::insert_into(point_transactions::table)
                    .values(&tx_db)
                    .returning(PointTransactionDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(PointTransaction::from(result_db))
            })
            .await
    }

    fn sum_amount_for_user(&self, user_id: &str, as_of: Option<DateTime<Utc>>) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        let cutoff = format_timestamp(as_of.unwrap_or_else(Utc::now));

        // Diesel types SUM over BigInt as Numeric; select the raw SQLite
        // integer sum instead so it loads straight into i64.
        let total: Option<i64> = point_transactions::table
            .filter(point_transactions::user_id.eq(user_id))
            .filter(point_transactions::created_at.le(cutoff))
            .select(diesel::dsl::sql::<Nullable<BigInt>>("SUM(amount)"))
            .first(&mut conn)
            .map_err(StorageError::from)?;

        Ok(total.unwrap_or(0))
    }

    fn get_transactions_page(
        &self,
        user_id: &str,
        page: i64,
        page_size: i64,
    ) -> Result<TransactionPage> {
        let mut conn = get_connection(&self.pool)?;

        let total_row_count: i64 = point_transactions::table
            .filter(point_transactions::user_id.eq(user_id))
            .count()
            .get_result(&mut conn)
            .map_err(StorageError::from)?;

        let rows = point_transactions::table
            .filter(point_transactions::user_id.eq(user_id))
            .order(point_transactions::created_at.desc())
            .limit(page_size)
            .offset(page * page_size)
            .select(PointTransactionDB::as_select())
            .load::<PointTransactionDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(TransactionPage {
            data: rows.into_iter().map(PointTransaction::from).collect(),
            meta: TransactionPageMeta { total_row_count },
        })
    }

    fn sum_points_by_user(
        &self,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
        user_filter: Option<&[String]>,
    ) -> Result<Vec<UserPointsSum>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = point_transactions::table
            .select((
                point_transactions::user_id,
                point_transactions::amount,
                point_transactions::created_at,
            ))
            .into_boxed();

        if let Some((start, end)) = range {
            query = query
                .filter(point_transactions::created_at.ge(format_timestamp(start)))
                .filter(point_transactions::created_at.lt(format_timestamp(end)));
        }
        if let Some(users) = user_filter {
            query = query.filter(point_transactions::user_id.eq_any(users.to_vec()));
        }

        let rows = query
            .load::<(String, i64, String)>(&mut conn)
            .map_err(StorageError::from)?;

        // Aggregated here rather than with GROUP BY so the window and user
        // filters stay composable on one boxed query.
        let mut sums: HashMap<String, (i64, DateTime<Utc>)> = HashMap::new();
        for (user, amount, created_at) in rows {
            let created_at = parse_timestamp(&created_at, "point_transactions.created_at");
            let entry = sums.entry(user).or_insert((0, created_at));
            entry.0 += amount;
            entry.1 = entry.1.min(created_at);
        }

        Ok(sums
            .into_iter()
            .map(|(user_id, (total, first_earned_at))| UserPointsSum {
                user_id,
                total,
                first_earned_at,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use chrono::Duration;
    use civicly_core::ledger::PointSource;
    use tempfile::tempdir;

    /// Creates a test repository backed by a temp-file database.
    /// Returns the repository and the temp dir (to keep it alive).
    async fn create_test_repository() -> (LedgerRepository, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let db_path_str = db_path.to_string_lossy().to_string();

        let pool = create_pool(&db_path_str).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());

        let repo = LedgerRepository::new(Arc::clone(&pool), writer);
        (repo, temp_dir)
    }

    fn new_tx(user_id: &str, amount: i64) -> NewPointTransaction {
        NewPointTransaction::new(user_id, amount, "test", PointSource::Manual)
    }

    #[tokio::test]
    async fn sum_is_signed_over_inserted_rows() {
        let (repo, _temp_dir) = create_test_repository().await;
        for amount in [25, -5, 100] {
            repo.insert_transaction(new_tx("u1", amount))
                .await
                .expect("insert failed");
        }
        repo.insert_transaction(new_tx("u2", 7))
            .await
            .expect("insert failed");

        assert_eq!(repo.sum_amount_for_user("u1", None).unwrap(), 120);
        assert_eq!(repo.sum_amount_for_user("u2", None).unwrap(), 7);
        assert_eq!(repo.sum_amount_for_user("nobody", None).unwrap(), 0);
    }

    #[tokio::test]
    async fn as_of_cutoff_excludes_later_rows() {
        let (repo, _temp_dir) = create_test_repository().await;
        repo.insert_transaction(new_tx("u1", 10))
            .await
            .expect("insert failed");
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let cutoff = Utc::now();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        repo.insert_transaction(new_tx("u1", 5))
            .await
            .expect("insert failed");

        assert_eq!(repo.sum_amount_for_user("u1", Some(cutoff)).unwrap(), 10);
        assert_eq!(repo.sum_amount_for_user("u1", None).unwrap(), 15);
    }

    #[tokio::test]
    async fn metadata_round_trips_through_storage() {
        let (repo, _temp_dir) = create_test_repository().await;
        let inserted = repo
            .insert_transaction(
                new_tx("u1", 15).with_metadata(serde_json::json!({ "eventId": "e1" })),
            )
            .await
            .expect("insert failed");
        assert_eq!(
            inserted.metadata,
            Some(serde_json::json!({ "eventId": "e1" }))
        );

        let page = repo.get_transactions_page("u1", 0, 10).unwrap();
        assert_eq!(page.data[0].metadata, inserted.metadata);
    }

    #[tokio::test]
    async fn pages_are_newest_first_with_total_count() {
        let (repo, _temp_dir) = create_test_repository().await;
        for amount in 1..=5 {
            repo.insert_transaction(new_tx("u1", amount))
                .await
                .expect("insert failed");
            // Distinct stored timestamps for a stable order.
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let page = repo.get_transactions_page("u1", 0, 2).unwrap();
        assert_eq!(page.meta.total_row_count, 5);
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].amount, 5);
        assert_eq!(page.data[1].amount, 4);

        let last = repo.get_transactions_page("u1", 2, 2).unwrap();
        assert_eq!(last.data.len(), 1);
        assert_eq!(last.data[0].amount, 1);
    }

    #[tokio::test]
    async fn window_sums_respect_range_and_filter() {
        let (repo, _temp_dir) = create_test_repository().await;
        repo.insert_transaction(new_tx("u1", 10))
            .await
            .expect("insert failed");
        repo.insert_transaction(new_tx("u1", 20))
            .await
            .expect("insert failed");
        repo.insert_transaction(new_tx("u2", 40))
            .await
            .expect("insert failed");

        let now = Utc::now();
        let sums = repo
            .sum_points_by_user(Some((now - Duration::hours(1), now + Duration::hours(1))), None)
            .unwrap();
        assert_eq!(sums.len(), 2);
        let u1 = sums.iter().find(|s| s.user_id == "u1").unwrap();
        assert_eq!(u1.total, 30);

        // A window in the past sees nothing.
        let empty = repo
            .sum_points_by_user(
                Some((now - Duration::days(2), now - Duration::days(1))),
                None,
            )
            .unwrap();
        assert!(empty.is_empty());

        // The candidate filter drops other users entirely.
        let filtered = repo
            .sum_points_by_user(None, Some(&["u2".to_string()]))
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].user_id, "u2");
        assert_eq!(filtered[0].total, 40);
    }
}

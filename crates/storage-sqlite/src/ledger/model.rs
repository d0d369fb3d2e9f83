//! Database models for the point ledger.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use civicly_core::ledger::{NewPointTransaction, PointSource, PointTransaction};

use crate::utils::{format_timestamp, parse_timestamp};

/// Database model for point transactions. Rows are only ever inserted.
#[derive(Queryable, Identifiable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::point_transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PointTransactionDB {
    pub id: String,
    pub user_id: String,
    pub amount: i64,
    pub reason: String,
    pub source: String,
    pub metadata: Option<String>,
    pub created_at: String,
}

impl PointTransactionDB {
    pub fn from_new(new_tx: NewPointTransaction, id: String, created_at: String) -> Self {
        PointTransactionDB {
            id,
            user_id: new_tx.user_id,
            amount: new_tx.amount,
            reason: new_tx.reason,
            source: new_tx.source.as_str().to_string(),
            metadata: new_tx.metadata.map(|m| m.to_string()),
            created_at,
        }
    }
}

impl From<PointTransactionDB> for PointTransaction {
    fn from(db: PointTransactionDB) -> Self {
        let source = PointSource::from_str(&db.source).unwrap_or_else(|e| {
            log::error!("Unknown point source on transaction {}: {}", db.id, e);
            PointSource::Other
        });
        let metadata = db.metadata.as_deref().and_then(|raw| {
            serde_json::from_str(raw)
                .map_err(|e| {
                    log::error!("Corrupt metadata on transaction {}: {}", db.id, e);
                    e
                })
                .ok()
        });
        PointTransaction {
            created_at: parse_timestamp(&db.created_at, "point_transactions.created_at"),
            id: db.id,
            user_id: db.user_id,
            amount: db.amount,
            reason: db.reason,
            source,
            metadata,
        }
    }
}

impl From<PointTransaction> for PointTransactionDB {
    fn from(tx: PointTransaction) -> Self {
        PointTransactionDB {
            id: tx.id,
            user_id: tx.user_id,
            amount: tx.amount,
            reason: tx.reason,
            source: tx.source.as_str().to_string(),
            metadata: tx.metadata.map(|m| m.to_string()),
            created_at: format_timestamp(tx.created_at),
        }
    }
}

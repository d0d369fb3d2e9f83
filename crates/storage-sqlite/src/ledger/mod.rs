//! SQLite storage implementation for the point ledger.

mod model;
mod repository;

pub use model::PointTransactionDB;
pub use repository::LedgerRepository;

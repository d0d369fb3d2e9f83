//! Point ledger module - domain models, service, and traits.

mod ledger_model;
mod ledger_service;
mod ledger_traits;


pub use ledger_model::{
    level_for_balance, LevelInfo, NewPointTransaction, PointSource, PointTransaction,
    TransactionPage, TransactionPageMeta, UserPointsSum,
};
pub use ledger_service::LedgerService;
pub use ledger_traits::{LedgerRepositoryTrait, LedgerServiceTrait};

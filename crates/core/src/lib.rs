//! Civicly Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic of the rewards and engagement
//! engine: the append-only point ledger, the achievement rule engine, the
//! goal tracker, the leaderboard and the geofenced check-in validator.
//! It is database-agnostic and defines repository traits that are
//! implemented by the `storage-sqlite` crate.

pub mod achievements;
pub mod auth;
pub mod checkins;
pub mod constants;
pub mod errors;
pub mod geo;
pub mod goals;
pub mod leaderboard;
pub mod ledger;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

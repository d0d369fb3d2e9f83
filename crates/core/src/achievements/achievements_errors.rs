use thiserror::Error;

/// Errors specific to the achievement rule engine.
///
/// A duplicate unlock attempt is deliberately absent: it is a successful
/// no-op, not an error.
#[derive(Error, Debug)]
pub enum AchievementError {
    #[error("Achievement not found: {0}")]
    NotFound(String),

    #[error("Invalid achievement definition: {0}")]
    InvalidDefinition(String),

    #[error("Invalid achievement catalog: {0}")]
    InvalidCatalog(String),
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GoalError {
    #[error("Goal not found: {0}")]
    NotFound(String),

    #[error("An active goal already exists: {0}")]
    AlreadyActive(String),

    #[error("Invalid goal: {0}")]
    Invalid(String),
}

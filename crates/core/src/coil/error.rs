use thiserror::Error;

/// Errors raised when a coil value violates a lifecycle invariant.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoilError {
    #[error("Weight must be greater than 0, got {0}")]
    NonPositiveWeight(f64),
    #[error("Length must be greater than 0, got {0}")]
    NonPositiveLength(f64),
    #[error("deleted_at must be later than created_at")]
    DeletedBeforeCreated,
}

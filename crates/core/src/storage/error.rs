use thiserror::Error;
use uuid::Uuid;

use crate::coil::CoilError;

/// Errors that can occur during repository operations.
///
/// `NotFound` and `InvalidValue` are client errors and are never retried;
/// `ConnectionFailed` and `QueryFailed` are storage failures that callers
/// may retry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("Coil not found: {id}")]
    NotFound { id: Uuid },
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
}

impl From<CoilError> for RepositoryError {
    fn from(err: CoilError) -> Self {
        RepositoryError::InvalidValue(err.to_string())
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

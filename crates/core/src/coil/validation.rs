//! Pure invariant checks, run before any write reaches storage.
//!
//! The SQLite schema mirrors these rules as CHECK constraints, but the checks
//! here are the primary enforcement point and produce the caller-facing
//! error messages.

use super::error::CoilError;
use super::types::{Coil, CoilPatch};

/// Validates measurements for a coil about to be created.
pub fn validate_for_create(weight: f64, length: f64) -> Result<(), CoilError> {
    if !(weight > 0.0) {
        return Err(CoilError::NonPositiveWeight(weight));
    }
    if !(length > 0.0) {
        return Err(CoilError::NonPositiveLength(length));
    }
    Ok(())
}

/// Validates a patch against the existing record it would be applied to.
///
/// Supplied measurements must stay positive, and a supplied `deleted_at`
/// must be strictly later than the existing `created_at`.
pub fn validate_for_update(existing: &Coil, patch: &CoilPatch) -> Result<(), CoilError> {
    if let Some(weight) = patch.weight {
        if !(weight > 0.0) {
            return Err(CoilError::NonPositiveWeight(weight));
        }
    }
    if let Some(length) = patch.length {
        if !(length > 0.0) {
            return Err(CoilError::NonPositiveLength(length));
        }
    }
    if let Some(deleted_at) = patch.deleted_at {
        if deleted_at <= existing.created_at {
            return Err(CoilError::DeletedBeforeCreated);
        }
    }
    Ok(())
}

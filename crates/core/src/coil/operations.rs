//! Lifecycle operations facade.
//!
//! `CoilService` is the single entry point the HTTP layer talks to. It runs
//! the pure invariant checks before any write reaches the repository and
//! never bypasses the storage abstraction.

use std::sync::Arc;

use uuid::Uuid;

use crate::storage::{CoilFilter, CoilRepository, Result, StatsFilter};

use super::types::{AggregateStats, Coil, CoilPatch, DeleteMode, NewCoil};
use super::validation::{validate_for_create, validate_for_update};

/// Use-case layer composing invariant enforcement with a storage backend.
#[derive(Clone)]
pub struct CoilService {
    repo: Arc<dyn CoilRepository>,
}

impl CoilService {
    pub fn new(repo: Arc<dyn CoilRepository>) -> Self {
        Self { repo }
    }

    /// Registers a new coil after validating its measurements.
    pub async fn register_coil(&self, weight: f64, length: f64) -> Result<Coil> {
        validate_for_create(weight, length)?;

        let coil = self.repo.create(NewCoil { weight, length }).await?;
        tracing::info!(id = %coil.id, weight, length, "Registered coil");
        Ok(coil)
    }

    /// Applies a partial update, validating the patch against the existing
    /// record first. The repository re-validates inside its transaction, so
    /// a concurrent writer cannot slip an invalid state past this check.
    /// An empty patch returns the stored coil without touching storage.
    pub async fn update_coil(&self, id: Uuid, patch: CoilPatch) -> Result<Coil> {
        let existing = self.repo.get_by_id(id).await?;
        if patch.is_empty() {
            return Ok(existing);
        }
        validate_for_update(&existing, &patch)?;

        let updated = self.repo.update(id, patch).await?;
        tracing::info!(id = %id, "Updated coil");
        Ok(updated)
    }

    /// Deletes a coil, returning it as it was immediately before the
    /// operation's irreversible effect.
    pub async fn delete_coil(&self, id: Uuid, mode: DeleteMode) -> Result<Coil> {
        let coil = match mode {
            DeleteMode::Soft => self.repo.soft_delete(id).await?,
            DeleteMode::Hard => self.repo.hard_delete(id).await?,
        };
        tracing::info!(id = %id, ?mode, "Deleted coil");
        Ok(coil)
    }

    /// Fetches a coil by id, soft-deleted or not.
    pub async fn get_coil(&self, id: Uuid) -> Result<Coil> {
        self.repo.get_by_id(id).await
    }

    /// Lists coils matching the filter.
    pub async fn list_coils(&self, filter: &CoilFilter) -> Result<Vec<Coil>> {
        self.repo.list(filter).await
    }

    /// Lists coils that have not been soft-deleted.
    pub async fn list_active(&self) -> Result<Vec<Coil>> {
        self.repo.list_active().await
    }

    /// Computes aggregate statistics over the filtered set.
    pub async fn get_stats(&self, filter: &StatsFilter) -> Result<AggregateStats> {
        self.repo.stats(filter).await
    }
}

use async_trait::async_trait;
use uuid::Uuid;

use crate::coil::{AggregateStats, Coil, CoilPatch, NewCoil};

use super::{CoilFilter, Result, StatsFilter};

/// Capability contract for coil storage backends.
///
/// Implementations translate these calls into their storage technology.
/// Operations that read the existing record before writing (`update`,
/// `soft_delete`, `hard_delete`) must perform the fetch and the write
/// atomically so concurrent calls on the same id cannot interleave between
/// validation and commit.
#[async_trait]
pub trait CoilRepository: Send + Sync {
    /// Persists a new coil with a generated id and `created_at`, returning
    /// the stored entity.
    async fn create(&self, new: NewCoil) -> Result<Coil>;

    /// Gets a coil by its id, soft-deleted or not.
    async fn get_by_id(&self, id: Uuid) -> Result<Coil>;

    /// Lists coils matching the filter. Order is not guaranteed.
    async fn list(&self, filter: &CoilFilter) -> Result<Vec<Coil>>;

    /// Lists coils whose `deleted_at` is unset.
    async fn list_active(&self) -> Result<Vec<Coil>>;

    /// Applies a partial update, re-validating invariants against the
    /// existing record before committing.
    async fn update(&self, id: Uuid, patch: CoilPatch) -> Result<Coil>;

    /// Stamps `deleted_at = now` on an active coil. Fails with `NotFound`
    /// if the coil is absent or already soft-deleted.
    async fn soft_delete(&self, id: Uuid) -> Result<Coil>;

    /// Removes the record permanently, returning the pre-deletion snapshot.
    async fn hard_delete(&self, id: Uuid) -> Result<Coil>;

    /// Computes aggregate statistics over the filtered set. An empty set
    /// yields zero-valued aggregates, not an error.
    async fn stats(&self, filter: &StatsFilter) -> Result<AggregateStats>;
}

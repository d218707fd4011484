//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use coilstock_core::coil::{validate_for_update, AggregateStats, Coil, CoilPatch, NewCoil};
use coilstock_core::storage::{CoilFilter, CoilRepository, RepositoryError, Result, StatsFilter};

/// In-memory storage backend.
///
/// Coils live in a HashMap behind `Arc<RwLock<_>>`. Write operations hold
/// the write lock across the whole fetch-validate-write sequence, so the
/// update/soft-delete race the SQLite backend solves with transactions
/// cannot occur here either. Data is lost when the repository is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    coils: Arc<RwLock<HashMap<Uuid, Coil>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CoilRepository for InMemoryRepository {
    async fn create(&self, new: NewCoil) -> Result<Coil> {
        let coil = Coil::new(new.weight, new.length);
        let mut coils = self.coils.write().await;
        coils.insert(coil.id, coil.clone());
        Ok(coil)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Coil> {
        let coils = self.coils.read().await;
        coils
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound { id })
    }

    async fn list(&self, filter: &CoilFilter) -> Result<Vec<Coil>> {
        let coils = self.coils.read().await;
        Ok(coils
            .values()
            .filter(|coil| filter.matches(coil))
            .cloned()
            .collect())
    }

    async fn list_active(&self) -> Result<Vec<Coil>> {
        let coils = self.coils.read().await;
        Ok(coils
            .values()
            .filter(|coil| coil.is_active())
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, patch: CoilPatch) -> Result<Coil> {
        let mut coils = self.coils.write().await;
        let existing = coils
            .get(&id)
            .ok_or(RepositoryError::NotFound { id })?;

        validate_for_update(existing, &patch)?;

        let updated = patch.apply_to(existing);
        coils.insert(id, updated.clone());
        Ok(updated)
    }

    async fn soft_delete(&self, id: Uuid) -> Result<Coil> {
        let mut coils = self.coils.write().await;
        let existing = coils
            .get(&id)
            .ok_or(RepositoryError::NotFound { id })?;

        // Already soft-deleted coils are not addressable here.
        if !existing.is_active() {
            return Err(RepositoryError::NotFound { id });
        }

        let deleted = existing.soft_deleted_now();
        coils.insert(id, deleted.clone());
        Ok(deleted)
    }

    async fn hard_delete(&self, id: Uuid) -> Result<Coil> {
        let mut coils = self.coils.write().await;
        coils.remove(&id).ok_or(RepositoryError::NotFound { id })
    }

    async fn stats(&self, filter: &StatsFilter) -> Result<AggregateStats> {
        let coils = self.coils.read().await;
        Ok(AggregateStats::from_coils(
            coils.values().filter(|coil| filter.matches(coil)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_coil(weight: f64, length: f64) -> NewCoil {
        NewCoil { weight, length }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let repo = InMemoryRepository::new();

        let created = repo.create(new_coil(100.0, 50.0)).await.unwrap();
        let fetched = repo.get_by_id(created.id).await.unwrap();

        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let repo = InMemoryRepository::new();
        let id = Uuid::new_v4();

        assert_eq!(
            repo.get_by_id(id).await,
            Err(RepositoryError::NotFound { id })
        );
    }

    #[tokio::test]
    async fn test_update_validates_against_existing() {
        let repo = InMemoryRepository::new();
        let coil = repo.create(new_coil(100.0, 50.0)).await.unwrap();

        let result = repo
            .update(
                coil.id,
                CoilPatch {
                    length: Some(0.0),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(RepositoryError::InvalidValue(_))));

        // Record unchanged after the rejected update.
        assert_eq!(repo.get_by_id(coil.id).await.unwrap().length, 50.0);
    }

    #[tokio::test]
    async fn test_soft_delete_excludes_from_active_but_keeps_record() {
        let repo = InMemoryRepository::new();
        let coil = repo.create(new_coil(100.0, 50.0)).await.unwrap();

        let deleted = repo.soft_delete(coil.id).await.unwrap();
        assert!(deleted.deleted_at.unwrap() > deleted.created_at);

        assert!(repo.list_active().await.unwrap().is_empty());
        assert!(repo.get_by_id(coil.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_soft_deleted_coil_keeps_deleted_at() {
        let repo = InMemoryRepository::new();
        let coil = repo.create(new_coil(100.0, 50.0)).await.unwrap();
        let deleted = repo.soft_delete(coil.id).await.unwrap();

        // Measurements of a soft-deleted coil stay editable.
        let updated = repo
            .update(
                coil.id,
                CoilPatch {
                    weight: Some(80.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.weight, 80.0);
        assert_eq!(updated.deleted_at, deleted.deleted_at);
        assert!(!updated.is_active());
    }

    #[tokio::test]
    async fn test_soft_delete_twice_is_not_found() {
        let repo = InMemoryRepository::new();
        let coil = repo.create(new_coil(100.0, 50.0)).await.unwrap();

        repo.soft_delete(coil.id).await.unwrap();
        assert_eq!(
            repo.soft_delete(coil.id).await,
            Err(RepositoryError::NotFound { id: coil.id })
        );
    }

    #[tokio::test]
    async fn test_hard_delete_returns_snapshot() {
        let repo = InMemoryRepository::new();
        let coil = repo.create(new_coil(100.0, 50.0)).await.unwrap();

        let snapshot = repo.hard_delete(coil.id).await.unwrap();
        assert_eq!(snapshot, coil);
        assert_eq!(
            repo.get_by_id(coil.id).await,
            Err(RepositoryError::NotFound { id: coil.id })
        );
    }

    #[tokio::test]
    async fn test_list_applies_filter() {
        let repo = InMemoryRepository::new();
        let heavy = repo.create(new_coil(200.0, 10.0)).await.unwrap();
        repo.create(new_coil(20.0, 90.0)).await.unwrap();

        let filter = CoilFilter {
            weight_gte: Some(100.0),
            ..Default::default()
        };
        let matched = repo.list(&filter).await.unwrap();

        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, heavy.id);
    }

    #[tokio::test]
    async fn test_stats_empty_and_populated() {
        let repo = InMemoryRepository::new();

        let empty = repo.stats(&StatsFilter::default()).await.unwrap();
        assert_eq!(empty, AggregateStats::default());

        repo.create(new_coil(100.0, 50.0)).await.unwrap();
        repo.create(new_coil(60.0, 30.0)).await.unwrap();

        let stats = repo.stats(&StatsFilter::default()).await.unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.total_weight, 160.0);
        assert_eq!(stats.max_length, 50.0);
        // Both registered on the same day, none soft-deleted.
        assert_eq!(stats.max_count_day, stats.min_count_day);
        assert!(stats.max_count_day.is_some());
        assert!(stats.max_duration_seconds.is_none());
    }
}

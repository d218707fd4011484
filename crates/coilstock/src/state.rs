//! Application state with repository-based storage.
//!
//! The state is cloned into every request handler and carries the coil
//! lifecycle service, which wraps the selected storage backend behind the
//! `CoilRepository` trait object.

use std::sync::Arc;

use anyhow::Result;

use coilstock_core::coil::CoilService;
use coilstock_core::storage::CoilRepository;

use crate::config::Config;
use crate::storage::{InMemoryRepository, SqliteRepository};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Coil lifecycle operations, backed by the configured repository.
    pub coils: CoilService,
}

impl AppState {
    /// Creates state over an explicit repository.
    pub fn new(repo: Arc<dyn CoilRepository>) -> Self {
        Self {
            coils: CoilService::new(repo),
        }
    }

    /// Creates state backed by the SQLite database named in `config`.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let repo = SqliteRepository::new(&config.sqlite_path).await?;
        tracing::info!(path = %config.sqlite_path, "Opened SQLite store");
        Ok(Self::new(Arc::new(repo)))
    }

    /// Creates state backed by an in-memory store. Data does not survive
    /// the process.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRepository::new()))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coilstock_core::coil::{CoilPatch, DeleteMode};
    use coilstock_core::storage::{RepositoryError, StatsFilter};

    #[tokio::test]
    async fn test_service_lifecycle_through_in_memory_state() {
        let state = AppState::in_memory();
        let service = &state.coils;

        let coil = service.register_coil(100.0, 50.0).await.unwrap();
        assert!(coil.is_active());

        let updated = service
            .update_coil(
                coil.id,
                CoilPatch {
                    weight: Some(80.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.weight, 80.0);
        assert_eq!(updated.length, 50.0);

        let deleted = service.delete_coil(coil.id, DeleteMode::Soft).await.unwrap();
        assert!(deleted.deleted_at.unwrap() > deleted.created_at);

        // Absent from active listings, still retrievable by id.
        assert!(service.list_active().await.unwrap().is_empty());
        assert!(service.get_coil(coil.id).await.is_ok());

        let stats = service.get_stats(&StatsFilter::default()).await.unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.soft_deleted, 1);

        // Hard delete returns the snapshot and removes the record.
        let snapshot = service.delete_coil(coil.id, DeleteMode::Hard).await.unwrap();
        assert_eq!(snapshot.id, coil.id);
        assert_eq!(
            service.get_coil(coil.id).await,
            Err(RepositoryError::NotFound { id: coil.id })
        );
    }

    #[tokio::test]
    async fn test_service_empty_update_is_a_no_op() {
        let state = AppState::in_memory();
        let coil = state.coils.register_coil(100.0, 50.0).await.unwrap();

        let unchanged = state
            .coils
            .update_coil(coil.id, CoilPatch::default())
            .await
            .unwrap();
        assert_eq!(unchanged, coil);

        // A missing id still reports NotFound.
        let id = uuid::Uuid::new_v4();
        assert_eq!(
            state.coils.update_coil(id, CoilPatch::default()).await,
            Err(RepositoryError::NotFound { id })
        );
    }

    #[tokio::test]
    async fn test_service_rejects_invalid_registration() {
        let state = AppState::in_memory();

        let result = state.coils.register_coil(-1.0, 50.0).await;
        assert!(matches!(result, Err(RepositoryError::InvalidValue(_))));

        // Nothing was persisted.
        assert!(state.coils.list_active().await.unwrap().is_empty());
    }
}

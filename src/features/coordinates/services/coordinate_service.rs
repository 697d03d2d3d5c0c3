use std::sync::Arc;

use mongodb::bson::DateTime;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::coordinates::dtos::{CoordinatePayloadDto, CoordinateResponseDto};
use crate::features::coordinates::models::{CoordinateChanges, CoordinateDocument};
use crate::modules::store::CoordinateStore;
use crate::shared::constants::LIST_LIMIT;

/// Service for coordinate operations
pub struct CoordinateService {
    store: Arc<dyn CoordinateStore>,
}

impl CoordinateService {
    pub fn new(store: Arc<dyn CoordinateStore>) -> Self {
        Self { store }
    }

    /// Create a coordinate with a fresh id and equal timestamps
    pub async fn create(&self, dto: CoordinatePayloadDto) -> Result<CoordinateResponseDto> {
        let now = DateTime::now();
        let document = CoordinateDocument {
            id: Uuid::new_v4().to_string(),
            lat: dto.lat,
            lng: dto.lng,
            notes: dto.notes,
            created_at: now,
            updated_at: now,
        };

        self.store.insert(&document).await.map_err(|e| {
            tracing::error!("Failed to create coordinate: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Coordinate created: id={}", document.id);

        Ok(document.into())
    }

    pub async fn get(&self, id: &str) -> Result<CoordinateResponseDto> {
        let document = self.store.find_by_id(id).await.map_err(|e| {
            tracing::error!("Failed to get coordinate: {:?}", e);
            AppError::Database(e)
        })?;

        document.map(|d| d.into()).ok_or_else(|| not_found(id))
    }

    /// At most `LIST_LIMIT` coordinates, in storage order
    pub async fn list(&self) -> Result<Vec<CoordinateResponseDto>> {
        let documents = self.store.list(LIST_LIMIT).await.map_err(|e| {
            tracing::error!("Failed to list coordinates: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(documents.into_iter().map(|d| d.into()).collect())
    }

    /// Replace lat/lng/notes and refresh `updated_at`.
    ///
    /// Zero modified documents is reported as not found, which includes the
    /// case where the stored values already equal the new ones.
    pub async fn update(
        &self,
        id: &str,
        dto: CoordinatePayloadDto,
    ) -> Result<CoordinateResponseDto> {
        let changes = CoordinateChanges {
            lat: dto.lat,
            lng: dto.lng,
            notes: dto.notes,
            updated_at: DateTime::now(),
        };

        let modified = self.store.update(id, &changes).await.map_err(|e| {
            tracing::error!("Failed to update coordinate: {:?}", e);
            AppError::Database(e)
        })?;

        if modified == 0 {
            return Err(not_found(id));
        }

        tracing::info!("Coordinate updated: id={}", id);

        let document = self.store.find_by_id(id).await.map_err(|e| {
            tracing::error!("Failed to reload updated coordinate: {:?}", e);
            AppError::Database(e)
        })?;

        // Deleted between the update and the re-read
        document.map(|d| d.into()).ok_or_else(|| {
            AppError::Internal(format!("Coordinate '{}' vanished after update", id))
        })
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let deleted = self.store.delete(id).await.map_err(|e| {
            tracing::error!("Failed to delete coordinate: {:?}", e);
            AppError::Database(e)
        })?;

        if deleted == 0 {
            return Err(not_found(id));
        }

        tracing::info!("Coordinate deleted: id={}", id);
        Ok(())
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Coordinate '{}' not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::store::{InMemoryCoordinateStore, StoreResult};
    use async_trait::async_trait;

    fn payload(lat: f64, lng: f64, notes: Option<&str>) -> CoordinatePayloadDto {
        CoordinatePayloadDto {
            lat,
            lng,
            notes: notes.map(str::to_string),
        }
    }

    fn service() -> CoordinateService {
        CoordinateService::new(Arc::new(InMemoryCoordinateStore::new()))
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_equal_timestamps() {
        let service = service();

        let created = service
            .create(payload(51.5, -0.12, Some("London")))
            .await
            .unwrap();

        assert!(Uuid::parse_str(&created.id).is_ok());
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(created.notes.as_deref(), Some("London"));
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_created_at() {
        let service = service();
        let created = service.create(payload(1.0, 2.0, None)).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let updated = service
            .update(&created.id, payload(3.0, 4.0, Some("moved")))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!((updated.lat, updated.lng), (3.0, 4.0));
        assert_eq!(updated.notes.as_deref(), Some("moved"));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let result = service().update("missing", payload(1.0, 1.0, None)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    /// Store that matches documents but never modifies them, as MongoDB
    /// does when every `$set` value equals the stored one.
    struct UnchangedStore(InMemoryCoordinateStore);

    #[async_trait]
    impl CoordinateStore for UnchangedStore {
        async fn insert(&self, document: &CoordinateDocument) -> StoreResult<()> {
            self.0.insert(document).await
        }

        async fn find_by_id(&self, id: &str) -> StoreResult<Option<CoordinateDocument>> {
            self.0.find_by_id(id).await
        }

        async fn list(&self, limit: i64) -> StoreResult<Vec<CoordinateDocument>> {
            self.0.list(limit).await
        }

        async fn update(&self, _id: &str, _changes: &CoordinateChanges) -> StoreResult<u64> {
            Ok(0)
        }

        async fn delete(&self, id: &str) -> StoreResult<u64> {
            self.0.delete(id).await
        }
    }

    #[tokio::test]
    async fn test_update_with_nothing_modified_reports_not_found() {
        let service = CoordinateService::new(Arc::new(UnchangedStore(
            InMemoryCoordinateStore::new(),
        )));
        let created = service.create(payload(1.0, 2.0, None)).await.unwrap();

        let result = service.update(&created.id, payload(1.0, 2.0, None)).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(service.get(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_storage_rejection_surfaces_as_database_error() {
        let service = service();

        // Bypasses DTO validation; the store's schema check still refuses it
        let result = service.create(payload(95.0, 0.0, None)).await;

        assert!(matches!(result, Err(AppError::Database(_))));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let service = service();
        let created = service.create(payload(0.0, 0.0, None)).await.unwrap();

        service.delete(&created.id).await.unwrap();

        assert!(matches!(
            service.get(&created.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(&created.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}

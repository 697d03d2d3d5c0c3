use async_trait::async_trait;
use mongodb::bson;
use tokio::sync::RwLock;

use super::{CoordinateStore, StoreError, StoreResult};
use crate::features::coordinates::models::{CoordinateChanges, CoordinateDocument};
use crate::features::coordinates::schema::check_document;

/// Process-local store used as a substitute backend in tests.
///
/// Documents keep insertion order. Every write is checked against the same
/// rule table the MongoDB collection validator is built from, so invalid
/// documents are refused here exactly as the database would refuse them.
#[derive(Default)]
pub struct InMemoryCoordinateStore {
    documents: RwLock<Vec<CoordinateDocument>>,
}

impl InMemoryCoordinateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    fn validate(document: &CoordinateDocument) -> StoreResult<()> {
        let bson = bson::to_document(document)
            .map_err(|e| StoreError::DocumentValidation(e.to_string()))?;
        check_document(&bson).map_err(|e| StoreError::DocumentValidation(e.to_string()))
    }
}

#[async_trait]
impl CoordinateStore for InMemoryCoordinateStore {
    async fn insert(&self, document: &CoordinateDocument) -> StoreResult<()> {
        Self::validate(document)?;
        self.documents.write().await.push(document.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<CoordinateDocument>> {
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|d| d.id == id).cloned())
    }

    async fn list(&self, limit: i64) -> StoreResult<Vec<CoordinateDocument>> {
        let limit = usize::try_from(limit).unwrap_or(0);
        let documents = self.documents.read().await;
        Ok(documents.iter().take(limit).cloned().collect())
    }

    async fn update(&self, id: &str, changes: &CoordinateChanges) -> StoreResult<u64> {
        let mut documents = self.documents.write().await;
        let Some(existing) = documents.iter_mut().find(|d| d.id == id) else {
            return Ok(0);
        };

        let mut updated = existing.clone();
        changes.apply_to(&mut updated);
        Self::validate(&updated)?;

        if updated == *existing {
            return Ok(0);
        }
        *existing = updated;
        Ok(1)
    }

    async fn delete(&self, id: &str) -> StoreResult<u64> {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|d| d.id != id);
        Ok((before - documents.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::DateTime;

    fn document(id: &str, lat: f64, lng: f64) -> CoordinateDocument {
        let now = DateTime::from_millis(1_700_000_000_000);
        CoordinateDocument {
            id: id.to_string(),
            lat,
            lng,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_schema_violation() {
        let store = InMemoryCoordinateStore::new();

        let result = store.insert(&document("a", 95.0, 0.0)).await;

        assert!(matches!(result, Err(StoreError::DocumentValidation(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order_and_limit() {
        let store = InMemoryCoordinateStore::new();
        for i in 0..5 {
            store
                .insert(&document(&i.to_string(), i as f64, 0.0))
                .await
                .unwrap();
        }

        let listed = store.list(3).await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|d| d.id.as_str()).collect();

        assert_eq!(ids, vec!["0", "1", "2"]);
    }

    #[tokio::test]
    async fn test_update_reports_zero_when_nothing_changes() {
        let store = InMemoryCoordinateStore::new();
        let original = document("a", 10.0, 20.0);
        store.insert(&original).await.unwrap();

        let same = CoordinateChanges {
            lat: original.lat,
            lng: original.lng,
            notes: original.notes.clone(),
            updated_at: original.updated_at,
        };

        assert_eq!(store.update("a", &same).await.unwrap(), 0);
        assert_eq!(store.update("missing", &same).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_rejects_schema_violation_and_keeps_document() {
        let store = InMemoryCoordinateStore::new();
        let original = document("a", 10.0, 20.0);
        store.insert(&original).await.unwrap();

        let changes = CoordinateChanges {
            lat: 10.0,
            lng: 200.0,
            notes: None,
            updated_at: DateTime::from_millis(1_700_000_000_500),
        };

        assert!(store.update("a", &changes).await.is_err());
        assert_eq!(store.find_by_id("a").await.unwrap(), Some(original));
    }

    #[tokio::test]
    async fn test_delete_counts() {
        let store = InMemoryCoordinateStore::new();
        store.insert(&document("a", 0.0, 0.0)).await.unwrap();

        assert_eq!(store.delete("a").await.unwrap(), 1);
        assert_eq!(store.delete("a").await.unwrap(), 0);
        assert_eq!(store.len().await, 0);
    }
}

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Database};

use super::{CoordinateStore, StoreResult};
use crate::features::coordinates::models::{CoordinateChanges, CoordinateDocument};

/// MongoDB-backed store. Cloning shares the client's connection pool.
#[derive(Clone)]
pub struct MongoCoordinateStore {
    collection: Collection<CoordinateDocument>,
}

impl MongoCoordinateStore {
    pub fn new(db: &Database, collection: &str) -> Self {
        Self {
            collection: db.collection(collection),
        }
    }
}

#[async_trait]
impl CoordinateStore for MongoCoordinateStore {
    async fn insert(&self, document: &CoordinateDocument) -> StoreResult<()> {
        self.collection.insert_one(document).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<CoordinateDocument>> {
        Ok(self.collection.find_one(doc! { "id": id }).await?)
    }

    async fn list(&self, limit: i64) -> StoreResult<Vec<CoordinateDocument>> {
        let cursor = self.collection.find(doc! {}).limit(limit).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update(&self, id: &str, changes: &CoordinateChanges) -> StoreResult<u64> {
        let result = self
            .collection
            .update_one(doc! { "id": id }, changes.to_update_document())
            .await?;
        Ok(result.modified_count)
    }

    async fn delete(&self, id: &str) -> StoreResult<u64> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count)
    }
}

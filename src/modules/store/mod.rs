//! Coordinate storage
//!
//! Handlers never talk to MongoDB directly: they receive an
//! `Arc<dyn CoordinateStore>` at router construction. Production wires
//! [`MongoCoordinateStore`]; tests wire [`InMemoryCoordinateStore`].

mod memory_store;
mod mongo_store;

use async_trait::async_trait;
use thiserror::Error;

use crate::features::coordinates::models::{CoordinateChanges, CoordinateDocument};

pub use memory_store::InMemoryCoordinateStore;
pub use mongo_store::MongoCoordinateStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Document failed validation: {0}")]
    DocumentValidation(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Single-collection document storage for coordinates.
///
/// Every method is one storage round trip. Nothing here retries.
#[async_trait]
pub trait CoordinateStore: Send + Sync {
    /// Insert a new document. Ok means the write was acknowledged.
    async fn insert(&self, document: &CoordinateDocument) -> StoreResult<()>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<CoordinateDocument>>;

    /// Up to `limit` documents in the backend's natural order
    async fn list(&self, limit: i64) -> StoreResult<Vec<CoordinateDocument>>;

    /// Apply `changes` to the document with `id`, returning the number of
    /// documents actually modified (0 when absent or unchanged).
    async fn update(&self, id: &str, changes: &CoordinateChanges) -> StoreResult<u64>;

    /// Returns the number of documents deleted
    async fn delete(&self, id: &str) -> StoreResult<u64>;
}

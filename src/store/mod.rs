use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// The BSON document type all store operations speak.
pub type Document = bson::Document;

/// Hard cap on the number of documents a single `find_many` returns.
pub const FIND_CAP: i64 = 1000;

/// StoreError
///
/// Failures surfaced by a document store backend. These never leak backend
/// detail to API clients; the error layer maps them to an opaque 500.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection failed: {0}")]
    Connection(String),

    #[error("database operation failed: {0}")]
    Backend(String),

    #[error("document serialization failed: {0}")]
    Serialization(String),
}

/// DocumentCollection
///
/// One named collection of BSON documents. Implementations must uphold the
/// id contract: documents returned by reads never contain an `_id` field;
/// the id assigned at insert is returned separately and can be matched later
/// with an `{"_id": <id>}` filter.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Inserts a document and returns the store-assigned opaque id.
    async fn insert_one(&self, doc: Document) -> Result<String, StoreError>;

    /// Returns the first document matching `filter`, if any.
    async fn find_one(&self, filter: Document) -> Result<Option<Document>, StoreError>;

    /// Returns all documents matching `filter`, optionally sorted by a
    /// `{field: 1|-1}` sort document, capped at [`FIND_CAP`] results.
    async fn find_many(
        &self,
        filter: Document,
        sort: Option<Document>,
    ) -> Result<Vec<Document>, StoreError>;

    /// Applies `update` ($set / $inc / $addToSet) to the first document
    /// matching `filter`. Matching nothing is not an error.
    async fn update_one(&self, filter: Document, update: Document) -> Result<(), StoreError>;

    /// Counts documents matching `filter`.
    async fn count(&self, filter: Document) -> Result<u64, StoreError>;
}

/// DocumentStore
///
/// A handle to a document database that can hand out collection handles.
/// Collections spring into existence on first use; `collection` never fails.
pub trait DocumentStore: Send + Sync {
    fn collection(&self, name: &str) -> Arc<dyn DocumentCollection>;
}

/// Shared, thread-safe handle to any store backend.
pub type DynDocumentStore = Arc<dyn DocumentStore>;

use std::sync::Arc;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Bson};
use futures_util::TryStreamExt;
use mongodb::{options::IndexOptions, Client, Database, IndexModel};

use super::{Document, DocumentCollection, DocumentStore, StoreError, FIND_CAP};

/// MongoStore
///
/// The production store backend. Connecting verifies the deployment with a
/// `ping` so a bad `MONGO_URL` fails at startup instead of on first request.
#[derive(Debug, Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Connects to the deployment at `url` and selects `db_name`.
    ///
    /// Short driver timeouts are appended to the URI so an unreachable server
    /// is reported within seconds rather than the driver's 30s default.
    pub async fn connect(url: &str, db_name: &str) -> Result<Self, StoreError> {
        let separator = if url.contains('?') { '&' } else { '?' };
        let uri = format!("{url}{separator}serverSelectionTimeoutMS=3000&connectTimeoutMS=3000");

        let client = Client::with_uri_str(&uri)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let db = client.database(db_name);
        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self { db })
    }

    /// Creates the unique indexes the application relies on.
    ///
    /// Idempotent: creating an index that already exists is a no-op on the
    /// server side.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let unique = IndexOptions::builder().unique(true).build();

        self.db
            .collection::<Document>("users")
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(unique.clone())
                    .build(),
            )
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        self.db
            .collection::<Document>("universes")
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "title": 1 })
                    .options(unique.clone())
                    .build(),
            )
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        self.db
            .collection::<Document>("stories")
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "universe_id": 1, "chapter_number": 1 })
                    .options(unique)
                    .build(),
            )
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(())
    }
}

impl DocumentStore for MongoStore {
    fn collection(&self, name: &str) -> Arc<dyn DocumentCollection> {
        Arc::new(MongoCollection {
            inner: self.db.collection::<Document>(name),
        })
    }
}

struct MongoCollection {
    inner: mongodb::Collection<Document>,
}

/// Rewrites a string `_id` filter value into a real ObjectId so callers can
/// match on the hex ids handed out at insert. Unparseable values are left as
/// strings and simply match nothing.
fn normalize_id_filter(mut filter: Document) -> Document {
    if let Some(Bson::String(raw)) = filter.get("_id") {
        if let Ok(oid) = ObjectId::parse_str(raw) {
            filter.insert("_id", Bson::ObjectId(oid));
        }
    }
    filter
}

/// Strips the driver-assigned `_id` so returned documents deserialize into
/// application models without an id field.
fn strip_id(mut doc: Document) -> Document {
    doc.remove("_id");
    doc
}

#[async_trait]
impl DocumentCollection for MongoCollection {
    async fn insert_one(&self, doc: Document) -> Result<String, StoreError> {
        let result = self
            .inner
            .insert_one(doc)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let id = match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            Bson::String(s) => s,
            other => other.to_string(),
        };
        Ok(id)
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, StoreError> {
        let found = self
            .inner
            .find_one(normalize_id_filter(filter))
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(found.map(strip_id))
    }

    async fn find_many(
        &self,
        filter: Document,
        sort: Option<Document>,
    ) -> Result<Vec<Document>, StoreError> {
        let mut find = self.inner.find(normalize_id_filter(filter)).limit(FIND_CAP);
        if let Some(sort) = sort {
            find = find.sort(sort);
        }

        let mut cursor = find
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let mut docs = Vec::new();
        while let Some(doc) = cursor
            .try_next()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
        {
            docs.push(strip_id(doc));
        }
        Ok(docs)
    }

    async fn update_one(&self, filter: Document, update: Document) -> Result<(), StoreError> {
        // Matching zero documents is deliberately silent; callers that need
        // existence checks do them with find/count first.
        self.inner
            .update_one(normalize_id_filter(filter), update)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn count(&self, filter: Document) -> Result<u64, StoreError> {
        self.inner
            .count_documents(normalize_id_filter(filter))
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

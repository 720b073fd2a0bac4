use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{
    Challenge, Character, Club, ForumPost, ForumReply, LoreEntry, Story, Universe, User,
};
use crate::store::{Document, DocumentCollection, DynDocumentStore, StoreError};

/// Repository
///
/// A typed view over one store collection. Serialization happens at this
/// boundary: application models go in and come out as themselves, BSON
/// documents exist only inside. Handlers never touch `DocumentCollection`
/// directly.
pub struct Repository<T> {
    collection: Arc<dyn DocumentCollection>,
    _marker: PhantomData<fn() -> T>,
}

// Manual impl: a repository handle is clonable regardless of whether T is.
impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            collection: Arc::clone(&self.collection),
            _marker: PhantomData,
        }
    }
}

impl<T> Repository<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    fn new(store: &DynDocumentStore, name: &str) -> Self {
        Self {
            collection: store.collection(name),
            _marker: PhantomData,
        }
    }

    /// Inserts a record and returns the store-assigned id.
    pub async fn insert(&self, record: &T) -> Result<String, StoreError> {
        let doc =
            bson::to_document(record).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.collection.insert_one(doc).await
    }

    /// Returns the first record matching `filter`, if any.
    pub async fn find_one(&self, filter: Document) -> Result<Option<T>, StoreError> {
        let found = self.collection.find_one(filter).await?;
        found
            .map(|doc| {
                bson::from_document(doc).map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .transpose()
    }

    /// Returns all records matching `filter`, optionally sorted by a
    /// `{field: 1|-1}` document.
    pub async fn find_many(
        &self,
        filter: Document,
        sort: Option<Document>,
    ) -> Result<Vec<T>, StoreError> {
        let docs = self.collection.find_many(filter, sort).await?;
        docs.into_iter()
            .map(|doc| {
                bson::from_document(doc).map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .collect()
    }

    /// Applies `update` to the first record matching `filter`. Matching
    /// nothing is not an error; callers that need an existence check do a
    /// find or count first.
    pub async fn update_one(&self, filter: Document, update: Document) -> Result<(), StoreError> {
        self.collection.update_one(filter, update).await
    }

    /// Counts records matching `filter`.
    pub async fn count(&self, filter: Document) -> Result<u64, StoreError> {
        self.collection.count(filter).await
    }
}

/// Repositories
///
/// The full set of typed collections the application works with, built once
/// at startup from a single store handle and cloned into application state.
#[derive(Clone)]
pub struct Repositories {
    pub users: Repository<User>,
    pub universes: Repository<Universe>,
    pub stories: Repository<Story>,
    pub characters: Repository<Character>,
    pub lore: Repository<LoreEntry>,
    pub clubs: Repository<Club>,
    pub forum_posts: Repository<ForumPost>,
    pub forum_replies: Repository<ForumReply>,
    pub challenges: Repository<Challenge>,
}

impl Repositories {
    pub fn new(store: &DynDocumentStore) -> Self {
        Self {
            users: Repository::new(store, "users"),
            universes: Repository::new(store, "universes"),
            stories: Repository::new(store, "stories"),
            characters: Repository::new(store, "characters"),
            lore: Repository::new(store, "lore"),
            clubs: Repository::new(store, "clubs"),
            forum_posts: Repository::new(store, "forum_posts"),
            forum_replies: Repository::new(store, "forum_replies"),
            challenges: Repository::new(store, "challenges"),
        }
    }
}

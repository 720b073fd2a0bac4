use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use bson::{oid::ObjectId, Bson};

use super::{Document, DocumentCollection, DocumentStore, StoreError, FIND_CAP};

type Collections = Arc<RwLock<HashMap<String, Vec<StoredDoc>>>>;

/// One stored record. The id lives alongside the document, never inside it,
/// which keeps reads naturally free of `_id` fields.
#[derive(Debug, Clone)]
struct StoredDoc {
    id: String,
    doc: Document,
}

/// MemoryStore
///
/// An in-process store backend with the same observable behavior as
/// [`super::MongoStore`] for the operation subset this application uses.
/// Used by the test suites; cloning shares the underlying data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Collections,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn collection(&self, name: &str) -> Arc<dyn DocumentCollection> {
        Arc::new(MemoryCollection {
            name: name.to_string(),
            collections: Arc::clone(&self.collections),
        })
    }
}

struct MemoryCollection {
    name: String,
    collections: Collections,
}

/// Numeric view of a BSON value, for cross-type comparisons the way the
/// server does them (an Int32 filter must match an Int64 field).
fn bson_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(*n as f64),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

fn bson_int(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(n) => Some(*n as i64),
        Bson::Int64(n) => Some(*n),
        _ => None,
    }
}

fn bson_eq(a: &Bson, b: &Bson) -> bool {
    match (bson_number(a), bson_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Comparison rank across BSON types, mirroring the server's canonical sort
/// order for the types this application stores.
fn type_rank(value: Option<&Bson>) -> u8 {
    match value {
        None | Some(Bson::Null) => 0,
        Some(Bson::Int32(_)) | Some(Bson::Int64(_)) | Some(Bson::Double(_)) => 1,
        Some(Bson::String(_)) => 2,
        Some(Bson::Boolean(_)) => 3,
        Some(_) => 4,
    }
}

fn cmp_bson(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }
    match (a, b) {
        (Some(x), Some(y)) => {
            if let (Some(m), Some(n)) = (bson_number(x), bson_number(y)) {
                return m.partial_cmp(&n).unwrap_or(Ordering::Equal);
            }
            match (x, y) {
                (Bson::String(s), Bson::String(t)) => s.cmp(t),
                (Bson::Boolean(s), Bson::Boolean(t)) => s.cmp(t),
                _ => Ordering::Equal,
            }
        }
        _ => Ordering::Equal,
    }
}

fn matches(filter: &Document, stored: &StoredDoc) -> bool {
    for (key, expected) in filter.iter() {
        if key == "_id" {
            match expected {
                Bson::String(id) if *id == stored.id => continue,
                _ => return false,
            }
        }
        match stored.doc.get(key) {
            Some(actual) if bson_eq(actual, expected) => continue,
            _ => return false,
        }
    }
    true
}

/// Applies a `$set` / `$inc` / `$addToSet` update document in place.
fn apply_update(target: &mut Document, update: &Document) -> Result<(), StoreError> {
    for (operator, operand) in update.iter() {
        let Bson::Document(fields) = operand else {
            return Err(StoreError::Backend(format!(
                "malformed update document under {operator}"
            )));
        };
        match operator.as_str() {
            "$set" => {
                for (key, value) in fields.iter() {
                    target.insert(key.clone(), value.clone());
                }
            }
            "$inc" => {
                for (key, value) in fields.iter() {
                    let step = bson_int(value).ok_or_else(|| {
                        StoreError::Backend(format!("non-integer $inc for field {key}"))
                    })?;
                    let current = target.get(key).and_then(bson_int).unwrap_or(0);
                    target.insert(key.clone(), Bson::Int64(current + step));
                }
            }
            "$addToSet" => {
                for (key, value) in fields.iter() {
                    let entry = target
                        .entry(key.clone())
                        .or_insert_with(|| Bson::Array(Vec::new()));
                    let Bson::Array(items) = entry else {
                        return Err(StoreError::Backend(format!(
                            "$addToSet target {key} is not an array"
                        )));
                    };
                    if !items.iter().any(|existing| bson_eq(existing, value)) {
                        items.push(value.clone());
                    }
                }
            }
            other => {
                return Err(StoreError::Backend(format!(
                    "unsupported update operator: {other}"
                )));
            }
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn insert_one(&self, mut doc: Document) -> Result<String, StoreError> {
        // Stored documents never carry an inline _id; the id lives alongside.
        doc.remove("_id");
        let id = ObjectId::new().to_hex();

        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Backend("collection lock poisoned".to_string()))?;
        collections
            .entry(self.name.clone())
            .or_default()
            .push(StoredDoc {
                id: id.clone(),
                doc,
            });
        Ok(id)
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::Backend("collection lock poisoned".to_string()))?;
        let found = collections
            .get(&self.name)
            .and_then(|docs| docs.iter().find(|stored| matches(&filter, stored)))
            .map(|stored| stored.doc.clone());
        Ok(found)
    }

    async fn find_many(
        &self,
        filter: Document,
        sort: Option<Document>,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::Backend("collection lock poisoned".to_string()))?;

        let mut selected: Vec<Document> = collections
            .get(&self.name)
            .map(|docs| {
                docs.iter()
                    .filter(|stored| matches(&filter, stored))
                    .map(|stored| stored.doc.clone())
                    .collect()
            })
            .unwrap_or_default();

        if let Some(sort) = sort {
            // Stable sort, applied per key in order; equal keys keep insertion order.
            selected.sort_by(|a, b| {
                for (key, direction) in sort.iter() {
                    let ascending = bson_number(direction).unwrap_or(1.0) >= 0.0;
                    let ordering = cmp_bson(a.get(key), b.get(key));
                    let ordering = if ascending { ordering } else { ordering.reverse() };
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                Ordering::Equal
            });
        }

        selected.truncate(FIND_CAP as usize);
        Ok(selected)
    }

    async fn update_one(&self, filter: Document, update: Document) -> Result<(), StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Backend("collection lock poisoned".to_string()))?;
        if let Some(docs) = collections.get_mut(&self.name) {
            if let Some(stored) = docs.iter_mut().find(|stored| matches(&filter, stored)) {
                apply_update(&mut stored.doc, &update)?;
            }
        }
        Ok(())
    }

    async fn count(&self, filter: Document) -> Result<u64, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::Backend("collection lock poisoned".to_string()))?;
        let count = collections
            .get(&self.name)
            .map(|docs| docs.iter().filter(|stored| matches(&filter, stored)).count())
            .unwrap_or(0);
        Ok(count as u64)
    }
}

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;
use uuid::Uuid;

use super::{DocumentId, DocumentStore};
use crate::error::StoreError;

/// In-memory document store backing unit and integration tests. Semantics
/// mirror the HTTP store: exact-match equality on top-level query fields,
/// field replacement on update.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document with a known id, for tests.
    pub fn seed(&self, collection: &str, document: Value) -> DocumentId {
        self.insert(collection, document)
            .expect("memory insert cannot fail")
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map_or(0, Vec::len)
    }
}

fn matches_query(doc: &Value, query: &Value) -> bool {
    match query.as_object() {
        Some(fields) => fields.iter().all(|(k, v)| doc.get(k) == Some(v)),
        None => false,
    }
}

impl DocumentStore for MemoryStore {
    fn insert(&self, collection: &str, mut document: Value) -> Result<DocumentId, StoreError> {
        let id = match document.get("_id").and_then(Value::as_str) {
            Some(existing) => existing.to_string(),
            None => {
                let minted = Uuid::new_v4().simple().to_string();
                if let Some(obj) = document.as_object_mut() {
                    obj.insert("_id".to_string(), Value::String(minted.clone()));
                }
                minted
            }
        };
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(DocumentId(id))
    }

    fn find_one(&self, collection: &str, query: &Value) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| matches_query(d, query)))
            .cloned())
    }

    fn find(&self, collection: &str, query: &Value) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| matches_query(d, query))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn update_one(
        &self,
        collection: &str,
        query: &Value,
        fields: &Value,
    ) -> Result<bool, StoreError> {
        let mut collections = self.collections.lock().unwrap();
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let Some(doc) = docs.iter_mut().find(|d| matches_query(d, query)) else {
            return Ok(false);
        };
        if let (Some(target), Some(updates)) = (doc.as_object_mut(), fields.as_object()) {
            for (k, v) in updates {
                target.insert(k.clone(), v.clone());
            }
        }
        Ok(true)
    }
}

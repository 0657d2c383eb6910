use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("store returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("document {id} not found in {collection}")]
    NotFound { collection: String, id: String },
    #[error("malformed document in {collection}: {message}")]
    Malformed { collection: String, message: String },
}

/// Equality predicate on one document field against a set of accepted values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub values: Vec<String>,
}

impl Filter {
    pub fn equal(
        field: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    fn matches(&self, document: &Value) -> bool {
        document
            .get(&self.field)
            .and_then(Value::as_str)
            .map_or(false, |value| self.values.iter().any(|accepted| accepted == value))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentList {
    pub documents: Vec<Value>,
    pub total: u64,
}

/// The persistence collaborator. Collections hold raw JSON documents keyed by
/// an `$id` field; callers decode the fields they need.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list_documents(
        &self,
        collection: &str,
        filters: &[Filter],
    ) -> Result<DocumentList, StoreError>;

    async fn get_document(&self, collection: &str, id: &str) -> Result<Value, StoreError>;

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        data: Value,
    ) -> Result<Value, StoreError>;
}

pub fn decode_document<T: DeserializeOwned>(
    collection: &str,
    document: Value,
) -> Result<T, StoreError> {
    serde_json::from_value(document).map_err(|err| StoreError::Malformed {
        collection: collection.to_string(),
        message: err.to_string(),
    })
}

/// In-memory store for tests and for running without a backing instance.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<Mutex<HashMap<String, Vec<Value>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, collection: &str, document: Value) {
        let mut collections = self.collections.lock().unwrap();
        collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
    }

    /// Direct lookup bypassing the trait, for assertions on persisted state.
    pub fn document(&self, collection: &str, id: &str) -> Option<Value> {
        let collections = self.collections.lock().unwrap();
        collections
            .get(collection)?
            .iter()
            .find(|doc| doc.get("$id").and_then(Value::as_str) == Some(id))
            .cloned()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_documents(
        &self,
        collection: &str,
        filters: &[Filter],
    ) -> Result<DocumentList, StoreError> {
        let collections = self.collections.lock().unwrap();
        let documents: Vec<Value> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| filters.iter().all(|filter| filter.matches(doc)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        let total = documents.len() as u64;
        Ok(DocumentList { documents, total })
    }

    async fn get_document(&self, collection: &str, id: &str) -> Result<Value, StoreError> {
        self.document(collection, id).ok_or_else(|| StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        })
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        data: Value,
    ) -> Result<Value, StoreError> {
        let mut collections = self.collections.lock().unwrap();
        let document = collections
            .get_mut(collection)
            .and_then(|docs| {
                docs.iter_mut()
                    .find(|doc| doc.get("$id").and_then(Value::as_str) == Some(id))
            })
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        if let (Some(target), Some(fields)) = (document.as_object_mut(), data.as_object()) {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(document.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert(
            "bookings",
            json!({"$id": "b1", "user_id": "u1", "status": "confirmed"}),
        );
        store.insert(
            "bookings",
            json!({"$id": "b2", "user_id": "u1", "status": "cancelled"}),
        );
        store.insert(
            "bookings",
            json!({"$id": "b3", "user_id": "u2", "status": "confirmed"}),
        );
        store
    }

    #[tokio::test]
    async fn filters_are_conjunctive_equality_sets() {
        let store = seeded();
        let page = store
            .list_documents(
                "bookings",
                &[
                    Filter::equal("user_id", ["u1"]),
                    Filter::equal("status", ["confirmed"]),
                ],
            )
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.documents[0]["$id"], "b1");

        let either = store
            .list_documents("bookings", &[Filter::equal("$id", ["b1", "b3"])])
            .await
            .unwrap();
        assert_eq!(either.total, 2);
    }

    #[tokio::test]
    async fn unknown_collection_lists_empty() {
        let store = seeded();
        let page = store.list_documents("settings", &[]).await.unwrap();
        assert_eq!(page.total, 0);
        assert!(page.documents.is_empty());
    }

    #[tokio::test]
    async fn update_merges_fields_and_missing_id_errors() {
        let store = seeded();
        let updated = store
            .update_document("bookings", "b1", json!({"status": "cancelled", "note": "x"}))
            .await
            .unwrap();
        assert_eq!(updated["status"], "cancelled");
        assert_eq!(updated["user_id"], "u1");
        assert_eq!(updated["note"], "x");

        let missing = store
            .update_document("bookings", "nope", json!({"status": "confirmed"}))
            .await;
        assert!(matches!(missing, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn get_returns_not_found_for_absent_documents() {
        let store = seeded();
        assert!(store.get_document("bookings", "b1").await.is_ok());
        let err = store.get_document("bookings", "b9").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}

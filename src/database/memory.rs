use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::store::DocumentStore;
use crate::utils::AppError;

/// In-process document store with the same equality-filter semantics as the Mongo backend.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn id_of(document: &Document) -> Option<&str> {
    document.get_str("_id").ok()
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key).unwrap_or(&Bson::Null) == expected)
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, document: Document) -> Result<(), AppError> {
        let id = id_of(&document)
            .ok_or_else(|| AppError::DatabaseError("Document has no string _id".into()))?
            .to_string();

        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.iter().any(|d| id_of(d) == Some(id.as_str())) {
            return Err(AppError::Duplicate(format!("_id {} in {}", id, collection)));
        }
        docs.push(document);
        Ok(())
    }

    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| matches(d, &filter)).cloned().collect())
            .unwrap_or_default())
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| id_of(d) == Some(id)).cloned()))
    }

    async fn replace(
        &self,
        collection: &str,
        id: &str,
        document: Document,
    ) -> Result<Option<Document>, AppError> {
        let mut collections = self.collections.write().await;
        let slot = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| id_of(d) == Some(id)));

        Ok(slot.map(|existing| {
            let mut replacement = document;
            replacement.insert("_id", id);
            *existing = replacement.clone();
            replacement
        }))
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(None);
        };
        Ok(docs
            .iter()
            .position(|d| id_of(d) == Some(id))
            .map(|index| docs.remove(index)))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn test_insert_find_replace_delete() {
        let store = MemoryStore::new();
        store.insert("faqs", doc! { "_id": "a", "question": "Q1" }).await.unwrap();
        store.insert("faqs", doc! { "_id": "b", "question": "Q2" }).await.unwrap();

        let all = store.find("faqs", doc! {}).await.unwrap();
        assert_eq!(all.len(), 2);

        let filtered = store.find("faqs", doc! { "question": "Q2" }).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].get_str("_id").unwrap(), "b");

        let replaced = store
            .replace("faqs", "a", doc! { "question": "Q1 edited" })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.get_str("_id").unwrap(), "a");
        let read = store.find_by_id("faqs", "a").await.unwrap().unwrap();
        assert_eq!(read.get_str("question").unwrap(), "Q1 edited");

        assert!(store.delete("faqs", "a").await.unwrap().is_some());
        assert!(store.find_by_id("faqs", "a").await.unwrap().is_none());
        assert!(store.delete("faqs", "a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_ids() {
        let store = MemoryStore::new();
        assert!(store.find_by_id("tickets", "nope").await.unwrap().is_none());
        assert!(store.replace("tickets", "nope", doc! {}).await.unwrap().is_none());
        assert!(store.find("tickets", doc! {}).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = MemoryStore::new();
        store.insert("faqs", doc! { "_id": "a" }).await.unwrap();
        assert!(matches!(
            store.insert("faqs", doc! { "_id": "a" }).await,
            Err(AppError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn test_filter_on_missing_field_matches_nothing() {
        let store = MemoryStore::new();
        store.insert("tickets", doc! { "_id": "a", "status": "Open" }).await.unwrap();
        assert!(store.find("tickets", doc! { "email": "x@y.z" }).await.unwrap().is_empty());
    }
}

use mongodb::bson::{self, oid::ObjectId, Document};
use std::marker::PhantomData;

use crate::database::DocumentStore;
use crate::models::{ListQuery, Resource};
use crate::utils::AppError;

/// Typed access to one resource collection.
pub struct Repository<'a, T> {
    store: &'a dyn DocumentStore,
    _marker: PhantomData<T>,
}

/// Ids are ObjectId hex strings; anything else is a client error rather than a miss.
pub fn check_id(id: &str) -> Result<(), AppError> {
    ObjectId::parse_str(id)
        .map(|_| ())
        .map_err(|_| AppError::InvalidRequest(format!("'{}' is not a valid id", id)))
}

impl<'a, T: Resource> Repository<'a, T> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store, _marker: PhantomData }
    }

    fn decode(document: Document) -> Result<T, AppError> {
        Ok(bson::from_document(document)?)
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Vec<T>, AppError> {
        let documents = self.store.find(T::COLLECTION, query.filters.clone()).await?;

        let mut records = Vec::with_capacity(documents.len());
        for document in documents {
            match Self::decode(document) {
                Ok(record) => records.push(record),
                Err(e) => log::error!("❌ Skipping unreadable {} record: {}", T::LABEL, e),
            }
        }

        Ok(query.apply(records))
    }

    pub async fn find_one(&self, filter: Document) -> Result<Option<T>, AppError> {
        let documents = self.store.find(T::COLLECTION, filter).await?;
        documents.into_iter().next().map(Self::decode).transpose()
    }

    pub async fn get(&self, id: &str) -> Result<T, AppError> {
        check_id(id)?;
        match self.store.find_by_id(T::COLLECTION, id).await? {
            Some(document) => Self::decode(document),
            None => Err(AppError::NotFound(T::LABEL.to_string())),
        }
    }

    pub async fn insert(&self, record: &T) -> Result<(), AppError> {
        let document = bson::to_document(record)?;
        self.store.insert(T::COLLECTION, document).await
    }

    /// Full replace keyed by the record's own id.
    pub async fn replace(&self, record: &T) -> Result<T, AppError> {
        let id = record.meta().id.as_str();
        let document = bson::to_document(record)?;
        match self.store.replace(T::COLLECTION, id, document).await? {
            Some(document) => Self::decode(document),
            None => Err(AppError::NotFound(T::LABEL.to_string())),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<T, AppError> {
        check_id(id)?;
        match self.store.delete(T::COLLECTION, id).await? {
            Some(document) => Self::decode(document),
            None => Err(AppError::NotFound(T::LABEL.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::models::{Editable, Faq, FaqInput, RecordMeta, Ticket, TicketInput, TicketStatus};
    use mongodb::bson::doc;
    use std::collections::HashMap;

    fn ticket(email: &str) -> Ticket {
        Ticket::from_input(
            TicketInput {
                topic: "Delivery".into(),
                description: "Late parcel".into(),
                name: "Ann".into(),
                phone: "0771234567".into(),
                email: email.into(),
                status: String::new(),
            },
            RecordMeta::new(),
        )
    }

    #[tokio::test]
    async fn test_crud_contract() {
        let store = MemoryStore::new();
        let repo = Repository::<Faq>::new(&store);

        let faq = Faq::from_input(
            FaqInput { question: "Do you ship abroad?".into(), answer: "Yes.".into() },
            RecordMeta::new(),
        );
        repo.insert(&faq).await.unwrap();

        let read = repo.get(&faq.meta.id).await.unwrap();
        assert_eq!(read.question, "Do you ship abroad?");
        assert_eq!(read.meta, faq.meta);

        let mut edited = read.clone();
        edited.answer = "Only within the EU.".into();
        edited.meta = read.meta.touched();
        repo.replace(&edited).await.unwrap();
        assert_eq!(repo.get(&faq.meta.id).await.unwrap().answer, "Only within the EU.");

        repo.delete(&faq.meta.id).await.unwrap();
        assert!(matches!(repo.get(&faq.meta.id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_missing_and_malformed_ids() {
        let store = MemoryStore::new();
        let repo = Repository::<Faq>::new(&store);

        let missing = ObjectId::new().to_hex();
        assert!(matches!(repo.get(&missing).await, Err(AppError::NotFound(_))));
        assert!(matches!(repo.delete(&missing).await, Err(AppError::NotFound(_))));
        assert!(matches!(repo.get("not-an-id").await, Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_list_applies_filters() {
        let store = MemoryStore::new();
        let repo = Repository::<Ticket>::new(&store);
        repo.insert(&ticket("ann@example.com")).await.unwrap();
        repo.insert(&ticket("bob@example.com")).await.unwrap();

        let params: HashMap<String, String> =
            [("email".to_string(), "bob@example.com".to_string())].into_iter().collect();
        let query = ListQuery::from_params::<Ticket>(&params).unwrap();
        let found = repo.list(&query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].email, "bob@example.com");
        assert_eq!(found[0].status, TicketStatus::Open);

        let one = repo.find_one(doc! { "email": "ann@example.com" }).await.unwrap();
        assert!(one.is_some());
    }
}

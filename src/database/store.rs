use async_trait::async_trait;
use mongodb::bson::Document;

use crate::utils::AppError;

/// Collection-level operations every handler needs. Ids are the hex strings stored in `_id`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: &str, document: Document) -> Result<(), AppError>;

    /// Returns every document whose fields equal the ones in `filter`.
    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>, AppError>;

    async fn find_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError>;

    /// Replaces the whole document; `None` when no document has that id.
    async fn replace(
        &self,
        collection: &str,
        id: &str,
        document: Document,
    ) -> Result<Option<Document>, AppError>;

    /// Deletes and returns the document; `None` when no document has that id.
    async fn delete(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

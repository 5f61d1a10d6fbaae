pub mod memory;
pub mod store;

pub use memory::MemoryStore;
pub use store::DocumentStore;

use async_trait::async_trait;
use futures::stream::StreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};

use crate::utils::AppError;

const DEFAULT_DATABASE: &str = "mern_backoffice";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(uri).await?;

        client_options.app_name = Some("backoffice-service".to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));
        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let db_name = client_options
            .default_database
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&db_name);

        // Test connection
        db.list_collection_names().await?;
        log::info!("📊 Using database: {}", db_name);

        let mongodb = Self { db };
        mongodb.ensure_indexes().await;

        Ok(mongodb)
    }

    /// Creates the lookup indexes used by list filters and admin login.
    async fn ensure_indexes(&self) {
        log::info!("🔧 Creating database indexes...");

        let plain = [
            ("eventparticipants", "eventId"),
            ("purchases", "productId"),
            ("purchases", "email"),
            ("refunds", "email"),
            ("returns", "email"),
            ("tickets", "status"),
            ("donations", "email"),
        ];

        for (collection, field) in plain {
            let mut keys = Document::new();
            keys.insert(field, 1);
            let index = IndexModel::builder().keys(keys).build();
            match self.collection::<Document>(collection).create_index(index).await {
                Ok(_) => log::info!("   ✅ Index created: {}({})", collection, field),
                Err(e) => log::debug!("   ℹ️  Index on {}({}) skipped: {}", collection, field, e),
            }
        }

        for field in ["username", "email"] {
            let mut keys = Document::new();
            keys.insert(field, 1);
            let options = mongodb::options::IndexOptions::builder().unique(true).build();
            let index = IndexModel::builder()
                .keys(keys)
                .options(options)
                .build();
            match self.collection::<Document>("admins").create_index(index).await {
                Ok(_) => log::info!("   ✅ Unique index created: admins({})", field),
                Err(e) => log::debug!("   ℹ️  Index on admins({}) skipped: {}", field, e),
            }
        }

        log::info!("✅ Database indexes ready");
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}

#[async_trait]
impl DocumentStore for MongoDB {
    async fn insert(&self, collection: &str, document: Document) -> Result<(), AppError> {
        self.collection::<Document>(collection).insert_one(document).await?;
        Ok(())
    }

    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>, AppError> {
        let mut cursor = self.collection::<Document>(collection).find(filter).await?;

        let mut documents = Vec::new();
        while let Some(result) = cursor.next().await {
            match result {
                Ok(document) => documents.push(document),
                Err(e) => log::error!("❌ Failed to read document from {}: {}", collection, e),
            }
        }
        Ok(documents)
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError> {
        Ok(self
            .collection::<Document>(collection)
            .find_one(doc! { "_id": id })
            .await?)
    }

    async fn replace(
        &self,
        collection: &str,
        id: &str,
        mut document: Document,
    ) -> Result<Option<Document>, AppError> {
        document.insert("_id", id);
        Ok(self
            .collection::<Document>(collection)
            .find_one_and_replace(doc! { "_id": id }, document)
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError> {
        Ok(self
            .collection::<Document>(collection)
            .find_one_and_delete(doc! { "_id": id })
            .await?)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

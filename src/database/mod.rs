pub mod user_store;

#[cfg(test)]
pub mod memory;

pub use user_store::*;

use crate::utils::AppError;
use mongodb::{Client, Collection, Database};
use std::error::Error;
use tokio::sync::OnceCell;

pub type StoreError = Box<dyn Error + Send + Sync>;

pub const USERS_COLLECTION: &str = "users";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, StoreError> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(10);
        client_options.min_pool_size = Some(1);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // Test connection
        db.run_command(mongodb::bson::doc! { "ping": 1 }).await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// `clerkId` is the record key; the unique index keeps concurrent upserts
    /// for the same user from producing duplicates.
    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        let users = self.collection::<mongodb::bson::Document>(USERS_COLLECTION);

        let clerk_id_index = IndexModel::builder()
            .keys(doc! { "clerkId": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        // Without the index the connector must not report connected
        users.create_index(clerk_id_index).await.map_err(|e| {
            log::error!("❌ Could not create unique index users(clerkId): {}", e);
            e
        })?;

        log::info!("   ✅ Index ready: users(clerkId) unique");
        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.database().collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

/// Process-wide, connect-once access to MongoDB.
///
/// Nothing is dialed until the first request needs persistence. Concurrent
/// first callers share a single initialization; a failed attempt leaves the
/// connector empty so a later request can try again.
pub struct MongoConnector {
    uri: Option<String>,
    database_name: String,
    cell: OnceCell<MongoDB>,
}

impl MongoConnector {
    pub fn new(uri: Option<String>, database_name: impl Into<String>) -> Self {
        Self {
            uri,
            database_name: database_name.into(),
            cell: OnceCell::new(),
        }
    }

    pub async fn connect(&self) -> Result<&MongoDB, AppError> {
        if let Some(db) = self.cell.get() {
            log::debug!("MongoDB is already connected");
            return Ok(db);
        }

        self.cell
            .get_or_try_init(|| async {
                let uri = self.uri.as_deref().ok_or_else(|| {
                    AppError::ConfigurationMissing(
                        "MONGODB_URI is not defined in the environment variables.".to_string(),
                    )
                })?;

                log::info!("🔌 Connecting to MongoDB database: {}", self.database_name);

                let db = MongoDB::new(uri, &self.database_name).await.map_err(|e| {
                    log::error!("❌ MongoDB connection error: {}", e);
                    AppError::PersistenceFailure("Failed to connect to MongoDB".to_string())
                })?;

                log::info!("✅ MongoDB connected");
                Ok(db)
            })
            .await
    }

    pub fn is_connected(&self) -> bool {
        self.cell.initialized()
    }
}

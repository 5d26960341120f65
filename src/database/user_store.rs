use super::{MongoConnector, StoreError, USERS_COLLECTION};
use crate::models::UserRecord;
use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::ReturnDocument;
use std::sync::Arc;

/// Point operations on user records, keyed by `clerkId`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Overwrites every field of the record with `clerk_id == record.clerk_id`,
    /// creating it when absent, and returns the stored document.
    async fn upsert_user(&self, record: &UserRecord) -> Result<UserRecord, StoreError>;

    /// Removes the record, returning it if one existed.
    async fn delete_user(&self, clerk_id: &str) -> Result<Option<UserRecord>, StoreError>;
}

pub struct MongoUserStore {
    connector: Arc<MongoConnector>,
}

impl MongoUserStore {
    pub fn new(connector: Arc<MongoConnector>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn upsert_user(&self, record: &UserRecord) -> Result<UserRecord, StoreError> {
        let db = self.connector.connect().await?;
        let users = db.collection::<UserRecord>(USERS_COLLECTION);

        let stored = users
            .find_one_and_update(
                doc! { "clerkId": &record.clerk_id },
                doc! { "$set": {
                    "firstName": &record.first_name,
                    "lastName": &record.last_name,
                    "avatar": &record.avatar,
                    "email": &record.email,
                    "username": &record.username,
                } },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?;

        stored.ok_or_else(|| format!("upsert returned no document for {}", record.clerk_id).into())
    }

    async fn delete_user(&self, clerk_id: &str) -> Result<Option<UserRecord>, StoreError> {
        let db = self.connector.connect().await?;
        let users = db.collection::<UserRecord>(USERS_COLLECTION);

        Ok(users.find_one_and_delete(doc! { "clerkId": clerk_id }).await?)
    }
}

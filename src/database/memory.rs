use super::{StoreError, UserStore};
use crate::models::UserRecord;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use std::sync::Mutex;

/// `UserStore` backed by a map, with a switch to simulate a broken database.
#[derive(Default)]
pub struct InMemoryUserStore {
    records: Mutex<HashMap<String, UserRecord>>,
    failing: bool,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn get(&self, clerk_id: &str) -> Option<UserRecord> {
        self.records.lock().unwrap().get(clerk_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing {
            return Err("connection refused".into());
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn upsert_user(&self, record: &UserRecord) -> Result<UserRecord, StoreError> {
        self.check()?;
        let mut records = self.records.lock().unwrap();
        let id = records
            .get(&record.clerk_id)
            .and_then(|existing| existing.id)
            .unwrap_or_else(ObjectId::new);

        let stored = UserRecord {
            id: Some(id),
            ..record.clone()
        };
        records.insert(record.clerk_id.clone(), stored.clone());
        Ok(stored)
    }

    async fn delete_user(&self, clerk_id: &str) -> Result<Option<UserRecord>, StoreError> {
        self.check()?;
        Ok(self.records.lock().unwrap().remove(clerk_id))
    }
}

// ==================== USER RECONCILIATION ====================
// Mirrors identity-provider users into the `users` collection.
// Both operations are idempotent so redelivered webhooks are harmless.

use crate::{
    database::UserStore,
    models::{UserEventPayload, UserRecord},
    utils::AppError,
};

/// Creates the user or overwrites every stored field with the payload's values.
pub async fn create_or_update_user(
    store: &dyn UserStore,
    payload: &UserEventPayload,
) -> Result<UserRecord, AppError> {
    let record = UserRecord::from(payload);

    match store.upsert_user(&record).await {
        Ok(stored) => {
            log::info!("✅ User {} created or updated", stored.clerk_id);
            Ok(stored)
        }
        Err(e) => {
            log::error!("❌ Error in create_or_update_user for {}: {}", payload.id, e);
            Err(AppError::PersistenceFailure("Failed to create or update user".to_string()))
        }
    }
}

/// Removes the user; deleting an unknown user is not an error.
pub async fn delete_user(store: &dyn UserStore, clerk_id: &str) -> Result<bool, AppError> {
    match store.delete_user(clerk_id).await {
        Ok(Some(_)) => {
            log::info!("🗑️  User {} deleted", clerk_id);
            Ok(true)
        }
        Ok(None) => {
            log::info!("ℹ️  User {} not found, nothing to delete", clerk_id);
            Ok(false)
        }
        Err(e) => {
            log::error!("❌ Error deleting user {}: {}", clerk_id, e);
            Err(AppError::PersistenceFailure("Failed to delete user".to_string()))
        }
    }
}

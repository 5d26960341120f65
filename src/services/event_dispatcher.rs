use crate::{
    database::UserStore,
    models::{InboundWebhookEvent, UserEventPayload},
    services::user_service,
    utils::AppError,
};

pub const USER_CREATED: &str = "user.created";
pub const USER_UPDATED: &str = "user.updated";
pub const USER_DELETED: &str = "user.deleted";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Upserted { clerk_id: String },
    Deleted { clerk_id: String, existed: bool },
    Ignored { event_type: String },
}

impl DispatchOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            DispatchOutcome::Upserted { .. } => "User is created or updated",
            DispatchOutcome::Deleted { .. } => "User is deleted",
            DispatchOutcome::Ignored { .. } => "Webhook received but no action taken",
        }
    }
}

/// Routes a verified event to exactly one reconciliation path.
pub async fn dispatch(
    event: InboundWebhookEvent,
    store: &dyn UserStore,
) -> Result<DispatchOutcome, AppError> {
    match event.event_type.as_str() {
        USER_CREATED | USER_UPDATED => {
            let payload: UserEventPayload = serde_json::from_value(event.data).map_err(|e| {
                log::error!("❌ Invalid data structure for {}: {}", event.event_type, e);
                AppError::InvalidPayload(e.to_string())
            })?;

            if payload.id.is_empty() {
                log::error!("❌ {} without a user id", event.event_type);
                return Err(AppError::MissingIdentifier);
            }

            let stored = user_service::create_or_update_user(store, &payload).await?;
            Ok(DispatchOutcome::Upserted {
                clerk_id: stored.clerk_id,
            })
        }
        USER_DELETED => {
            let clerk_id = event
                .data
                .get("id")
                .and_then(|v| v.as_str())
                .filter(|id| !id.is_empty())
                .ok_or_else(|| {
                    log::error!("❌ {} without a user id", USER_DELETED);
                    AppError::MissingIdentifier
                })?;

            let existed = user_service::delete_user(store, clerk_id).await?;
            Ok(DispatchOutcome::Deleted {
                clerk_id: clerk_id.to_string(),
                existed,
            })
        }
        other => {
            log::info!("ℹ️  Webhook {} received but no action taken", other);
            Ok(DispatchOutcome::Ignored {
                event_type: other.to_string(),
            })
        }
    }
}

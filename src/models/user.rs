use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Envelope of every webhook delivery. `data` stays untyped until the
/// dispatcher decodes it for the declared event type.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct InboundWebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub email: String,
}

/// `data` of `user.created` / `user.updated`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEventPayload {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub image_url: String,
    pub email_addresses: Vec<EmailAddress>,
    pub username: String,
}

impl UserEventPayload {
    pub fn primary_email(&self) -> &str {
        self.email_addresses
            .first()
            .map(|e| e.email.as_str())
            .unwrap_or("")
    }
}

/// Document stored in the `users` collection, keyed by `clerkId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub clerk_id: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: String,
    pub email: String,
    pub username: String,
}

impl From<&UserEventPayload> for UserRecord {
    fn from(payload: &UserEventPayload) -> Self {
        Self {
            id: None,
            clerk_id: payload.id.clone(),
            first_name: payload.first_name.clone(),
            last_name: payload.last_name.clone(),
            avatar: payload.image_url.clone(),
            email: payload.primary_email().to_string(),
            username: payload.username.clone(),
        }
    }
}

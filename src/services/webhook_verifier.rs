// ==================== WEBHOOK VERIFICATION ====================
// Authenticates Svix-signed deliveries before anything reads the payload.

use crate::{
    models::InboundWebhookEvent,
    utils::{crypto, AppError},
};
use actix_web::http::header::HeaderMap;

pub const SVIX_ID: &str = "svix-id";
pub const SVIX_TIMESTAMP: &str = "svix-timestamp";
pub const SVIX_SIGNATURE: &str = "svix-signature";

/// The three signing headers, all required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvixHeaders {
    pub id: String,
    pub timestamp: String,
    pub signature: String,
}

impl SvixHeaders {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        let get = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        match (get(SVIX_ID), get(SVIX_TIMESTAMP), get(SVIX_SIGNATURE)) {
            (Some(id), Some(timestamp), Some(signature)) => Ok(Self {
                id,
                timestamp,
                signature,
            }),
            _ => Err(AppError::MissingHeaders),
        }
    }
}

pub struct WebhookVerifier {
    key: Vec<u8>,
    tolerance_secs: i64,
}

impl WebhookVerifier {
    /// Fails when the secret cannot be decoded; the server must not start then.
    pub fn new(signing_secret: &str, tolerance_secs: i64) -> Result<Self, AppError> {
        let key = crypto::decode_signing_secret(signing_secret)
            .map_err(|e| AppError::ConfigurationMissing(format!("SIGNING_SECRET: {}", e)))?;

        Ok(Self { key, tolerance_secs })
    }

    pub fn verify(&self, headers: &SvixHeaders, body: &[u8]) -> Result<InboundWebhookEvent, AppError> {
        self.verify_at(headers, body, chrono::Utc::now().timestamp())
    }

    /// Same as [`verify`](Self::verify) against an explicit clock reading.
    pub fn verify_at(
        &self,
        headers: &SvixHeaders,
        body: &[u8],
        now: i64,
    ) -> Result<InboundWebhookEvent, AppError> {
        if let Err(reason) = self.check_signature(headers, body, now) {
            log::error!("❌ Could not verify webhook {}: {}", headers.id, reason);
            return Err(AppError::VerificationFailed(reason));
        }

        serde_json::from_slice::<InboundWebhookEvent>(body).map_err(|e| {
            log::error!("❌ Verified webhook {} has no valid envelope: {}", headers.id, e);
            AppError::InvalidPayload(format!("malformed event envelope: {}", e))
        })
    }

    fn check_signature(&self, headers: &SvixHeaders, body: &[u8], now: i64) -> Result<(), String> {
        let timestamp = headers
            .timestamp
            .parse::<i64>()
            .map_err(|_| "invalid signature timestamp".to_string())?;

        // The header is sender-controlled; abs_diff cannot overflow
        if now.abs_diff(timestamp) > self.tolerance_secs.unsigned_abs() {
            return Err(if timestamp < now {
                "message timestamp too old".to_string()
            } else {
                "message timestamp too new".to_string()
            });
        }

        let matched = crypto::verify_signature(
            &self.key,
            &headers.id,
            &headers.timestamp,
            body,
            &headers.signature,
        )?;

        if matched {
            Ok(())
        } else {
            Err("no matching signature found".to_string())
        }
    }
}

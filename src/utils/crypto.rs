// Svix webhook signatures: HMAC-SHA256 over "{id}.{timestamp}.{body}",
// transported as standard base64.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SECRET_PREFIX: &str = "whsec_";
const SIGNATURE_VERSION: &str = "v1";

/// Decodes a signing secret as shown in the Clerk dashboard (`whsec_<base64>`).
/// The prefix is optional.
pub fn decode_signing_secret(secret: &str) -> Result<Vec<u8>, String> {
    let encoded = secret.trim();
    let encoded = encoded.strip_prefix(SECRET_PREFIX).unwrap_or(encoded);

    if encoded.is_empty() {
        return Err("signing secret is empty".to_string());
    }

    STANDARD
        .decode(encoded)
        .map_err(|e| format!("signing secret is not valid base64: {}", e))
}

fn signed_content_mac(key: &[u8], msg_id: &str, timestamp: &str, body: &[u8]) -> Result<HmacSha256, String> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| format!("Failed to initialize HMAC: {}", e))?;
    mac.update(msg_id.as_bytes());
    mac.update(b".");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(body);
    Ok(mac)
}

/// Checks a `svix-signature` header value against the signed content.
///
/// The header holds space-separated `version,signature` pairs; only `v1`
/// entries are considered and any one match is enough.
pub fn verify_signature(
    key: &[u8],
    msg_id: &str,
    timestamp: &str,
    body: &[u8],
    signature_header: &str,
) -> Result<bool, String> {
    let mac = signed_content_mac(key, msg_id, timestamp, body)?;

    let matched = signature_header
        .split_whitespace()
        .filter_map(|entry| entry.split_once(','))
        .filter(|(version, _)| *version == SIGNATURE_VERSION)
        .filter_map(|(_, encoded)| STANDARD.decode(encoded).ok())
        .any(|candidate| mac.clone().verify_slice(&candidate).is_ok());

    Ok(matched)
}

/// Produces a `v1,<base64>` header value for the given message.
#[cfg(test)]
pub fn sign(key: &[u8], msg_id: &str, timestamp: &str, body: &[u8]) -> String {
    let mac = signed_content_mac(key, msg_id, timestamp, body).unwrap();
    format!("{},{}", SIGNATURE_VERSION, STANDARD.encode(mac.finalize().into_bytes()))
}

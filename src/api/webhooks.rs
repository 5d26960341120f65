use crate::{
    api::metrics,
    database::UserStore,
    services::{event_dispatcher, DispatchOutcome, SvixHeaders, WebhookVerifier},
    utils::AppError,
};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct WebhookResponse {
    pub success: bool,
    pub message: String,
}

/// POST /api/webhooks - Receives Clerk user events delivered through Svix
///
/// Signing headers are checked before the body is looked at; the payload is
/// only decoded once its signature is verified.
#[utoipa::path(
    post,
    path = "/api/webhooks",
    tag = "Webhooks",
    params(
        ("svix-id" = String, Header, description = "Unique message id"),
        ("svix-timestamp" = String, Header, description = "Unix seconds when the message was signed"),
        ("svix-signature" = String, Header, description = "Space-separated list of `v1,<base64>` signatures"),
    ),
    request_body = crate::models::InboundWebhookEvent,
    responses(
        (status = 200, description = "Event handled, or acknowledged without action", body = WebhookResponse),
        (status = 400, description = "Missing headers, bad signature, invalid payload or missing user id", body = crate::utils::ErrorResponse),
        (status = 500, description = "Database failure", body = crate::utils::ErrorResponse)
    )
)]
pub async fn receive_webhook(
    req: HttpRequest,
    body: web::Bytes,
    verifier: web::Data<WebhookVerifier>,
    store: web::Data<dyn UserStore>,
) -> Result<HttpResponse, AppError> {
    let headers = SvixHeaders::from_headers(req.headers()).map_err(|e| {
        log::warn!("⚠️  Rejected webhook: {}", e);
        e
    })?;

    log::info!("📨 POST /api/webhooks - delivery {}", headers.id);

    let event = verifier.verify(&headers, &body)?;
    let event_type = event.event_type.clone();

    let outcome = event_dispatcher::dispatch(event, store.get_ref())
        .await
        .map_err(|e| {
            log::warn!("⚠️  Webhook {} ({}) failed: {}", headers.id, event_type, e);
            e
        })?;

    match &outcome {
        DispatchOutcome::Ignored { .. } => metrics::increment_webhooks_ignored(),
        _ => metrics::increment_webhooks_processed(),
    }

    Ok(HttpResponse::Ok().json(WebhookResponse {
        success: true,
        message: outcome.message().to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::metrics::MetricsResponse;
    use crate::database::memory::InMemoryUserStore;
    use crate::utils::{crypto, ErrorResponse};
    use actix_web::{dev::ServiceResponse, http::StatusCode, test, App};
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde_json::json;
    use std::sync::Arc;

    const KEY: &[u8] = b"handler-test-signing-key";

    fn verifier() -> WebhookVerifier {
        WebhookVerifier::new(&format!("whsec_{}", STANDARD.encode(KEY)), 300).unwrap()
    }

    fn signed_request(msg_id: &str, body: &str) -> test::TestRequest {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = crypto::sign(KEY, msg_id, &timestamp, body.as_bytes());

        test::TestRequest::post()
            .uri("/api/webhooks")
            .insert_header(("svix-id", msg_id.to_string()))
            .insert_header(("svix-timestamp", timestamp))
            .insert_header(("svix-signature", signature))
            .insert_header(("content-type", "application/json"))
            .set_payload(body.to_string())
    }

    async fn send(store: Arc<InMemoryUserStore>, req: test::TestRequest) -> ServiceResponse {
        let user_store: Arc<dyn UserStore> = store;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(verifier()))
                .app_data(web::Data::from(user_store))
                .route("/api/webhooks", web::post().to(receive_webhook)),
        )
        .await;

        test::call_service(&app, req.to_request()).await
    }

    fn user_event(event_type: &str, emails: serde_json::Value) -> String {
        json!({
            "type": event_type,
            "data": {
                "id": "user_2abc",
                "first_name": "Margaret",
                "last_name": "Hamilton",
                "image_url": "https://img.example/mh.png",
                "email_addresses": emails,
                "username": "mhamilton",
            }
        })
        .to_string()
    }

    #[actix_web::test]
    async fn test_created_event_stores_user() {
        let store = Arc::new(InMemoryUserStore::new());
        let body = user_event("user.created", json!([{ "email": "a@x.com" }, { "email": "b@x.com" }]));

        let resp = send(store.clone(), signed_request("msg_1", &body)).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: WebhookResponse = test::read_body_json(resp).await;
        assert!(body.success);
        assert_eq!(body.message, "User is created or updated");

        let stored = store.get("user_2abc").unwrap();
        assert_eq!(stored.email, "a@x.com");
        assert_eq!(stored.first_name, "Margaret");
        assert_eq!(stored.avatar, "https://img.example/mh.png");
    }

    #[actix_web::test]
    async fn test_redelivery_keeps_one_record() {
        let store = Arc::new(InMemoryUserStore::new());
        let body = user_event("user.updated", json!([]));

        let first = send(store.clone(), signed_request("msg_1", &body)).await;
        let second = send(store.clone(), signed_request("msg_1", &body)).await;

        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(second.status(), StatusCode::OK);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("user_2abc").unwrap().email, "");
    }

    #[actix_web::test]
    async fn test_bad_signature_is_rejected_without_mutation() {
        let store = Arc::new(InMemoryUserStore::new());
        let body = user_event("user.created", json!([]));
        let req = signed_request("msg_1", &body)
            .insert_header(("svix-signature", "v1,c2lnbmVkIGJ5IHNvbWVvbmUgZWxzZQ=="));

        let resp = send(store.clone(), req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.len(), 0);
    }

    #[actix_web::test]
    async fn test_missing_header_rejected_before_parsing() {
        for missing in ["svix-id", "svix-timestamp", "svix-signature"] {
            let store = Arc::new(InMemoryUserStore::new());
            let mut req = test::TestRequest::post().uri("/api/webhooks").set_payload("not json at all");
            for name in ["svix-id", "svix-timestamp", "svix-signature"] {
                if name != missing {
                    req = req.insert_header((name, "1700000000"));
                }
            }

            let resp = send(store.clone(), req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

            let body: ErrorResponse = test::read_body_json(resp).await;
            assert!(!body.success);
            assert_eq!(body.error, "Missing Svix headers");
            assert_eq!(store.len(), 0);
        }
    }

    #[actix_web::test]
    async fn test_delete_of_unknown_user_is_ok() {
        let store = Arc::new(InMemoryUserStore::new());
        let body = json!({ "type": "user.deleted", "data": { "id": "user_gone", "deleted": true } }).to_string();

        let resp = send(store, signed_request("msg_2", &body)).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: WebhookResponse = test::read_body_json(resp).await;
        assert_eq!(body.message, "User is deleted");
    }

    #[actix_web::test]
    async fn test_delete_removes_existing_user() {
        let store = Arc::new(InMemoryUserStore::new());
        send(store.clone(), signed_request("msg_1", &user_event("user.created", json!([])))).await;
        assert_eq!(store.len(), 1);

        let body = json!({ "type": "user.deleted", "data": { "id": "user_2abc" } }).to_string();
        let resp = send(store.clone(), signed_request("msg_2", &body)).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(store.len(), 0);
    }

    #[actix_web::test]
    async fn test_unknown_event_is_acknowledged() {
        let store = Arc::new(InMemoryUserStore::new());
        let body = json!({ "type": "user.foo", "data": { "id": "user_2abc" } }).to_string();

        let resp = send(store.clone(), signed_request("msg_3", &body)).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: WebhookResponse = test::read_body_json(resp).await;
        assert_eq!(body.message, "Webhook received but no action taken");
        assert_eq!(store.len(), 0);
    }

    #[actix_web::test]
    async fn test_invalid_shape_and_missing_id_are_bad_requests() {
        let store = Arc::new(InMemoryUserStore::new());
        let bad_shape = json!({ "type": "user.created", "data": { "id": "user_1" } }).to_string();
        let no_id = json!({ "type": "user.deleted", "data": {} }).to_string();

        let resp = send(store.clone(), signed_request("msg_4", &bad_shape)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = send(store.clone(), signed_request("msg_5", &no_id)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "User ID is missing");

        assert_eq!(store.len(), 0);
    }

    #[actix_web::test]
    async fn test_database_failure_is_server_error() {
        let store = Arc::new(InMemoryUserStore::failing());
        let body = user_event("user.created", json!([]));

        let resp = send(store, signed_request("msg_6", &body)).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "Error occured");
    }

    #[actix_web::test]
    async fn test_database_failure_on_delete_is_server_error() {
        let store = Arc::new(InMemoryUserStore::failing());
        let body = json!({ "type": "user.deleted", "data": { "id": "user_2abc" } }).to_string();

        let resp = send(store, signed_request("msg_7", &body)).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(!body.success);
        assert_eq!(body.error, "Error occured");
    }

    #[actix_web::test]
    async fn test_outcomes_feed_webhook_counters() {
        let store = Arc::new(InMemoryUserStore::new());
        let before = MetricsResponse::snapshot();

        let handled = send(store.clone(), signed_request("msg_8", &user_event("user.created", json!([])))).await;
        let ignored_body = json!({ "type": "session.created", "data": {} }).to_string();
        let ignored = send(store.clone(), signed_request("msg_9", &ignored_body)).await;
        assert_eq!(handled.status(), StatusCode::OK);
        assert_eq!(ignored.status(), StatusCode::OK);

        // Counters are process-wide and other tests run concurrently
        let after = MetricsResponse::snapshot();
        assert!(after.webhooks_processed_total >= before.webhooks_processed_total + 1);
        assert!(after.webhooks_ignored_total >= before.webhooks_ignored_total + 1);
    }
}

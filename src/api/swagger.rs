use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Sync Service API",
        version = "1.0.0",
        description = "Keeps the local `users` collection in sync with Clerk.\n\n**Authentication:** webhook deliveries are authenticated with Svix signatures (`svix-id`, `svix-timestamp`, `svix-signature`) computed from the shared `SIGNING_SECRET`.\n\n**Events handled:**\n- `user.created` / `user.updated`: upsert by `clerkId`\n- `user.deleted`: delete by `clerkId`\n- anything else: acknowledged, no action"
    ),
    paths(
        crate::api::webhooks::receive_webhook,
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::models::InboundWebhookEvent,
            crate::api::webhooks::WebhookResponse,
            crate::utils::ErrorResponse,
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,
        )
    ),
    tags(
        (name = "Webhooks", description = "Signed identity-provider callbacks."),
        (name = "Health", description = "Health check and service counters."),
    )
)]
pub struct ApiDoc;

pub mod health;
pub mod metrics;
pub mod swagger;
pub mod webhooks;

use actix_web::web;

/// Registers every HTTP route of the service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .route("/metrics", web::get().to(metrics::get_metrics))
        .service(
            web::scope("/api/webhooks")
                .route("", web::post().to(webhooks::receive_webhook)),
        );
}

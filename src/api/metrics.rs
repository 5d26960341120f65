use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);
static ERROR_COUNT: AtomicU64 = AtomicU64::new(0);
static WEBHOOKS_PROCESSED: AtomicU64 = AtomicU64::new(0);
static WEBHOOKS_IGNORED: AtomicU64 = AtomicU64::new(0);

pub fn increment_request_count() {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_error_count() {
    ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_webhooks_processed() {
    WEBHOOKS_PROCESSED.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_webhooks_ignored() {
    WEBHOOKS_IGNORED.fetch_add(1, Ordering::Relaxed);
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MetricsResponse {
    pub http_requests_total: u64,
    pub http_errors_total: u64,
    pub webhooks_processed_total: u64,
    pub webhooks_ignored_total: u64,
}

impl MetricsResponse {
    pub fn snapshot() -> Self {
        Self {
            http_requests_total: REQUEST_COUNT.load(Ordering::Relaxed),
            http_errors_total: ERROR_COUNT.load(Ordering::Relaxed),
            webhooks_processed_total: WEBHOOKS_PROCESSED.load(Ordering::Relaxed),
            webhooks_ignored_total: WEBHOOKS_IGNORED.load(Ordering::Relaxed),
        }
    }

    pub fn to_prometheus(&self) -> String {
        format!(
            "# HELP http_requests_total Total number of HTTP requests\n\
             # TYPE http_requests_total counter\n\
             http_requests_total {}\n\
             \n\
             # HELP http_errors_total Total number of HTTP 4xx/5xx responses\n\
             # TYPE http_errors_total counter\n\
             http_errors_total {}\n\
             \n\
             # HELP webhooks_processed_total Webhooks that created, updated or deleted a user\n\
             # TYPE webhooks_processed_total counter\n\
             webhooks_processed_total {}\n\
             \n\
             # HELP webhooks_ignored_total Webhooks acknowledged without action\n\
             # TYPE webhooks_ignored_total counter\n\
             webhooks_ignored_total {}\n",
            self.http_requests_total,
            self.http_errors_total,
            self.webhooks_processed_total,
            self.webhooks_ignored_total
        )
    }
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Prometheus text exposition of service counters", body = String, content_type = "text/plain")
    )
)]
pub async fn get_metrics() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(MetricsResponse::snapshot().to_prometheus())
}

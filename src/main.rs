mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::Config,
    database::{MongoConnector, MongoUserStore, UserStore},
    services::WebhookVerifier,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Without a signing secret no webhook can be trusted, so refuse to start
    let config = Config::from_env().map_err(startup_error)?;
    let verifier = WebhookVerifier::new(&config.signing_secret, config.webhook_tolerance_secs)
        .map_err(startup_error)?;

    log::info!("🚀 Starting User Sync Service...");
    log::info!("📊 Database: {}", config.mongodb_database);
    if config.mongodb_uri.is_none() {
        log::warn!("⚠️  MONGODB_URI is not set; webhook deliveries will fail until it is");
    }

    // Connected lazily on the first webhook that needs it
    let connector = web::Data::new(MongoConnector::new(
        config.mongodb_uri.clone(),
        config.mongodb_database.clone(),
    ));
    let user_store: Arc<dyn UserStore> = Arc::new(MongoUserStore::new(connector.clone().into_inner()));
    let user_store = web::Data::from(user_store);
    let verifier = web::Data::new(verifier);

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!("📨 Webhook endpoint: POST http://{}:{}/api/webhooks", config.host, config.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", config.host, config.port);

    let openapi = api::swagger::ApiDoc::openapi();

    HttpServer::new(move || {
        App::new()
            .app_data(connector.clone())
            .app_data(user_store.clone())
            .app_data(verifier.clone())
            .wrap(middleware::RequestMetrics)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone())
            )
            .configure(api::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn startup_error(e: utils::AppError) -> std::io::Error {
    log::error!("❌ {}", e);
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
}

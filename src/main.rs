mod config;
mod core;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{error, middleware, web, App, HttpResponse, HttpServer};
use config::Settings;
use models::ErrorBody;
use routes::AppState;
use services::{CarStore, PriceModel};
use std::sync::Arc;
use tracing::{error, info};

/// Rewrite body deserialization failures into the uniform error envelope.
fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    let body = ErrorBody::new(format!("invalid JSON body: {}", err));
    error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

/// Rewrite query deserialization failures into the uniform error envelope.
fn handle_query_payload_error(
    err: error::QueryPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    let body = ErrorBody::new(format!("invalid query parameters: {}", err));
    error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting car market API service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Connect to PostgreSQL
    let store = Arc::new(
        CarStore::from_settings(&settings.database)
            .await
            .unwrap_or_else(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                panic!("PostgreSQL connection error: {}", e);
            }),
    );

    info!("PostgreSQL store initialized");

    // Load the pre-trained price model
    let model = Arc::new(PriceModel::load(&settings.model.path).unwrap_or_else(|e| {
        error!("Failed to load price model: {}", e);
        panic!("Price model error: {}", e);
    }));

    // Snapshot the label encodings once at startup
    let encoders = Arc::new(store.load_encoder_map().await.unwrap_or_else(|e| {
        error!("Failed to load encoder map: {}", e);
        panic!("Encoder map error: {}", e);
    }));

    // Build application state
    let app_state = AppState {
        store,
        model,
        encoders,
        pagination: settings.pagination.clone(),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::config::PaginationSettings;
use crate::models::{EncoderMap, Envelope, HealthResponse};
use crate::services::{CarStore, PriceModel};

pub mod cars;
pub mod error;
pub mod prediction;
pub mod users;
pub mod visualization;

pub use error::ApiError;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CarStore>,
    pub model: Arc<PriceModel>,
    pub encoders: Arc<EncoderMap>,
    pub pagination: PaginationSettings,
}

/// Health check endpoint
async fn health(state: web::Data<AppState>) -> HttpResponse {
    let status = match state.store.health_check().await {
        Ok(true) => "healthy",
        _ => "degraded",
    };

    HttpResponse::Ok().json(Envelope::success(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    }))
}

/// Configure all API routes under `/api/v1`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health))
            .configure(cars::configure)
            .configure(visualization::configure)
            .configure(prediction::configure)
            .configure(users::configure),
    );
}

use serde::Serialize;
use crate::models::domain::{CarRecord, CarSummary, PriceStats, UserAccount, YearPriceStats};

/// Uniform success envelope: `{"status": "success", "data": ...}`.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self { status: "success", data }
    }
}

/// Uniform error envelope: `{"status": "error", "message": ...}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { status: "error", message: message.into() }
    }
}

/// Payload of `GET /cars`.
#[derive(Debug, Clone, Serialize)]
pub struct CarListData {
    pub cars: Vec<CarRecord>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
    pub limit: i64,
}

/// Payload of `GET /cars/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct CarDetailData {
    pub car: CarRecord,
}

/// Payload of `GET /cars/similar-models`.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarModelsData {
    pub similar_cars: Vec<CarSummary>,
    pub stats: PriceStats,
    pub price_by_year: Vec<YearPriceStats>,
}

/// Payload of `GET /visualization/charts`.
#[derive(Debug, Clone, Serialize)]
pub struct ChartTypesData {
    pub chart_types: Vec<&'static str>,
}

/// Predicted price band: prediction ± 10%.
#[derive(Debug, Clone, Serialize)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

/// One ranked price factor derived from a static importance weight.
#[derive(Debug, Clone, Serialize)]
pub struct Factor {
    pub name: &'static str,
    pub impact: String,
}

/// Payload of `POST /prediction/predict`.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionData {
    pub price: f64,
    #[serde(rename = "priceRange")]
    pub price_range: PriceRange,
    pub confidence: u8,
    pub factors: Vec<Factor>,
}

/// Payload of `GET /users`.
#[derive(Debug, Clone, Serialize)]
pub struct UserListData {
    pub users: Vec<UserAccount>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
    pub limit: i64,
}

/// Payload of `GET /users/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct UserDetailData {
    pub user: UserAccount,
}

/// Payload of user create/update and login responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserMutationData {
    pub user: UserAccount,
    pub message: String,
}

/// Payload of `DELETE /users/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct MessageData {
    pub message: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

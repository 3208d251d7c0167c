use actix_web::{web, HttpResponse};

use crate::core::charts::{self, ChartType};
use crate::models::{CategoricalField, ChartTypesData, Envelope};
use crate::routes::{ApiError, AppState};

/// Top-N cutoffs for the crowded categorical pies and bars.
const TOP_MAKES: i64 = 20;
const TOP_COLORS: i64 = 10;
const TOP_LOCATIONS: i64 = 15;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/visualization")
            .route("/charts", web::get().to(chart_types))
            .route("/{chart_type}", web::get().to(chart)),
    );
}

/// `GET /visualization/charts`: the closed list of supported recipes.
async fn chart_types() -> HttpResponse {
    HttpResponse::Ok().json(Envelope::success(ChartTypesData {
        chart_types: ChartType::ALL.iter().map(|c| c.as_str()).collect(),
    }))
}

/// `GET /visualization/{chart_type}`: run one aggregation recipe.
async fn chart(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let raw = path.into_inner();
    let chart_type: ChartType = raw
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("unsupported chart type: {}", raw)))?;

    let store = &state.store;
    let result = match chart_type {
        ChartType::MileagePriceRelation => {
            charts::mileage_price_chart(store.mileage_price_pairs().await?)
        }
        ChartType::YearPriceRelation => {
            charts::year_price_chart(store.year_price_pairs().await?)
        }
        ChartType::ManufacturerDistribution => charts::manufacturer_chart(
            store
                .category_counts(CategoricalField::Make, Some(TOP_MAKES))
                .await?,
        ),
        ChartType::TransactionTimeDistribution => {
            charts::transaction_time_chart(store.month_counts().await?)
        }
        ChartType::ManufacturingYearDistribution => {
            charts::manufacturing_year_chart(store.year_counts().await?)
        }
        ChartType::PriceDistribution => {
            charts::price_distribution_chart(store.prices().await?)
        }
        ChartType::BodyTypeDistribution => charts::body_type_chart(
            store
                .category_counts(CategoricalField::BodyType, None)
                .await?,
        ),
        ChartType::CylindersDistribution => {
            charts::cylinders_chart(store.cylinder_counts().await?)
        }
        ChartType::TransmissionDistribution => charts::transmission_chart(
            store
                .category_counts(CategoricalField::Transmission, None)
                .await?,
        ),
        ChartType::ColorDistribution => charts::color_chart(
            store
                .category_counts(CategoricalField::Color, Some(TOP_COLORS))
                .await?,
        ),
        ChartType::FuelTypeDistribution => charts::fuel_type_chart(
            store
                .category_counts(CategoricalField::FuelType, None)
                .await?,
        ),
        ChartType::MileageDistribution => {
            charts::mileage_distribution_chart(store.mileages().await?)
        }
        ChartType::LocationDistribution => charts::location_chart(
            store
                .category_counts(CategoricalField::Location, Some(TOP_LOCATIONS))
                .await?,
        ),
    };

    Ok(HttpResponse::Ok().json(Envelope::success(result)))
}

use actix_web::{web, HttpResponse};

use crate::core::{filters::FilterCriteria, pagination, similar};
use crate::models::{
    CarDetailData, CarListData, CarListQuery, Envelope, SimilarModelsData, SimilarModelsQuery,
};
use crate::routes::{ApiError, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cars")
            .route("", web::get().to(list_cars))
            // Registered before the id matcher so "similar-models" is never
            // parsed as a car id.
            .route("/similar-models", web::get().to(similar_models))
            .route("/{id}", web::get().to(car_detail)),
    );
}

/// `GET /cars` with optional filters and pagination.
async fn list_cars(
    state: web::Data<AppState>,
    query: web::Query<CarListQuery>,
) -> Result<HttpResponse, ApiError> {
    let criteria = FilterCriteria::from_query(&query);
    let window = pagination::resolve(query.page, query.limit, &state.pagination);

    let total = state.store.count_cars(&criteria).await?;
    let cars = state
        .store
        .list_cars(&criteria, window.limit, window.offset)
        .await?;

    tracing::debug!(
        "listed {} of {} cars (page {}, limit {})",
        cars.len(),
        total,
        window.page,
        window.limit
    );

    Ok(HttpResponse::Ok().json(Envelope::success(CarListData {
        cars,
        total,
        page: window.page,
        total_pages: pagination::total_pages(total, window.limit),
        limit: window.limit,
    })))
}

/// `GET /cars/{id}`.
async fn car_detail(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let car = state
        .store
        .car_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("not found".to_string()))?;

    Ok(HttpResponse::Ok().json(Envelope::success(CarDetailData { car })))
}

/// `GET /cars/similar-models?make=...&model=...`
///
/// Exact make+model match first; when nothing matches exactly, fall back to
/// a substring match on both fields.
async fn similar_models(
    state: web::Data<AppState>,
    query: web::Query<SimilarModelsQuery>,
) -> Result<HttpResponse, ApiError> {
    let make = query.make.as_deref().filter(|s| !s.is_empty());
    let model = query.model.as_deref().filter(|s| !s.is_empty());

    let (make, model) = match (make, model) {
        (Some(make), Some(model)) => (make, model),
        _ => {
            return Err(ApiError::BadRequest(
                "missing required parameters: make and model".to_string(),
            ))
        }
    };

    let mut cars = state.store.similar_exact(make, model).await?;
    if cars.is_empty() {
        tracing::debug!("no exact match for {} {}, trying fuzzy", make, model);
        cars = state.store.similar_fuzzy(make, model).await?;
    }

    let stats = similar::price_stats(&cars);
    let price_by_year = similar::price_by_year(&cars);

    Ok(HttpResponse::Ok().json(Envelope::success(SimilarModelsData {
        similar_cars: cars,
        stats,
        price_by_year,
    })))
}

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::core::{features, prediction};
use crate::models::{CategoricalField, Envelope, ModelsByMakeQuery, PredictRequest};
use crate::routes::{ApiError, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/prediction")
            .route("/options", web::get().to(options))
            .route("/models", web::get().to(models_by_make))
            .route("/predict", web::post().to(predict)),
    );
}

/// `GET /prediction/options`: every categorical label with its encoded
/// integer, grouped per field, from the startup encoder snapshot.
async fn options(state: web::Data<AppState>) -> HttpResponse {
    let mut payload = serde_json::Map::new();

    for field in CategoricalField::ALL {
        // Models get the richer make-qualified list below.
        if field == CategoricalField::Model {
            continue;
        }
        let entries: Vec<serde_json::Value> = state
            .encoders
            .options(field)
            .iter()
            .map(|opt| {
                json!({
                    field.label_key(): opt.label,
                    field.encoded_key(): opt.code,
                })
            })
            .collect();
        payload.insert(field.options_key().to_string(), entries.into());
    }

    let models: Vec<serde_json::Value> = state
        .encoders
        .model_options()
        .iter()
        .map(|opt| {
            json!({
                "Make": opt.make,
                "Model": opt.model,
                "Model_encoded": opt.code,
            })
        })
        .collect();
    payload.insert("models".to_string(), models.into());

    HttpResponse::Ok().json(Envelope::success(payload))
}

/// `GET /prediction/models?make=...`: model options for one make.
async fn models_by_make(
    state: web::Data<AppState>,
    query: web::Query<ModelsByMakeQuery>,
) -> Result<HttpResponse, ApiError> {
    let make = query
        .make
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing required parameter: make".to_string()))?;

    let models = state.store.models_for_make(make).await?;
    let entries: Vec<serde_json::Value> = models
        .iter()
        .map(|opt| {
            json!({
                "Model": opt.label,
                "Model_encoded": opt.code,
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(Envelope::success(json!({ "models": entries }))))
}

/// `POST /prediction/predict`: assemble the feature vector, score it, and
/// shape the response with the banded range and ranked factors.
async fn predict(
    state: web::Data<AppState>,
    body: web::Json<PredictRequest>,
) -> Result<HttpResponse, ApiError> {
    let vector = features::assemble(&body)?;
    let price = state.model.predict(&vector)?;

    tracing::debug!("predicted price {:.0}", price);

    let data = prediction::build_response(price, state.model.feature_importances());
    Ok(HttpResponse::Ok().json(Envelope::success(data)))
}

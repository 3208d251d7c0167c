use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query parameters for `GET /cars`.
///
/// Numeric bounds are typed; a non-numeric value fails query deserialization
/// and is rewritten into a 400 by the query payload error handler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year_min: Option<i64>,
    pub year_max: Option<i64>,
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    pub mileage_min: Option<i64>,
    pub mileage_max: Option<i64>,
    pub body_type: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub color: Option<String>,
    pub location: Option<String>,
}

/// Query parameters for `GET /cars/similar-models`.
#[derive(Debug, Clone, Deserialize)]
pub struct SimilarModelsQuery {
    pub make: Option<String>,
    pub model: Option<String>,
}

/// Query parameters for `GET /prediction/models`.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsByMakeQuery {
    pub make: Option<String>,
}

/// A feature value as supplied by the client: a JSON number or a numeric
/// string. Coercion to an integer happens in the feature assembler so the
/// offending field can be named on failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl FeatureValue {
    /// Coerce to an integer the way the scoring pipeline expects.
    ///
    /// Floats truncate toward zero; strings must parse as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FeatureValue::Int(v) => Some(*v),
            FeatureValue::Float(f) => Some(f.trunc() as i64),
            FeatureValue::Text(s) => s.trim().parse::<i64>().ok(),
        }
    }
}

/// Body of `POST /prediction/predict`.
///
/// Field names mirror the encoded dataset columns exactly; unknown keys are
/// rejected up front instead of being coerced field by field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictRequest {
    #[serde(rename = "Make_encoded")]
    pub make_encoded: Option<FeatureValue>,
    #[serde(rename = "Model_encoded")]
    pub model_encoded: Option<FeatureValue>,
    #[serde(rename = "Year")]
    pub year: Option<FeatureValue>,
    #[serde(rename = "Mileage")]
    pub mileage: Option<FeatureValue>,
    #[serde(rename = "Cylinders")]
    pub cylinders: Option<FeatureValue>,
    #[serde(rename = "Body_Type_encoded")]
    pub body_type_encoded: Option<FeatureValue>,
    #[serde(rename = "Transmission_encoded")]
    pub transmission_encoded: Option<FeatureValue>,
    #[serde(rename = "Fuel_Type_encoded")]
    pub fuel_type_encoded: Option<FeatureValue>,
    #[serde(rename = "Color_encoded")]
    pub color_encoded: Option<FeatureValue>,
    #[serde(rename = "Location_encoded")]
    pub location_encoded: Option<FeatureValue>,
}

/// Query parameters for `GET /users`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub name: Option<String>,
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(length(min = 1))]
    pub role: String,
}

/// Body of `PUT /users/{id}`; absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.password.is_none() && self.role.is_none()
    }
}

/// Body of `POST /login`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub password: String,
}

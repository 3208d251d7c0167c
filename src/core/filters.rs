use crate::models::CarListQuery;

/// Optional filter criteria over the plain (non-encoded) vehicle columns.
///
/// String fields become substring predicates, numeric fields independent
/// min/max bounds. Absent criteria impose no constraint: the store combines
/// whatever is present with AND, so adding filters never widens a result.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
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

impl FilterCriteria {
    /// Build criteria from the listing query, dropping empty-string values;
    /// an empty parameter means "no filter".
    pub fn from_query(query: &CarListQuery) -> Self {
        Self {
            make: non_empty(&query.make),
            model: non_empty(&query.model),
            year_min: query.year_min,
            year_max: query.year_max,
            price_min: query.price_min,
            price_max: query.price_max,
            mileage_min: query.mileage_min,
            mileage_max: query.mileage_max,
            body_type: non_empty(&query.body_type),
            fuel_type: non_empty(&query.fuel_type),
            transmission: non_empty(&query.transmission),
            color: non_empty(&query.color),
            location: non_empty(&query.location),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.make.is_none()
            && self.model.is_none()
            && self.year_min.is_none()
            && self.year_max.is_none()
            && self.price_min.is_none()
            && self.price_max.is_none()
            && self.mileage_min.is_none()
            && self.mileage_max.is_none()
            && self.body_type.is_none()
            && self.fuel_type.is_none()
            && self.transmission.is_none()
            && self.color.is_none()
            && self.location.is_none()
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|s| !s.is_empty()).map(str::to_string)
}

/// Substring pattern for a bound LIKE/ILIKE parameter.
pub fn like_pattern(value: &str) -> String {
    format!("%{}%", value)
}

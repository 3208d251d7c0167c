use thiserror::Error;

use crate::models::{requests::FeatureValue, PredictRequest};

/// Number of components in the model input vector.
pub const FEATURE_COUNT: usize = 10;

/// Human-readable factor names, index-aligned with the model input order.
pub const FACTOR_NAMES: [&str; FEATURE_COUNT] = [
    "Make",
    "Year",
    "Mileage",
    "Cylinders",
    "Body Type",
    "Transmission",
    "Fuel Type",
    "Color",
    "Location",
    "Model",
];

/// Default cylinder count substituted when the client omits the field.
const DEFAULT_CYLINDERS: i64 = 4;

/// Default location code substituted when the client omits the field.
const DEFAULT_LOCATION: i64 = 0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeatureError {
    #[error("missing required features: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("feature {0} must be numeric")]
    NotNumeric(&'static str),
}

/// Assemble the validated, ordered model input vector from client input.
///
/// The component order must match the order the regression model was fitted
/// with; reordering would silently corrupt predictions, so the layout is
/// fixed here and nowhere else:
/// Make_encoded, Year, Mileage, Cylinders, Body_Type_encoded,
/// Transmission_encoded, Fuel_Type_encoded, Color_encoded,
/// Location_encoded, Model_encoded.
///
/// The eight required fields are checked together so a single error names
/// every omission. `Location_encoded` defaults to 0 and `Cylinders` to 4;
/// both are documented fallbacks, not data-driven imputations. This
/// function never touches the database.
pub fn assemble(request: &PredictRequest) -> Result<[f64; FEATURE_COUNT], FeatureError> {
    let required: [(&'static str, Option<&FeatureValue>); 8] = [
        ("Make_encoded", request.make_encoded.as_ref()),
        ("Model_encoded", request.model_encoded.as_ref()),
        ("Year", request.year.as_ref()),
        ("Mileage", request.mileage.as_ref()),
        ("Body_Type_encoded", request.body_type_encoded.as_ref()),
        ("Transmission_encoded", request.transmission_encoded.as_ref()),
        ("Fuel_Type_encoded", request.fuel_type_encoded.as_ref()),
        ("Color_encoded", request.color_encoded.as_ref()),
    ];

    let missing: Vec<&'static str> = required
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(FeatureError::Missing(missing));
    }

    let coerce = |name: &'static str, value: Option<&FeatureValue>| -> Result<i64, FeatureError> {
        match value {
            Some(v) => v.as_int().ok_or(FeatureError::NotNumeric(name)),
            None => unreachable!("required field presence checked above"),
        }
    };

    let make = coerce("Make_encoded", request.make_encoded.as_ref())?;
    let model = coerce("Model_encoded", request.model_encoded.as_ref())?;
    let year = coerce("Year", request.year.as_ref())?;
    let mileage = coerce("Mileage", request.mileage.as_ref())?;
    let body_type = coerce("Body_Type_encoded", request.body_type_encoded.as_ref())?;
    let transmission = coerce("Transmission_encoded", request.transmission_encoded.as_ref())?;
    let fuel_type = coerce("Fuel_Type_encoded", request.fuel_type_encoded.as_ref())?;
    let color = coerce("Color_encoded", request.color_encoded.as_ref())?;

    let cylinders = match request.cylinders.as_ref() {
        Some(value) => value.as_int().ok_or(FeatureError::NotNumeric("Cylinders"))?,
        None => DEFAULT_CYLINDERS,
    };
    let location = match request.location_encoded.as_ref() {
        Some(value) => value
            .as_int()
            .ok_or(FeatureError::NotNumeric("Location_encoded"))?,
        None => DEFAULT_LOCATION,
    };

    Ok([
        make as f64,
        year as f64,
        mileage as f64,
        cylinders as f64,
        body_type as f64,
        transmission as f64,
        fuel_type as f64,
        color as f64,
        location as f64,
        model as f64,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> PredictRequest {
        serde_json::from_value(serde_json::json!({
            "Make_encoded": 12,
            "Model_encoded": 340,
            "Year": 2019,
            "Mileage": 43000,
            "Cylinders": 6,
            "Body_Type_encoded": 3,
            "Transmission_encoded": 1,
            "Fuel_Type_encoded": 2,
            "Color_encoded": 5,
            "Location_encoded": 9
        }))
        .unwrap()
    }

    #[test]
    fn test_assemble_fixed_order() {
        let vector = assemble(&full_request()).unwrap();
        assert_eq!(
            vector,
            [12.0, 2019.0, 43000.0, 6.0, 3.0, 1.0, 2.0, 5.0, 9.0, 340.0]
        );
    }

    #[test]
    fn test_missing_fields_enumerated() {
        let mut request = full_request();
        request.year = None;
        request.color_encoded = None;

        let err = assemble(&request).unwrap_err();
        assert_eq!(err, FeatureError::Missing(vec!["Year", "Color_encoded"]));
        assert!(err.to_string().contains("Year"));
        assert!(err.to_string().contains("Color_encoded"));
    }

    #[test]
    fn test_optional_defaults() {
        let mut request = full_request();
        request.cylinders = None;
        request.location_encoded = None;

        let vector = assemble(&request).unwrap();
        assert_eq!(vector[3], 4.0); // Cylinders default
        assert_eq!(vector[8], 0.0); // Location_encoded default
    }

    #[test]
    fn test_string_values_coerce() {
        let request: PredictRequest = serde_json::from_value(serde_json::json!({
            "Make_encoded": "12",
            "Model_encoded": "340",
            "Year": "2019",
            "Mileage": "43000",
            "Body_Type_encoded": "3",
            "Transmission_encoded": "1",
            "Fuel_Type_encoded": "2",
            "Color_encoded": "5"
        }))
        .unwrap();

        let vector = assemble(&request).unwrap();
        assert_eq!(vector[0], 12.0);
        assert_eq!(vector[1], 2019.0);
    }

    #[test]
    fn test_non_numeric_names_offending_field() {
        let mut request = full_request();
        request.mileage = Some(FeatureValue::Text("lots".to_string()));

        let err = assemble(&request).unwrap_err();
        assert_eq!(err, FeatureError::NotNumeric("Mileage"));
        assert_eq!(err.to_string(), "feature Mileage must be numeric");
    }

    #[test]
    fn test_non_numeric_optional_field_still_fails() {
        let mut request = full_request();
        request.cylinders = Some(FeatureValue::Text("four".to_string()));

        let err = assemble(&request).unwrap_err();
        assert_eq!(err, FeatureError::NotNumeric("Cylinders"));
    }
}

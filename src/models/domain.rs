use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A full vehicle record as stored in `car_info`.
///
/// JSON field names keep the capitalized column spelling of the dataset
/// export so existing front-end consumers keep working.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CarRecord {
    pub id: i32,
    #[serde(rename = "Make")]
    pub make: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Price")]
    pub price: i64,
    #[serde(rename = "Mileage")]
    pub mileage: i64,
    #[serde(rename = "Body_Type")]
    pub body_type: String,
    #[serde(rename = "Cylinders")]
    pub cylinders: Option<i32>,
    #[serde(rename = "Transmission")]
    pub transmission: String,
    #[serde(rename = "Fuel_Type")]
    pub fuel_type: String,
    #[serde(rename = "Color")]
    pub color: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Description")]
    pub description: Option<String>,
}

/// Vehicle projection returned by the similar-listings comparator.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CarSummary {
    pub id: i32,
    #[serde(rename = "Make")]
    pub make: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Price")]
    pub price: i64,
    #[serde(rename = "Mileage")]
    pub mileage: i64,
    #[serde(rename = "Body_Type")]
    pub body_type: String,
    #[serde(rename = "Cylinders")]
    pub cylinders: Option<i32>,
    #[serde(rename = "Transmission")]
    pub transmission: String,
    #[serde(rename = "Fuel_Type")]
    pub fuel_type: String,
    #[serde(rename = "Color")]
    pub color: String,
    #[serde(rename = "Location")]
    pub location: String,
}

/// Summary statistics over a set of matched listings.
///
/// All fields are zero when the set is empty; an empty match is not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceStats {
    pub avg_price: f64,
    pub min_price: i64,
    pub max_price: i64,
    pub count: i64,
}

/// Per-year price breakdown entry for similar listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearPriceStats {
    pub year: i32,
    pub avg_price: f64,
    pub min_price: i64,
    pub max_price: i64,
    pub count: i64,
}

/// Categorical vehicle fields that carry a parallel label-encoded column.
///
/// The encoding is produced by an external, fixed label encoder: the same
/// string always maps to the same integer within an encoder snapshot, and
/// codes are assigned per field (not globally unique across fields).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalField {
    Make,
    Model,
    BodyType,
    Transmission,
    FuelType,
    Color,
    Location,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 7] = [
        CategoricalField::Make,
        CategoricalField::Model,
        CategoricalField::BodyType,
        CategoricalField::Transmission,
        CategoricalField::FuelType,
        CategoricalField::Color,
        CategoricalField::Location,
    ];

    /// Database column holding the human-readable value.
    pub fn column(self) -> &'static str {
        match self {
            CategoricalField::Make => "make",
            CategoricalField::Model => "model",
            CategoricalField::BodyType => "body_type",
            CategoricalField::Transmission => "transmission",
            CategoricalField::FuelType => "fuel_type",
            CategoricalField::Color => "color",
            CategoricalField::Location => "location",
        }
    }

    /// Database column holding the label-encoded integer.
    pub fn encoded_column(self) -> &'static str {
        match self {
            CategoricalField::Make => "make_encoded",
            CategoricalField::Model => "model_encoded",
            CategoricalField::BodyType => "body_type_encoded",
            CategoricalField::Transmission => "transmission_encoded",
            CategoricalField::FuelType => "fuel_type_encoded",
            CategoricalField::Color => "color_encoded",
            CategoricalField::Location => "location_encoded",
        }
    }

    /// JSON key for the readable value in option payloads.
    pub fn label_key(self) -> &'static str {
        match self {
            CategoricalField::Make => "Make",
            CategoricalField::Model => "Model",
            CategoricalField::BodyType => "Body_Type",
            CategoricalField::Transmission => "Transmission",
            CategoricalField::FuelType => "Fuel_Type",
            CategoricalField::Color => "Color",
            CategoricalField::Location => "Location",
        }
    }

    /// JSON key for the encoded value in option payloads.
    pub fn encoded_key(self) -> &'static str {
        match self {
            CategoricalField::Make => "Make_encoded",
            CategoricalField::Model => "Model_encoded",
            CategoricalField::BodyType => "Body_Type_encoded",
            CategoricalField::Transmission => "Transmission_encoded",
            CategoricalField::FuelType => "Fuel_Type_encoded",
            CategoricalField::Color => "Color_encoded",
            CategoricalField::Location => "Location_encoded",
        }
    }

    /// Key under which this field's options appear in `/prediction/options`.
    pub fn options_key(self) -> &'static str {
        match self {
            CategoricalField::Make => "makes",
            CategoricalField::Model => "models",
            CategoricalField::BodyType => "body_types",
            CategoricalField::Transmission => "transmissions",
            CategoricalField::FuelType => "fuel_types",
            CategoricalField::Color => "colors",
            CategoricalField::Location => "locations",
        }
    }
}

/// One (label, encoded) pair for a categorical field.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EncodedOption {
    pub label: String,
    pub code: i32,
}

/// A model option qualified by its make, as served in `/prediction/options`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ModelOption {
    pub make: String,
    pub model: String,
    pub code: i32,
}

/// Immutable per-field label-encoding snapshot, loaded once at startup.
///
/// Replaces ad-hoc per-request column lookups with a typed accessor.
/// Option lists are kept in ascending label order as loaded.
#[derive(Debug, Clone)]
pub struct EncoderMap {
    options: HashMap<CategoricalField, Vec<EncodedOption>>,
    models: Vec<ModelOption>,
}

impl EncoderMap {
    pub fn new(
        options: HashMap<CategoricalField, Vec<EncodedOption>>,
        models: Vec<ModelOption>,
    ) -> Self {
        Self { options, models }
    }

    /// All (label, code) pairs for a field, ascending by label.
    pub fn options(&self, field: CategoricalField) -> &[EncodedOption] {
        self.options.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Make-qualified model options.
    pub fn model_options(&self) -> &[ModelOption] {
        &self.models
    }

    /// Resolve a label to its encoded integer for the given field.
    pub fn encode(&self, field: CategoricalField, value: &str) -> Option<i32> {
        self.options(field)
            .iter()
            .find(|opt| opt.label == value)
            .map(|opt| opt.code)
    }
}

/// Count of rows sharing a categorical label.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CategoryCount {
    pub label: String,
    pub count: i64,
}

/// Count of rows sharing an integer-valued column (year, cylinders).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct NumericCount {
    pub value: i32,
    pub count: i64,
}

/// Axis descriptor attached to scatter and bar charts.
#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl Axis {
    pub fn linear(title: impl Into<String>) -> Self {
        Self { title: title.into(), kind: "linear" }
    }

    pub fn category(title: impl Into<String>) -> Self {
        Self { title: title.into(), kind: "category" }
    }
}

/// Chart-ready aggregation result.
///
/// The variant tag serializes as `chart_type`, matching the payload shape
/// the front-end chart layer renders without field-name guessing.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "chart_type", rename_all = "lowercase")]
pub enum ChartResult {
    Scatter {
        title: String,
        #[serde(rename = "xAxis")]
        x_axis: Axis,
        #[serde(rename = "yAxis")]
        y_axis: Axis,
        data: Vec<serde_json::Value>,
    },
    Bar {
        title: String,
        #[serde(rename = "xAxis")]
        x_axis: Axis,
        #[serde(rename = "yAxis")]
        y_axis: Axis,
        data: Vec<serde_json::Value>,
    },
    Pie {
        title: String,
        data: Vec<serde_json::Value>,
        label_field: &'static str,
        value_field: &'static str,
    },
}

/// User account row; passwords never leave the store layer.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserAccount {
    pub id: i32,
    pub name: String,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoder_map_lookup() {
        let mut options = HashMap::new();
        options.insert(
            CategoricalField::Make,
            vec![
                EncodedOption { label: "Audi".to_string(), code: 0 },
                EncodedOption { label: "Toyota".to_string(), code: 37 },
            ],
        );
        let map = EncoderMap::new(options, vec![]);

        assert_eq!(map.encode(CategoricalField::Make, "Toyota"), Some(37));
        assert_eq!(map.encode(CategoricalField::Make, "DeLorean"), None);
        assert_eq!(map.encode(CategoricalField::Color, "Red"), None);
    }

    #[test]
    fn test_categorical_field_keys() {
        assert_eq!(CategoricalField::BodyType.column(), "body_type");
        assert_eq!(CategoricalField::BodyType.encoded_column(), "body_type_encoded");
        assert_eq!(CategoricalField::BodyType.label_key(), "Body_Type");
        assert_eq!(CategoricalField::BodyType.encoded_key(), "Body_Type_encoded");
        assert_eq!(CategoricalField::BodyType.options_key(), "body_types");
    }

    #[test]
    fn test_car_record_serializes_original_keys() {
        let record = CarRecord {
            id: 1,
            make: "Toyota".to_string(),
            model: "Corolla".to_string(),
            year: 2019,
            price: 52000,
            mileage: 43000,
            body_type: "Sedan".to_string(),
            cylinders: Some(4),
            transmission: "Automatic".to_string(),
            fuel_type: "Gasoline".to_string(),
            color: "White".to_string(),
            location: "Dubai".to_string(),
            date: "2024-03-18".to_string(),
            description: None,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Make"], "Toyota");
        assert_eq!(json["Body_Type"], "Sedan");
        assert_eq!(json["Fuel_Type"], "Gasoline");
        assert_eq!(json["Cylinders"], 4);
    }
}

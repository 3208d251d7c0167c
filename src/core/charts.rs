use serde_json::json;
use std::fmt;
use std::str::FromStr;

use crate::models::{Axis, CategoryCount, ChartResult, NumericCount};

/// Number of equal-width bins for price/mileage distributions.
const DISTRIBUTION_BINS: usize = 10;

/// Quantile used to trim outliers on unbounded numeric fields.
const TRIM_QUANTILE: f64 = 0.99;

/// Closed set of supported chart recipes.
///
/// Unknown identifiers are rejected once at the API boundary; every variant
/// here is matched exhaustively, so a new recipe cannot be added without a
/// compile error pointing at the dispatch site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartType {
    MileagePriceRelation,
    YearPriceRelation,
    ManufacturerDistribution,
    TransactionTimeDistribution,
    ManufacturingYearDistribution,
    PriceDistribution,
    BodyTypeDistribution,
    CylindersDistribution,
    TransmissionDistribution,
    ColorDistribution,
    FuelTypeDistribution,
    MileageDistribution,
    LocationDistribution,
}

impl ChartType {
    pub const ALL: [ChartType; 13] = [
        ChartType::MileagePriceRelation,
        ChartType::YearPriceRelation,
        ChartType::ManufacturerDistribution,
        ChartType::TransactionTimeDistribution,
        ChartType::ManufacturingYearDistribution,
        ChartType::PriceDistribution,
        ChartType::BodyTypeDistribution,
        ChartType::CylindersDistribution,
        ChartType::TransmissionDistribution,
        ChartType::ColorDistribution,
        ChartType::FuelTypeDistribution,
        ChartType::MileageDistribution,
        ChartType::LocationDistribution,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChartType::MileagePriceRelation => "mileage_price_relation",
            ChartType::YearPriceRelation => "year_price_relation",
            ChartType::ManufacturerDistribution => "manufacturer_distribution",
            ChartType::TransactionTimeDistribution => "transaction_time_distribution",
            ChartType::ManufacturingYearDistribution => "manufacturing_year_distribution",
            ChartType::PriceDistribution => "price_distribution",
            ChartType::BodyTypeDistribution => "body_type_distribution",
            ChartType::CylindersDistribution => "cylinders_distribution",
            ChartType::TransmissionDistribution => "transmission_distribution",
            ChartType::ColorDistribution => "color_distribution",
            ChartType::FuelTypeDistribution => "fuel_type_distribution",
            ChartType::MileageDistribution => "mileage_distribution",
            ChartType::LocationDistribution => "location_distribution",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartType::ALL
            .iter()
            .copied()
            .find(|chart| chart.as_str() == s)
            .ok_or(())
    }
}

/// Quantile of a sample with linear interpolation between order statistics.
pub fn quantile(values: &[i64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted: Vec<i64> = values.to_vec();
    sorted.sort_unstable();

    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;

    let low = sorted[lower] as f64;
    let high = sorted[upper] as f64;
    Some(low + (high - low) * weight)
}

/// Mileage vs. price scatter; both axes trimmed to the 99th percentile.
pub fn mileage_price_chart(pairs: Vec<(i64, i64)>) -> ChartResult {
    let mileages: Vec<i64> = pairs.iter().map(|(m, _)| *m).collect();
    let prices: Vec<i64> = pairs.iter().map(|(_, p)| *p).collect();
    let mileage_cap = quantile(&mileages, TRIM_QUANTILE).unwrap_or(f64::INFINITY);
    let price_cap = quantile(&prices, TRIM_QUANTILE).unwrap_or(f64::INFINITY);

    let data = pairs
        .into_iter()
        .filter(|(m, p)| (*m as f64) <= mileage_cap && (*p as f64) <= price_cap)
        .map(|(m, p)| json!({ "Mileage": m, "Price": p }))
        .collect();

    ChartResult::Scatter {
        title: "Mileage vs. price".to_string(),
        x_axis: Axis::linear("Mileage (km)"),
        y_axis: Axis::linear("Price (¥)"),
        data,
    }
}

/// Production year vs. price scatter; price trimmed to the 99th percentile.
pub fn year_price_chart(pairs: Vec<(i32, i64)>) -> ChartResult {
    let prices: Vec<i64> = pairs.iter().map(|(_, p)| *p).collect();
    let price_cap = quantile(&prices, TRIM_QUANTILE).unwrap_or(f64::INFINITY);

    let data = pairs
        .into_iter()
        .filter(|(_, p)| (*p as f64) <= price_cap)
        .map(|(y, p)| json!({ "Year": y, "Price": p }))
        .collect();

    ChartResult::Scatter {
        title: "Production year vs. price".to_string(),
        x_axis: Axis::linear("Production year"),
        y_axis: Axis::linear("Price (¥)"),
        data,
    }
}

pub fn manufacturer_chart(rows: Vec<CategoryCount>) -> ChartResult {
    ChartResult::Bar {
        title: "Manufacturer distribution".to_string(),
        x_axis: Axis::category("Manufacturer"),
        y_axis: Axis::linear("Vehicle count"),
        data: rows
            .into_iter()
            .map(|row| json!({ "Make": row.label, "count": row.count }))
            .collect(),
    }
}

pub fn transaction_time_chart(rows: Vec<CategoryCount>) -> ChartResult {
    ChartResult::Bar {
        title: "Transaction time distribution".to_string(),
        x_axis: Axis::category("Month"),
        y_axis: Axis::linear("Transaction count"),
        data: rows
            .into_iter()
            .map(|row| json!({ "month": row.label, "count": row.count }))
            .collect(),
    }
}

pub fn manufacturing_year_chart(rows: Vec<NumericCount>) -> ChartResult {
    ChartResult::Bar {
        title: "Production year distribution".to_string(),
        x_axis: Axis::category("Production year"),
        y_axis: Axis::linear("Vehicle count"),
        data: rows
            .into_iter()
            .map(|row| json!({ "Year": row.value, "count": row.count }))
            .collect(),
    }
}

pub fn price_distribution_chart(prices: Vec<i64>) -> ChartResult {
    ChartResult::Bar {
        title: "Price distribution".to_string(),
        x_axis: Axis::category("Price range (¥)"),
        y_axis: Axis::linear("Vehicle count"),
        data: binned_distribution(&prices)
            .into_iter()
            .map(|(range, count)| json!({ "range": range, "count": count }))
            .collect(),
    }
}

pub fn body_type_chart(rows: Vec<CategoryCount>) -> ChartResult {
    ChartResult::Bar {
        title: "Body type distribution".to_string(),
        x_axis: Axis::category("Body type"),
        y_axis: Axis::linear("Vehicle count"),
        data: rows
            .into_iter()
            .map(|row| json!({ "Body_Type": row.label, "count": row.count }))
            .collect(),
    }
}

pub fn cylinders_chart(rows: Vec<NumericCount>) -> ChartResult {
    ChartResult::Pie {
        title: "Cylinder count distribution".to_string(),
        data: rows
            .into_iter()
            .map(|row| json!({ "Cylinders": row.value, "count": row.count }))
            .collect(),
        label_field: "Cylinders",
        value_field: "count",
    }
}

pub fn transmission_chart(rows: Vec<CategoryCount>) -> ChartResult {
    ChartResult::Pie {
        title: "Transmission type distribution".to_string(),
        data: rows
            .into_iter()
            .map(|row| json!({ "Transmission": row.label, "count": row.count }))
            .collect(),
        label_field: "Transmission",
        value_field: "count",
    }
}

pub fn color_chart(rows: Vec<CategoryCount>) -> ChartResult {
    ChartResult::Pie {
        title: "Color distribution".to_string(),
        data: rows
            .into_iter()
            .map(|row| json!({ "Color": row.label, "count": row.count }))
            .collect(),
        label_field: "Color",
        value_field: "count",
    }
}

pub fn fuel_type_chart(rows: Vec<CategoryCount>) -> ChartResult {
    ChartResult::Pie {
        title: "Fuel type distribution".to_string(),
        data: rows
            .into_iter()
            .map(|row| json!({ "Fuel_Type": row.label, "count": row.count }))
            .collect(),
        label_field: "Fuel_Type",
        value_field: "count",
    }
}

pub fn mileage_distribution_chart(mileages: Vec<i64>) -> ChartResult {
    ChartResult::Bar {
        title: "Mileage distribution".to_string(),
        x_axis: Axis::category("Mileage range (km)"),
        y_axis: Axis::linear("Vehicle count"),
        data: binned_distribution(&mileages)
            .into_iter()
            .map(|(range, count)| json!({ "range": range, "count": count }))
            .collect(),
    }
}

pub fn location_chart(rows: Vec<CategoryCount>) -> ChartResult {
    ChartResult::Pie {
        title: "Transaction location distribution".to_string(),
        data: rows
            .into_iter()
            .map(|row| json!({ "Location": row.label, "count": row.count }))
            .collect(),
        label_field: "Location",
        value_field: "count",
    }
}

/// Trim values above the 99th percentile, then split the remaining range
/// into exactly 10 equal-width bins labelled `"{lower}-{upper}"` with
/// truncated integer bounds. Bin counts sum to the trimmed sample size.
pub fn binned_distribution(values: &[i64]) -> Vec<(String, i64)> {
    let cap = match quantile(values, TRIM_QUANTILE) {
        Some(cap) => cap,
        None => return Vec::new(),
    };

    let trimmed: Vec<i64> = values
        .iter()
        .copied()
        .filter(|v| (*v as f64) <= cap)
        .collect();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let min = *trimmed.iter().min().unwrap_or(&0) as f64;
    let max = *trimmed.iter().max().unwrap_or(&0) as f64;
    // Degenerate single-value range still produces ten bins.
    let span = if max > min { max - min } else { 1.0 };
    let width = span / DISTRIBUTION_BINS as f64;

    let mut counts = [0i64; DISTRIBUTION_BINS];
    for value in &trimmed {
        let offset = (*value as f64 - min) / width;
        let index = (offset.floor() as usize).min(DISTRIBUTION_BINS - 1);
        counts[index] += 1;
    }

    counts
        .iter()
        .enumerate()
        .map(|(i, count)| {
            let lower = (min + width * i as f64) as i64;
            let upper = (min + width * (i + 1) as f64) as i64;
            (format!("{}-{}", lower, upper), *count)
        })
        .collect()
}

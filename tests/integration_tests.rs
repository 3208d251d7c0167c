// Integration tests for the car market API library

use carmarket_api::core::charts::{self, ChartType};
use carmarket_api::core::{assemble, build_response, price_by_year, price_stats};
use carmarket_api::models::{CarSummary, CategoryCount, ChartResult, PredictRequest};
use carmarket_api::services::PriceModel;
use serde_json::json;

fn forest_artifact() -> serde_json::Value {
    // Two stumps splitting on Year (index 1) and Mileage (index 2).
    json!({
        "n_features": 10,
        "feature_importances": [0.10, 0.30, 0.25, 0.02, 0.05, 0.03, 0.04, 0.06, 0.01, 0.14],
        "trees": [
            {
                "feature": [1, -2, -2],
                "threshold": [2016.5, 0.0, 0.0],
                "children_left": [1, -1, -1],
                "children_right": [2, -1, -1],
                "value": [0.0, 30000.0, 56000.0]
            },
            {
                "feature": [2, -2, -2],
                "threshold": [80000.0, 0.0, 0.0],
                "children_left": [1, -1, -1],
                "children_right": [2, -1, -1],
                "value": [0.0, 48000.0, 36000.0]
            }
        ]
    })
}

fn summary(id: i32, year: i32, price: i64, mileage: i64) -> CarSummary {
    CarSummary {
        id,
        make: "Honda".to_string(),
        model: "Accord".to_string(),
        year,
        price,
        mileage,
        body_type: "Sedan".to_string(),
        cylinders: Some(4),
        transmission: "Automatic".to_string(),
        fuel_type: "Gasoline".to_string(),
        color: "Black".to_string(),
        location: "Abu Dhabi".to_string(),
    }
}

#[test]
fn test_prediction_pipeline_end_to_end() {
    let model = PriceModel::from_json(forest_artifact()).unwrap();

    let body: PredictRequest = serde_json::from_value(json!({
        "Make_encoded": 15,
        "Model_encoded": 210,
        "Year": 2019,
        "Mileage": 43000,
        "Body_Type_encoded": 7,
        "Transmission_encoded": 0,
        "Fuel_Type_encoded": 1,
        "Color_encoded": 2
    }))
    .unwrap();

    let vector = assemble(&body).unwrap();
    let price = model.predict(&vector).unwrap();
    // Year 2019 > 2016.5 and mileage 43000 <= 80000: (56000 + 48000) / 2
    assert_eq!(price, 52_000.0);

    let data = build_response(price, model.feature_importances());
    assert_eq!(data.price, 52_000.0);
    assert!((data.price_range.low - 46_800.0).abs() < 1e-9);
    assert!((data.price_range.high - 57_200.0).abs() < 1e-9);
    assert_eq!(data.confidence, 90);

    // Importance 0.30 at index 1 maps to the Year factor and ranks first.
    assert_eq!(data.factors[0].name, "Year");
    assert_eq!(data.factors[0].impact, "+30.0%");
    assert_eq!(data.factors[1].name, "Mileage");
    assert_eq!(data.factors.len(), 10);
}

#[test]
fn test_prediction_pipeline_rejects_bad_input() {
    let model = PriceModel::from_json(forest_artifact()).unwrap();

    let body: PredictRequest = serde_json::from_value(json!({
        "Make_encoded": 15
    }))
    .unwrap();
    assert!(assemble(&body).is_err());

    // A short vector never reaches the trees.
    assert!(model.predict(&[2019.0, 43000.0]).is_err());
}

#[test]
fn test_chart_pipeline_shapes() {
    // Scatter over raw pairs with an outlier the trim removes.
    let mut pairs: Vec<(i64, i64)> = (0..500).map(|i| (i * 200, 20_000 + i * 100)).collect();
    pairs.push((9_000_000, 25_000));

    let chart = charts::mileage_price_chart(pairs);
    let rendered = serde_json::to_value(&chart).unwrap();
    assert_eq!(rendered["chart_type"], "scatter");
    assert_eq!(rendered["xAxis"]["type"], "linear");
    assert!(rendered["data"].as_array().unwrap().len() <= 500);

    // Bar over pre-aggregated counts.
    let chart = charts::manufacturer_chart(vec![
        CategoryCount { label: "Toyota".to_string(), count: 180 },
        CategoryCount { label: "Honda".to_string(), count: 120 },
    ]);
    match &chart {
        ChartResult::Bar { data, .. } => assert_eq!(data.len(), 2),
        other => panic!("expected bar chart, got {:?}", other),
    }

    // Every advertised chart identifier parses back to its variant.
    for chart_type in ChartType::ALL {
        assert_eq!(chart_type.as_str().parse::<ChartType>(), Ok(chart_type));
    }
}

#[test]
fn test_similar_listings_pipeline() {
    let cars = vec![
        summary(1, 2020, 90_000, 30_000),
        summary(2, 2020, 70_000, 55_000),
        summary(3, 2018, 50_000, 110_000),
    ];

    let stats = price_stats(&cars);
    assert_eq!(stats.count, 3);
    assert_eq!(stats.avg_price, 70_000.0);
    assert_eq!(stats.min_price, 50_000);
    assert_eq!(stats.max_price, 90_000);

    let by_year = price_by_year(&cars);
    assert_eq!(by_year.len(), 2);
    assert_eq!(by_year[0].year, 2020);
    assert_eq!(by_year[0].avg_price, 80_000.0);
    assert_eq!(by_year[1].year, 2018);

    // Empty result is a valid answer, not an error.
    let empty = price_stats(&[]);
    assert_eq!(empty.count, 0);
    assert_eq!(empty.avg_price, 0.0);
}

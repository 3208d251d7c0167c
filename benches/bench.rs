// Criterion benchmarks for the car market API library

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use carmarket_api::core::{assemble, binned_distribution, build_response};
use carmarket_api::models::PredictRequest;
use carmarket_api::services::PriceModel;
use serde_json::json;

fn sample_values(n: usize) -> Vec<i64> {
    // Deterministic skewed sample resembling a price column.
    (0..n)
        .map(|i| 15_000 + ((i * 7919) % 90_000) as i64 + if i % 97 == 0 { 400_000 } else { 0 })
        .collect()
}

fn sample_request() -> PredictRequest {
    serde_json::from_value(json!({
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

fn sample_model() -> PriceModel {
    // A forest of identical depth-1 stumps is enough to exercise traversal.
    let tree = json!({
        "feature": [1, -2, -2],
        "threshold": [2016.5, 0.0, 0.0],
        "children_left": [1, -1, -1],
        "children_right": [2, -1, -1],
        "value": [0.0, 30000.0, 56000.0]
    });
    let trees: Vec<serde_json::Value> = (0..50).map(|_| tree.clone()).collect();

    PriceModel::from_json(json!({
        "n_features": 10,
        "feature_importances": [0.1, 0.3, 0.2, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.1],
        "trees": trees
    }))
    .unwrap()
}

fn bench_binned_distribution(c: &mut Criterion) {
    let values = sample_values(10_000);
    c.bench_function("binned_distribution_10k", |b| {
        b.iter(|| binned_distribution(black_box(&values)))
    });
}

fn bench_feature_assembly(c: &mut Criterion) {
    let request = sample_request();
    c.bench_function("assemble_features", |b| {
        b.iter(|| assemble(black_box(&request)))
    });
}

fn bench_forest_predict(c: &mut Criterion) {
    let model = sample_model();
    let request = sample_request();
    let vector = assemble(&request).unwrap();

    c.bench_function("forest_predict_50_trees", |b| {
        b.iter(|| model.predict(black_box(&vector)))
    });

    c.bench_function("build_prediction_response", |b| {
        b.iter(|| build_response(black_box(52_000.0), black_box(model.feature_importances())))
    });
}

criterion_group!(
    benches,
    bench_binned_distribution,
    bench_feature_assembly,
    bench_forest_predict
);
criterion_main!(benches);

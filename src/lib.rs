//! REST backend over an encoded used-car dataset: filtered listings,
//! chart-ready aggregations, a similar-listings comparator, and price
//! prediction backed by a pre-trained random-forest regressor.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

pub use config::Settings;
pub use routes::{configure_routes, ApiError, AppState};
pub use services::{CarStore, PriceModel};

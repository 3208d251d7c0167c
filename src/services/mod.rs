// Service exports
pub mod db;
pub mod model;

pub use db::{CarStore, DbError};
pub use model::{ModelError, PriceModel};

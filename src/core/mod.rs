// Core algorithm exports
pub mod charts;
pub mod features;
pub mod filters;
pub mod pagination;
pub mod prediction;
pub mod similar;

pub use charts::{binned_distribution, quantile, ChartType};
pub use features::{assemble, FeatureError, FACTOR_NAMES, FEATURE_COUNT};
pub use filters::{like_pattern, FilterCriteria};
pub use pagination::{resolve, total_pages, PageWindow};
pub use prediction::build_response;
pub use similar::{price_by_year, price_stats};

//! `GeoDash` - location-centric aggregation of weather, marine, air quality,
//! flood, radiation, geocoding and natural-event data
//!
//! Selecting a location fans out to every upstream source at once and folds
//! the results into a single view as they arrive. The classification tables
//! turn raw readings into labelled, colour-coded categories.

pub mod api;
pub mod classification;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod sources;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use config::DashboardConfig;
pub use error::GeodashError;
pub use models::{Coordinate, LocationSelection, SelectionOrigin};
pub use pipeline::{AggregatedWeatherView, Aggregator, Insights, SourceResult, ViewStore};
pub use sources::{SourceError, SourceKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, GeodashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}

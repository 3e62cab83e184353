//! Aggregation pipeline
//!
//! A new [`LocationSelection`](crate::models::LocationSelection) starts a run:
//! the store hands out the next run id and replaces the view wholesale, then
//! every source is dispatched concurrently and publishes into the view as it
//! resolves. Publishing is checked against the current run id, so results of
//! a superseded run never reach the view.

pub mod aggregator;
pub mod insights;
pub mod store;
pub mod view;

pub use aggregator::Aggregator;
pub use insights::{EventStats, FloodInsight, Insights, UvInsight, WaveInsight};
pub use store::ViewStore;
pub use view::{AggregatedWeatherView, Phase, SourceResult, SourceStatus, TOTAL_FAILURE_BANNER};

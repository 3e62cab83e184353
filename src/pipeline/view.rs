//! The aggregated, partially-failing view published to consumers

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{
    AddressRecord, AirQuality, CurrentWeather, DayOutlook, EventsFeed, FloodReading,
    LocationSelection, MarineConditions, SolarRadiation,
};
use crate::sources::{FetchResult, SourceKind};

/// Banner shown when no source could be reached at all
pub const TOTAL_FAILURE_BANNER: &str = "Failed to fetch weather data. Please try again.";

/// Outcome of one source within one aggregation run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum SourceResult<T> {
    /// Dispatched, not resolved yet
    Pending,
    Loaded(T),
    /// Failed with a reason; other sources are unaffected
    Failed(String),
    /// Not dispatched for this run
    Unattempted,
}

/// Payload-free status of a [`SourceResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Pending,
    Loaded,
    Failed,
    Unattempted,
}

impl<T> SourceResult<T> {
    #[must_use]
    pub fn from_fetch(result: FetchResult<T>) -> Self {
        match result {
            Ok(value) => SourceResult::Loaded(value),
            Err(e) => SourceResult::Failed(e.to_string()),
        }
    }

    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            SourceResult::Loaded(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, SourceResult::Loaded(_))
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, SourceResult::Failed(_))
    }

    #[must_use]
    pub fn status(&self) -> SourceStatus {
        match self {
            SourceResult::Pending => SourceStatus::Pending,
            SourceResult::Loaded(_) => SourceStatus::Loaded,
            SourceResult::Failed(_) => SourceStatus::Failed,
            SourceResult::Unattempted => SourceStatus::Unattempted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No selection yet
    Idle,
    Fetching,
    /// Every dispatched source has resolved
    Settled,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedWeatherView {
    pub run_id: u64,
    pub phase: Phase,
    pub selection: Option<LocationSelection>,
    pub current: SourceResult<CurrentWeather>,
    pub forecast: SourceResult<DayOutlook>,
    pub historical: SourceResult<DayOutlook>,
    pub marine: SourceResult<MarineConditions>,
    pub air_quality: SourceResult<AirQuality>,
    pub flood: SourceResult<FloodReading>,
    pub radiation: SourceResult<SolarRadiation>,
    pub geocode: SourceResult<AddressRecord>,
    pub events: SourceResult<EventsFeed>,
    pub banner: Option<String>,
    /// Number of sources that failed in this run
    pub failures: usize,
}

impl AggregatedWeatherView {
    /// View before any selection was made
    #[must_use]
    pub fn idle() -> Self {
        Self {
            run_id: 0,
            phase: Phase::Idle,
            selection: None,
            current: SourceResult::Unattempted,
            forecast: SourceResult::Unattempted,
            historical: SourceResult::Unattempted,
            marine: SourceResult::Unattempted,
            air_quality: SourceResult::Unattempted,
            flood: SourceResult::Unattempted,
            radiation: SourceResult::Unattempted,
            geocode: SourceResult::Unattempted,
            events: SourceResult::Unattempted,
            banner: None,
            failures: 0,
        }
    }

    /// Fresh view for a new run. Nothing from the previous run survives.
    #[must_use]
    pub fn fetching(run_id: u64, selection: LocationSelection) -> Self {
        Self {
            run_id,
            phase: Phase::Fetching,
            selection: Some(selection),
            current: SourceResult::Pending,
            forecast: SourceResult::Pending,
            historical: SourceResult::Pending,
            marine: SourceResult::Pending,
            air_quality: SourceResult::Pending,
            flood: SourceResult::Pending,
            radiation: SourceResult::Pending,
            geocode: SourceResult::Pending,
            events: SourceResult::Pending,
            banner: None,
            failures: 0,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Fetching
    }

    #[must_use]
    pub fn status_of(&self, kind: SourceKind) -> SourceStatus {
        match kind {
            SourceKind::Current => self.current.status(),
            SourceKind::Forecast => self.forecast.status(),
            SourceKind::Historical => self.historical.status(),
            SourceKind::Marine => self.marine.status(),
            SourceKind::AirQuality => self.air_quality.status(),
            SourceKind::Flood => self.flood.status(),
            SourceKind::Radiation => self.radiation.status(),
            SourceKind::Geocode => self.geocode.status(),
            SourceKind::Events => self.events.status(),
        }
    }

    /// Source name to status mapping
    #[must_use]
    pub fn statuses(&self) -> BTreeMap<SourceKind, SourceStatus> {
        SourceKind::ALL
            .into_iter()
            .map(|kind| (kind, self.status_of(kind)))
            .collect()
    }
}

impl Default for AggregatedWeatherView {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;
    use crate::sources::SourceError;

    #[test]
    fn test_fetching_view_is_all_pending() {
        let selection = LocationSelection::map_click(Coordinate::new(1.0, 2.0).unwrap());
        let view = AggregatedWeatherView::fetching(7, selection);
        assert!(view.is_loading());
        assert!(view.statuses().values().all(|s| *s == SourceStatus::Pending));
        assert_eq!(view.statuses().len(), SourceKind::ALL.len());
    }

    #[test]
    fn test_from_fetch() {
        let loaded: SourceResult<u8> = SourceResult::from_fetch(Ok(3));
        assert_eq!(loaded.value(), Some(&3));

        let failed: SourceResult<u8> =
            SourceResult::from_fetch(Err(SourceError::Status { status: 502 }));
        assert!(failed.is_failed());
        assert_eq!(failed.status(), SourceStatus::Failed);
    }

    #[test]
    fn test_serialized_shape() {
        let loaded: SourceResult<u8> = SourceResult::Loaded(4);
        assert_eq!(
            serde_json::to_value(&loaded).unwrap(),
            serde_json::json!({"status": "loaded", "value": 4})
        );
        let pending: SourceResult<u8> = SourceResult::Pending;
        assert_eq!(
            serde_json::to_value(&pending).unwrap(),
            serde_json::json!({"status": "pending"})
        );
    }
}

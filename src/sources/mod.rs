//! Upstream source adapters
//!
//! Each adapter translates one upstream call into a normalized model. They
//! are grouped by provider behind async traits so the aggregation pipeline
//! can be driven by in-memory fakes in tests:
//! - [`WeatherSource`]: Open-Meteo forecast, marine, air quality and radiation
//! - [`GeocodingSource`]: Nominatim forward search and reverse lookup
//! - [`EventsSource`]: NASA EONET natural events

pub mod eonet;
pub mod error;
pub mod http;
pub mod nominatim;
pub mod open_meteo;

use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{
    AddressRecord, AirQuality, Coordinate, CurrentWeather, DayOutlook, EventsFeed, FloodReading,
    MarineConditions, Place, SolarRadiation,
};

pub use eonet::EonetClient;
pub use error::SourceError;
pub use http::UpstreamClient;
pub use nominatim::NominatimClient;
pub use open_meteo::OpenMeteoClient;

pub type FetchResult<T> = std::result::Result<T, SourceError>;

/// Identifies one slot of the aggregated view
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Current,
    Forecast,
    Historical,
    Marine,
    AirQuality,
    Flood,
    Radiation,
    Geocode,
    Events,
}

impl SourceKind {
    pub const ALL: [SourceKind; 9] = [
        SourceKind::Current,
        SourceKind::Forecast,
        SourceKind::Historical,
        SourceKind::Marine,
        SourceKind::AirQuality,
        SourceKind::Flood,
        SourceKind::Radiation,
        SourceKind::Geocode,
        SourceKind::Events,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Current => "current",
            SourceKind::Forecast => "forecast",
            SourceKind::Historical => "historical",
            SourceKind::Marine => "marine",
            SourceKind::AirQuality => "air_quality",
            SourceKind::Flood => "flood",
            SourceKind::Radiation => "radiation",
            SourceKind::Geocode => "geocode",
            SourceKind::Events => "events",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current_weather(&self, coordinate: Coordinate) -> FetchResult<CurrentWeather>;

    /// Outlook for the next day
    async fn forecast(&self, coordinate: Coordinate) -> FetchResult<DayOutlook>;

    /// Daily summary for a past date
    async fn historical(&self, coordinate: Coordinate, date: NaiveDate) -> FetchResult<DayOutlook>;

    async fn marine(&self, coordinate: Coordinate) -> FetchResult<MarineConditions>;

    async fn air_quality(&self, coordinate: Coordinate) -> FetchResult<AirQuality>;

    /// Flood risk derived from precipitation
    async fn flood(&self, coordinate: Coordinate) -> FetchResult<FloodReading>;

    async fn radiation(&self, coordinate: Coordinate) -> FetchResult<SolarRadiation>;
}

#[async_trait]
pub trait GeocodingSource: Send + Sync {
    /// Ranked candidates for free-text input
    async fn search(&self, query: &str) -> FetchResult<Vec<Place>>;

    async fn reverse(&self, coordinate: Coordinate) -> FetchResult<AddressRecord>;
}

#[async_trait]
pub trait EventsSource: Send + Sync {
    async fn natural_events(&self) -> FetchResult<EventsFeed>;
}

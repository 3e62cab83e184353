//! Data models for the GeoDash application
//!
//! This module contains the normalized payloads produced by the source
//! adapters, organized by concern:
//! - Location: coordinates and selections
//! - Weather: current conditions and daily outlooks
//! - Conditions: marine, air quality, flood and radiation readings
//! - Geocode: search candidates and reverse lookup records
//! - Events: the natural events feed

pub mod conditions;
pub mod events;
pub mod geocode;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use conditions::{
    AirQuality, AqiSample, FloodReading, MarineConditions, SolarRadiation, UvSample, WaveSample,
};
pub use events::{EventCategory, EventGeometry, EventSource, EventsFeed, NaturalEvent};
pub use geocode::{AddressRecord, Place, TagPreview};
pub use location::{Coordinate, LocationSelection, SelectionOrigin};
pub use weather::{CurrentWeather, DayOutlook};

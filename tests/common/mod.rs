//! In-memory sources for driving the aggregation pipeline without a network
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Notify;

use geodash::Aggregator;
use geodash::config::DisplayConfig;
use geodash::models::{
    AddressRecord, AirQuality, Coordinate, CurrentWeather, DayOutlook, EventCategory, EventGeometry,
    EventsFeed, FloodReading, MarineConditions, NaturalEvent, Place, SolarRadiation,
};
use geodash::sources::{EventsSource, FetchResult, GeocodingSource, SourceError, WeatherSource};

pub fn transport_error() -> SourceError {
    SourceError::Transport("connection refused".to_string())
}

/// Weather fake. Temperatures echo the latitude so runs can be told apart.
#[derive(Default)]
pub struct FakeWeather {
    /// Returned by every call
    pub failure: Option<SourceError>,
    /// Returned by `current_weather` only
    pub current_failure: Option<SourceError>,
    /// `current_weather` for this latitude blocks until the gate is notified
    pub gated_latitude: Option<f64>,
    pub gate: Arc<Notify>,
    pub historical_dates: Mutex<Vec<NaiveDate>>,
}

impl FakeWeather {
    pub fn failing(error: SourceError) -> Self {
        Self {
            failure: Some(error),
            ..Default::default()
        }
    }

    fn check(&self) -> FetchResult<()> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn outlook(date: NaiveDate, coordinate: Coordinate) -> DayOutlook {
        DayOutlook {
            date,
            temperature_max_c: coordinate.latitude + 5.0,
            temperature_min_c: coordinate.latitude - 5.0,
            weather_code: 3,
            description: "Overcast".to_string(),
        }
    }
}

#[async_trait]
impl WeatherSource for FakeWeather {
    async fn current_weather(&self, coordinate: Coordinate) -> FetchResult<CurrentWeather> {
        if self.gated_latitude == Some(coordinate.latitude) {
            self.gate.notified().await;
        }
        self.check()?;
        if let Some(error) = &self.current_failure {
            return Err(error.clone());
        }

        Ok(CurrentWeather {
            observed_at: "2026-10-17T12:00".to_string(),
            timezone: "GMT".to_string(),
            temperature_c: coordinate.latitude,
            wind_speed_kmh: 12.0,
            wind_direction_deg: 270.0,
            weather_code: 0,
            description: "Clear sky".to_string(),
        })
    }

    async fn forecast(&self, coordinate: Coordinate) -> FetchResult<DayOutlook> {
        self.check()?;
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap_or_default();
        Ok(Self::outlook(date, coordinate))
    }

    async fn historical(&self, coordinate: Coordinate, date: NaiveDate) -> FetchResult<DayOutlook> {
        self.historical_dates.lock().unwrap().push(date);
        self.check()?;
        Ok(Self::outlook(date, coordinate))
    }

    async fn marine(&self, _coordinate: Coordinate) -> FetchResult<MarineConditions> {
        self.check()?;
        Ok(MarineConditions {
            wave_height_m: Some(1.8),
            wave_direction_deg: Some(225.0),
            ..Default::default()
        })
    }

    async fn air_quality(&self, _coordinate: Coordinate) -> FetchResult<AirQuality> {
        self.check()?;
        Ok(AirQuality {
            european_aqi: Some(35.0),
            us_aqi: Some(42.0),
            ..Default::default()
        })
    }

    async fn flood(&self, _coordinate: Coordinate) -> FetchResult<FloodReading> {
        self.check()?;
        Ok(FloodReading::from_precipitation(None, 2.0, 12.0))
    }

    async fn radiation(&self, _coordinate: Coordinate) -> FetchResult<SolarRadiation> {
        self.check()?;
        Ok(SolarRadiation {
            uv_index: Some(6.5),
            ..Default::default()
        })
    }
}

pub struct FakeGeocoding {
    pub reverse_name: Option<String>,
    pub places: Vec<Place>,
}

impl FakeGeocoding {
    pub fn named(name: &str) -> Self {
        Self {
            reverse_name: Some(name.to_string()),
            places: Vec::new(),
        }
    }

    pub fn failing() -> Self {
        Self {
            reverse_name: None,
            places: Vec::new(),
        }
    }
}

#[async_trait]
impl GeocodingSource for FakeGeocoding {
    async fn search(&self, _query: &str) -> FetchResult<Vec<Place>> {
        match &self.reverse_name {
            Some(_) => Ok(self.places.clone()),
            None => Err(transport_error()),
        }
    }

    async fn reverse(&self, coordinate: Coordinate) -> FetchResult<AddressRecord> {
        let name = self.reverse_name.clone().ok_or_else(transport_error)?;
        Ok(AddressRecord {
            place_id: Some(42),
            display_name: name,
            coordinate,
            address: BTreeMap::from([("country".to_string(), "Switzerland".to_string())]),
            extratags: vec![("population".to_string(), "134794".to_string())],
            namedetails: BTreeMap::new(),
        })
    }
}

pub struct FakeEvents {
    pub failure: Option<SourceError>,
}

pub fn wildfire(id: &str, closed: bool) -> NaturalEvent {
    NaturalEvent {
        id: id.to_string(),
        title: format!("Wildfire {id}"),
        description: None,
        link: None,
        closed: closed.then(|| "2026-10-01T00:00:00Z".to_string()),
        categories: vec![EventCategory {
            id: "wildfires".to_string(),
            title: "Wildfires".to_string(),
        }],
        sources: Vec::new(),
        geometry: vec![EventGeometry {
            date: Some("2026-10-10T00:00:00Z".to_string()),
            kind: Some("Point".to_string()),
            coordinates: serde_json::json!([-120.5, 38.2]),
        }],
        created: None,
    }
}

#[async_trait]
impl EventsSource for FakeEvents {
    async fn natural_events(&self) -> FetchResult<EventsFeed> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        Ok(EventsFeed {
            title: "EONET Events".to_string(),
            events: vec![wildfire("EONET_1", false), wildfire("EONET_2", true)],
        })
    }
}

pub fn aggregator(
    weather: FakeWeather,
    geocoding: FakeGeocoding,
    events: FakeEvents,
) -> Arc<Aggregator> {
    Arc::new(Aggregator::new(
        Arc::new(weather),
        Arc::new(geocoding),
        Arc::new(events),
        &DisplayConfig::default(),
    ))
}

pub fn healthy() -> Arc<Aggregator> {
    aggregator(
        FakeWeather::default(),
        FakeGeocoding::named("Bern, Verwaltungskreis Bern-Mittelland, Switzerland"),
        FakeEvents { failure: None },
    )
}

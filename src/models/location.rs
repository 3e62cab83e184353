//! Coordinates and location selections

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::GeodashError;

/// A validated latitude/longitude pair in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = GeodashError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    /// Create a coordinate, rejecting out-of-range or non-finite values
    pub fn new(latitude: f64, longitude: f64) -> crate::Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeodashError::validation(format!(
                "Latitude must be between -90 and 90, got: {latitude}"
            )));
        }

        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeodashError::validation(format!(
                "Longitude must be between -180 and 180, got: {longitude}"
            )));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Format as `lat, lon` with four decimals
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_coordinates())
    }
}

/// Parse coordinates from strings like "46.8182,8.2275" or "46.8182 8.2275"
impl FromStr for Coordinate {
    type Err = GeodashError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = input
            .trim()
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();

        if parts.len() != 2 {
            return Err(GeodashError::validation(
                "Coordinates must be in format 'lat,lon'",
            ));
        }

        let lat = parts[0]
            .parse::<f64>()
            .map_err(|_| GeodashError::validation(format!("Invalid latitude: {}", parts[0])))?;
        let lon = parts[1]
            .parse::<f64>()
            .map_err(|_| GeodashError::validation(format!("Invalid longitude: {}", parts[1])))?;

        Coordinate::new(lat, lon)
    }
}

/// How a selection came about
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOrigin {
    /// A forward-search candidate was picked
    Search,
    /// The user clicked the map
    MapClick,
    /// The browser reported the user's position
    Geolocation,
    /// A natural event was picked from the feed
    Event,
}

impl SelectionOrigin {
    /// Whether the display name is filled in by the run's reverse geocode
    #[must_use]
    pub fn resolves_name(self) -> bool {
        matches!(self, SelectionOrigin::MapClick | SelectionOrigin::Geolocation)
    }
}

/// The currently selected location. Replaced wholesale, never edited field by field.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LocationSelection {
    pub coordinate: Coordinate,
    pub name: Option<String>,
    pub origin: SelectionOrigin,
}

impl LocationSelection {
    /// Selection from a search result pick
    #[must_use]
    pub fn search(coordinate: Coordinate, name: impl Into<String>) -> Self {
        Self {
            coordinate,
            name: Some(name.into()),
            origin: SelectionOrigin::Search,
        }
    }

    /// Selection from a map click; the name arrives later from reverse geocoding
    #[must_use]
    pub fn map_click(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            name: None,
            origin: SelectionOrigin::MapClick,
        }
    }

    /// Selection from a geolocation fix; the name arrives later from reverse geocoding
    #[must_use]
    pub fn geolocation(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            name: None,
            origin: SelectionOrigin::Geolocation,
        }
    }

    /// Selection from a natural event pick
    #[must_use]
    pub fn event(coordinate: Coordinate, title: impl Into<String>) -> Self {
        Self {
            coordinate,
            name: Some(title.into()),
            origin: SelectionOrigin::Event,
        }
    }

    /// Name to show, falling back to the formatted coordinate
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.coordinate.format_coordinates())
    }
}

//! Weather payloads and display helpers

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Current conditions at the selected coordinate
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentWeather {
    /// Observation time as reported upstream (local ISO time)
    pub observed_at: String,
    /// Upstream timezone name
    pub timezone: String,
    /// Temperature in Celsius
    pub temperature_c: f64,
    /// Wind speed in km/h
    pub wind_speed_kmh: f64,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    pub wind_direction_deg: f64,
    /// WMO weather interpretation code
    pub weather_code: u8,
    /// Human-readable description of the weather code
    pub description: String,
}

impl CurrentWeather {
    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.1}°C", self.temperature_c)
    }

    /// Format wind information
    #[must_use]
    pub fn format_wind(&self) -> String {
        format!(
            "{:.1} km/h {}",
            self.wind_speed_kmh,
            compass_point(self.wind_direction_deg)
        )
    }
}

/// Daily summary for a single date (next-day forecast or prior-day history)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DayOutlook {
    pub date: NaiveDate,
    pub temperature_max_c: f64,
    pub temperature_min_c: f64,
    pub weather_code: u8,
    pub description: String,
}

/// Convert an Open-Meteo (WMO) weather code to a human-readable description
#[must_use]
pub fn weather_code_to_description(code: u8) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Drizzle: Light",
        53 => "Drizzle: Moderate",
        55 => "Drizzle: Dense",
        56 => "Freezing Drizzle: Light",
        57 => "Freezing Drizzle: Dense",
        61 => "Rain: Slight",
        63 => "Rain: Moderate",
        65 => "Rain: Heavy",
        66 => "Freezing Rain: Light",
        67 => "Freezing Rain: Heavy",
        71 => "Snow fall: Slight",
        73 => "Snow fall: Moderate",
        75 => "Snow fall: Heavy",
        77 => "Snow grains",
        80 => "Rain showers: Slight",
        81 => "Rain showers: Moderate",
        82 => "Rain showers: Violent",
        85 => "Snow showers: Slight",
        86 => "Snow showers: Heavy",
        95 => "Thunderstorm: Slight/Moderate",
        96 => "Thunderstorm w/ slight hail",
        99 => "Thunderstorm w/ heavy hail",
        _ => "Unknown",
    }
}

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Convert a bearing in degrees to one of 16 compass points
#[must_use]
pub fn compass_point(degrees: f64) -> &'static str {
    if !degrees.is_finite() {
        return "Unknown";
    }
    let sector = (degrees.rem_euclid(360.0) / 22.5).round() as usize % 16;
    COMPASS_POINTS[sector]
}

const CARDINAL_POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Coarser 8-point rose used for sea-state directions. Each sector is
/// 45° wide and starts at its lower edge, so 22.5° is already NE.
#[must_use]
pub fn cardinal_point(degrees: f64) -> &'static str {
    if !degrees.is_finite() {
        return "Unknown";
    }
    let sector = ((degrees.rem_euclid(360.0) + 22.5) / 45.0).floor() as usize % 8;
    CARDINAL_POINTS[sector]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compass_point() {
        assert_eq!(compass_point(0.0), "N");
        assert_eq!(compass_point(45.0), "NE");
        assert_eq!(compass_point(90.0), "E");
        assert_eq!(compass_point(180.0), "S");
        assert_eq!(compass_point(270.0), "W");
        assert_eq!(compass_point(355.0), "N");
        assert_eq!(compass_point(-90.0), "W");
        assert_eq!(compass_point(f64::NAN), "Unknown");
    }

    #[test]
    fn test_cardinal_point_sector_edges() {
        assert_eq!(cardinal_point(0.0), "N");
        assert_eq!(cardinal_point(22.4), "N");
        assert_eq!(cardinal_point(22.5), "NE");
        assert_eq!(cardinal_point(67.5), "E");
        assert_eq!(cardinal_point(200.0), "S");
        assert_eq!(cardinal_point(202.5), "SW");
        assert_eq!(cardinal_point(292.5), "NW");
        assert_eq!(cardinal_point(337.4), "NW");
        assert_eq!(cardinal_point(337.5), "N");
        assert_eq!(cardinal_point(f64::NAN), "Unknown");
        // a 16-point rose would say SSW here
        assert_eq!(compass_point(200.0), "SSW");
    }

    #[test]
    fn test_weather_code_description() {
        assert_eq!(weather_code_to_description(0), "Clear sky");
        assert_eq!(weather_code_to_description(63), "Rain: Moderate");
        assert_eq!(weather_code_to_description(42), "Unknown");
    }

    #[test]
    fn test_format_current_weather() {
        let weather = CurrentWeather {
            observed_at: "2025-06-01T12:00".to_string(),
            timezone: "Europe/Zurich".to_string(),
            temperature_c: 21.46,
            wind_speed_kmh: 12.0,
            wind_direction_deg: 225.0,
            weather_code: 2,
            description: weather_code_to_description(2).to_string(),
        };
        assert_eq!(weather.format_temperature(), "21.5°C");
        assert_eq!(weather.format_wind(), "12.0 km/h SW");
    }
}

//! Marine, air quality, flood and solar radiation payloads

use serde::{Deserialize, Serialize};

use crate::classification::aqi;
use crate::classification::flood::{self, FloodRiskLabel};

/// Current sea state. Every field is optional because inland coordinates come back empty.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct MarineConditions {
    pub observed_at: Option<String>,
    /// Significant wave height in metres
    pub wave_height_m: Option<f64>,
    /// Mean wave direction in degrees
    pub wave_direction_deg: Option<f64>,
    /// Wave period in seconds
    pub wave_period_s: Option<f64>,
    pub wind_wave_height_m: Option<f64>,
    pub wind_wave_direction_deg: Option<f64>,
    pub wind_wave_period_s: Option<f64>,
    pub swell_wave_height_m: Option<f64>,
    pub swell_wave_direction_deg: Option<f64>,
    pub swell_wave_period_s: Option<f64>,
    /// Hourly outlook
    pub hourly: Vec<WaveSample>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WaveSample {
    pub time: String,
    pub wave_height_m: Option<f64>,
    pub wave_direction_deg: Option<f64>,
    pub wave_period_s: Option<f64>,
}

/// Air quality indices at the selected coordinate
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct AirQuality {
    pub observed_at: Option<String>,
    pub european_aqi: Option<f64>,
    pub us_aqi: Option<f64>,
    pub european_aqi_pm2_5: Option<f64>,
    pub european_aqi_pm10: Option<f64>,
    pub us_aqi_pm2_5: Option<f64>,
    pub us_aqi_pm10: Option<f64>,
    pub hourly: Vec<AqiSample>,
}

impl AirQuality {
    /// The worse of the two indices, used for the combined advisory
    #[must_use]
    pub fn worst_index(&self) -> Option<f64> {
        match (self.european_aqi, self.us_aqi) {
            (Some(eu), Some(us)) => Some(aqi::worst_index(eu, us)),
            (Some(v), None) | (None, Some(v)) => Some(v),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AqiSample {
    pub time: String,
    pub european_aqi: Option<f64>,
    pub us_aqi: Option<f64>,
}

/// Flood risk derived locally from precipitation readings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FloodReading {
    pub observed_at: Option<String>,
    /// Current precipitation rate in mm
    pub current_precipitation_mm: f64,
    /// Same-day cumulative precipitation in mm
    pub daily_precipitation_mm: f64,
    /// Derived flood index in [0, 3]
    pub index: u8,
    /// Label kept consistent with `index`
    pub risk: FloodRiskLabel,
}

impl FloodReading {
    /// Build a reading from precipitation, deriving index and label
    #[must_use]
    pub fn from_precipitation(
        observed_at: Option<String>,
        current_precipitation_mm: f64,
        daily_precipitation_mm: f64,
    ) -> Self {
        let (index, risk) =
            flood::derive_flood_index(current_precipitation_mm, daily_precipitation_mm);
        Self {
            observed_at,
            current_precipitation_mm,
            daily_precipitation_mm,
            index,
            risk,
        }
    }
}

/// Solar radiation and UV readings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct SolarRadiation {
    pub observed_at: Option<String>,
    pub uv_index: Option<f64>,
    pub uv_index_clear_sky: Option<f64>,
    /// Irradiance values in W/m²
    pub direct_normal_irradiance: Option<f64>,
    pub diffuse_radiation: Option<f64>,
    pub shortwave_radiation: Option<f64>,
    pub terrestrial_radiation: Option<f64>,
    pub global_tilted_irradiance: Option<f64>,
    pub hourly: Vec<UvSample>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UvSample {
    pub time: String,
    pub uv_index: Option<f64>,
    pub uv_index_clear_sky: Option<f64>,
}

/// Format an irradiance value, switching to kW/m² from 1000 W/m²
#[must_use]
pub fn format_radiation(watts_per_m2: f64) -> String {
    if watts_per_m2 >= 1000.0 {
        format!("{:.1} kW/m²", watts_per_m2 / 1000.0)
    } else {
        format!("{watts_per_m2:.0} W/m²")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worst_index() {
        let mut aq = AirQuality {
            european_aqi: Some(40.0),
            us_aqi: Some(120.0),
            ..Default::default()
        };
        assert_eq!(aq.worst_index(), Some(120.0));

        aq.european_aqi = Some(f64::NAN);
        assert!(aq.worst_index().is_some_and(f64::is_nan));

        aq.european_aqi = Some(40.0);
        aq.us_aqi = None;
        assert_eq!(aq.worst_index(), Some(40.0));

        aq.european_aqi = None;
        assert_eq!(aq.worst_index(), None);
    }

    #[test]
    fn test_flood_reading_keeps_index_and_label_together() {
        let reading = FloodReading::from_precipitation(None, 6.0, 0.0);
        assert_eq!(reading.index, 2);
        assert_eq!(reading.risk, FloodRiskLabel::Medium);
    }

    #[test]
    fn test_format_radiation() {
        assert_eq!(format_radiation(850.4), "850 W/m²");
        assert_eq!(format_radiation(1340.0), "1.3 kW/m²");
    }
}

//! Air Quality Index bands
//!
//! The same table is applied to US AQI and European AQI readings. The
//! combined advisory for a location uses the worse of the two values.

use serde::Serialize;
use std::fmt;

use super::{Band, Category, Tone};
use crate::models::AirQuality;

/// AQI band, ordered from mildest to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AqiBand {
    /// 0-50
    Good,
    /// 51-100
    Moderate,
    /// 101-150
    UnhealthyForSensitiveGroups,
    /// 151-200
    Unhealthy,
    /// 201-300
    VeryUnhealthy,
    /// >300
    Hazardous,
}

impl AqiBand {
    /// Classify an AQI value. Upper bounds are inclusive.
    #[must_use]
    pub fn classify(aqi: f64) -> Self {
        match aqi {
            v if v <= 50.0 => AqiBand::Good,
            v if v <= 100.0 => AqiBand::Moderate,
            v if v <= 150.0 => AqiBand::UnhealthyForSensitiveGroups,
            v if v <= 200.0 => AqiBand::Unhealthy,
            v if v <= 300.0 => AqiBand::VeryUnhealthy,
            _ => AqiBand::Hazardous,
        }
    }
}

impl Band for AqiBand {
    fn label(self) -> &'static str {
        match self {
            AqiBand::Good => "Good",
            AqiBand::Moderate => "Moderate",
            AqiBand::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiBand::Unhealthy => "Unhealthy",
            AqiBand::VeryUnhealthy => "Very Unhealthy",
            AqiBand::Hazardous => "Hazardous",
        }
    }

    fn tone(self) -> Tone {
        match self {
            AqiBand::Good => Tone::Green,
            AqiBand::Moderate => Tone::Yellow,
            AqiBand::UnhealthyForSensitiveGroups => Tone::Orange,
            AqiBand::Unhealthy => Tone::Red,
            AqiBand::VeryUnhealthy => Tone::Purple,
            AqiBand::Hazardous => Tone::Maroon,
        }
    }

    fn advisory(self) -> &'static str {
        match self {
            AqiBand::Good => {
                "Air quality is considered satisfactory, and air pollution poses little or no risk."
            }
            AqiBand::Moderate => {
                "Air quality is acceptable; however, some pollutants may be a concern for a small number of people."
            }
            AqiBand::UnhealthyForSensitiveGroups => {
                "Members of sensitive groups may experience health effects. The general public is not likely to be affected."
            }
            AqiBand::Unhealthy => {
                "Everyone may begin to experience health effects; members of sensitive groups may experience more serious effects."
            }
            AqiBand::VeryUnhealthy => {
                "Health warnings of emergency conditions. The entire population is more likely to be affected."
            }
            AqiBand::Hazardous => {
                "Health alert: everyone may experience more serious health effects."
            }
        }
    }

    fn severity(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for AqiBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const ELEVATED_AQI_RECOMMENDATIONS: [&str; 4] = [
    "Limit outdoor activities",
    "Keep windows closed",
    "Use air purifiers if available",
    "Monitor symptoms if you have respiratory conditions",
];

/// Health advisory for a location, based on the worse of its two AQI readings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQualityAdvisory {
    pub worst_index: f64,
    pub category: Category,
    /// Protective steps, only present above 100
    pub recommendations: Vec<&'static str>,
    /// True at 50 or below
    pub good_for_outdoor_activities: bool,
}

impl AirQualityAdvisory {
    /// Combine European and US AQI using the worst-case value
    #[must_use]
    pub fn worst_case(european_aqi: f64, us_aqi: f64) -> Self {
        Self::for_index(worst_index(european_aqi, us_aqi))
    }

    /// Advisory for whatever indices the reading carries
    #[must_use]
    pub fn from_reading(reading: &AirQuality) -> Option<Self> {
        reading.worst_index().map(Self::for_index)
    }

    fn for_index(worst_index: f64) -> Self {
        let band = AqiBand::classify(worst_index);
        let recommendations = if band >= AqiBand::UnhealthyForSensitiveGroups {
            ELEVATED_AQI_RECOMMENDATIONS.to_vec()
        } else {
            Vec::new()
        };

        Self {
            worst_index,
            category: band.category(),
            recommendations,
            good_for_outdoor_activities: band == AqiBand::Good,
        }
    }
}

/// The larger of two indices. An unreadable (NaN) index poisons the result
/// so it lands in the most cautious band.
#[must_use]
pub fn worst_index(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

//! Categories derived on demand from whatever the view has loaded

use std::collections::BTreeMap;

use serde::Serialize;

use super::view::AggregatedWeatherView;
use crate::classification::{
    AirQualityAdvisory, Band, Category, FloodBand, FloodGuidance, UvBand, WaveBand,
};
use crate::config::DisplayConfig;
use crate::models::{EventsFeed, TagPreview};
use crate::models::weather::{cardinal_point, compass_point};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UvInsight {
    pub category: Category,
    pub protection: &'static str,
    pub summary: &'static str,
    pub recommendations: &'static [&'static str],
}

impl UvInsight {
    #[must_use]
    pub fn for_index(uv_index: f64) -> Self {
        let band = UvBand::classify(uv_index);
        Self {
            category: band.category(),
            protection: band.protection(),
            summary: band.summary(),
            recommendations: band.recommendations(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloodInsight {
    pub category: Category,
    pub guidance: FloodGuidance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveInsight {
    pub category: Category,
    pub direction: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventStats {
    pub total: usize,
    pub open: usize,
    pub by_category: BTreeMap<String, usize>,
    pub most_active: Option<(String, usize)>,
}

impl EventStats {
    #[must_use]
    pub fn from_feed(feed: &EventsFeed) -> Self {
        Self {
            total: feed.events.len(),
            open: feed.events.iter().filter(|e| !e.is_closed()).count(),
            by_category: feed.category_counts(),
            most_active: feed.most_active_category(),
        }
    }
}

/// Everything a presentation layer needs beyond the raw view
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Insights {
    pub wind_direction: Option<&'static str>,
    pub air_quality: Option<AirQualityAdvisory>,
    pub uv: Option<UvInsight>,
    pub flood: Option<FloodInsight>,
    pub waves: Option<WaveInsight>,
    pub extratags: Option<TagPreview>,
    pub events: Option<EventStats>,
}

impl Insights {
    /// Nothing is derived once the total-failure banner is up
    #[must_use]
    pub fn derive(view: &AggregatedWeatherView, display: &DisplayConfig) -> Self {
        if view.banner.is_some() {
            return Self::default();
        }

        Self {
            wind_direction: view
                .current
                .value()
                .map(|current| compass_point(current.wind_direction_deg)),
            air_quality: view.air_quality.value().and_then(AirQualityAdvisory::from_reading),
            uv: view
                .radiation
                .value()
                .and_then(|radiation| radiation.uv_index)
                .map(UvInsight::for_index),
            flood: view.flood.value().map(|reading| FloodInsight {
                category: FloodBand::from_index(f64::from(reading.index)).category(),
                guidance: FloodGuidance::for_derived(reading.index, reading.risk),
            }),
            waves: view.marine.value().and_then(|marine| {
                marine.wave_height_m.map(|height| WaveInsight {
                    category: WaveBand::classify(height).category(),
                    direction: marine.wave_direction_deg.map(cardinal_point),
                })
            }),
            extratags: view
                .geocode
                .value()
                .map(|record| record.extratag_preview(display.extratag_preview_limit)),
            events: view.events.value().map(EventStats::from_feed),
        }
    }
}

//! Natural events feed (wildfires, storms, volcanoes, ...)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::location::{Coordinate, LocationSelection};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EventsFeed {
    pub title: String,
    pub events: Vec<NaturalEvent>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NaturalEvent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub closed: Option<String>,
    #[serde(default)]
    pub categories: Vec<EventCategory>,
    #[serde(default)]
    pub sources: Vec<EventSource>,
    #[serde(default)]
    pub geometry: Vec<EventGeometry>,
    #[serde(default)]
    pub created: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EventCategory {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EventSource {
    pub id: String,
    pub url: String,
}

/// One observation of an event. Points are `[lon, lat]`; polygons nest further.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EventGeometry {
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub coordinates: serde_json::Value,
}

impl EventGeometry {
    /// The point position, if this geometry is a `[lon, lat, ...]` array
    #[must_use]
    pub fn point(&self) -> Option<Coordinate> {
        let values = self.coordinates.as_array()?;
        let lon = values.first()?.as_f64()?;
        let lat = values.get(1)?.as_f64()?;
        Coordinate::new(lat, lon).ok()
    }
}

impl NaturalEvent {
    /// Position of the first observation
    #[must_use]
    pub fn location(&self) -> Option<Coordinate> {
        self.geometry.first().and_then(EventGeometry::point)
    }

    /// Date of the first observation, falling back to the creation timestamp
    #[must_use]
    pub fn display_date(&self) -> Option<&str> {
        self.geometry
            .first()
            .and_then(|g| g.date.as_deref())
            .or(self.created.as_deref())
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.is_some()
    }

    #[must_use]
    pub fn has_category(&self, category_id: &str) -> bool {
        self.categories
            .iter()
            .any(|c| c.id.eq_ignore_ascii_case(category_id))
    }

    /// Selection for picking this event, or `None` if it has no usable point
    #[must_use]
    pub fn to_selection(&self) -> Option<LocationSelection> {
        self.location()
            .map(|coordinate| LocationSelection::event(coordinate, self.title.clone()))
    }
}

impl EventsFeed {
    /// Events with the given category id (case-insensitive)
    pub fn by_category<'a>(
        &'a self,
        category_id: &'a str,
    ) -> impl Iterator<Item = &'a NaturalEvent> {
        self.events.iter().filter(move |e| e.has_category(category_id))
    }

    /// Number of events per category title
    #[must_use]
    pub fn category_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for category in self.events.iter().flat_map(|e| &e.categories) {
            *counts.entry(category.title.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Category with the most events; ties go to the alphabetically first title
    #[must_use]
    pub fn most_active_category(&self) -> Option<(String, usize)> {
        self.category_counts()
            .into_iter()
            .fold(None, |best, (title, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((title, count)),
            })
    }
}

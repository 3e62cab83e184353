//! Nominatim (OpenStreetMap) forward search and reverse geocoding

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::http::{UpstreamClient, endpoint};
use super::{FetchResult, GeocodingSource, SourceError};
use crate::config::SourcesConfig;
use crate::models::{AddressRecord, Coordinate, Place};

const REVERSE_ZOOM: u8 = 10;
const DETAIL_PARAMS: &str = "format=json&addressdetails=1&extratags=1&namedetails=1";

#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: UpstreamClient,
    base_url: String,
    search_limit: usize,
}

impl NominatimClient {
    pub fn new(http: UpstreamClient, base_url: impl Into<String>, search_limit: usize) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            search_limit,
        }
    }

    #[must_use]
    pub fn from_config(http: UpstreamClient, config: &SourcesConfig) -> Self {
        Self::new(http, &config.geocoding_url, config.search_limit)
    }
}

#[async_trait]
impl GeocodingSource for NominatimClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> FetchResult<Vec<Place>> {
        let url = format!(
            "{}?q={}&limit={}&{}",
            endpoint(&self.base_url, "search"),
            urlencoding::encode(query),
            self.search_limit,
            DETAIL_PARAMS
        );

        let results: Vec<RawPlace> = self.http.get_json("geocode", &url).await?;
        let places = results
            .into_iter()
            .filter_map(|raw| {
                let place = raw.into_place();
                if place.is_none() {
                    debug!("Skipping search result with unusable coordinates");
                }
                place
            })
            .collect::<Vec<_>>();

        info!("Found {} places for '{}'", places.len(), query);
        Ok(places)
    }

    #[instrument(skip(self), fields(lat = coordinate.latitude, lon = coordinate.longitude))]
    async fn reverse(&self, coordinate: Coordinate) -> FetchResult<AddressRecord> {
        let url = format!(
            "{}?lat={}&lon={}&zoom={}&{}",
            endpoint(&self.base_url, "reverse"),
            coordinate.latitude,
            coordinate.longitude,
            REVERSE_ZOOM,
            DETAIL_PARAMS
        );

        let body: Value = self.http.get_json("geocode", &url).await?;
        let record = parse_reverse(body, coordinate)?;
        info!(
            "Reverse geocoded to '{}' ({})",
            record.locality().unwrap_or_else(|| record.short_name()),
            record.country().unwrap_or("no country")
        );
        Ok(record)
    }
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    place_id: Option<u64>,
    lat: String,
    lon: String,
    display_name: String,
    class: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    importance: Option<f64>,
}

impl RawPlace {
    fn into_place(self) -> Option<Place> {
        let coordinate = parse_coordinate(&self.lat, &self.lon)?;
        Some(Place {
            place_id: self.place_id,
            display_name: self.display_name,
            coordinate,
            class: self.class,
            kind: self.kind,
            importance: self.importance,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawAddress {
    place_id: Option<u64>,
    lat: Option<String>,
    lon: Option<String>,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    address: Value,
    #[serde(default)]
    extratags: Value,
    #[serde(default)]
    namedetails: Value,
}

/// Nominatim reports misses as `{"error": "..."}` with a 200 status
fn parse_reverse(body: Value, requested: Coordinate) -> FetchResult<AddressRecord> {
    if let Some(error) = body.get("error") {
        let message = error.as_str().map_or_else(|| error.to_string(), str::to_string);
        return Err(SourceError::NotFound(message));
    }

    let raw: RawAddress = serde_json::from_value(body)?;
    let coordinate = match (raw.lat.as_deref(), raw.lon.as_deref()) {
        (Some(lat), Some(lon)) => parse_coordinate(lat, lon).unwrap_or(requested),
        _ => requested,
    };

    Ok(AddressRecord {
        place_id: raw.place_id,
        display_name: raw.display_name,
        coordinate,
        address: string_map(&raw.address),
        extratags: string_map(&raw.extratags),
        namedetails: string_map(&raw.namedetails),
    })
}

fn parse_coordinate(lat: &str, lon: &str) -> Option<Coordinate> {
    let lat = lat.trim().parse::<f64>().ok()?;
    let lon = lon.trim().parse::<f64>().ok()?;
    Coordinate::new(lat, lon).ok()
}

/// Flatten a free-form JSON object into string pairs. Nulls are dropped,
/// non-string scalars and nested values are rendered as JSON text.
/// Object key order is kept when collecting into an ordered container.
fn string_map<C: FromIterator<(String, String)>>(value: &Value) -> C {
    let Some(object) = value.as_object() else {
        return std::iter::empty().collect();
    };

    object
        .iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key.clone(), s.clone())),
            other => Some((key.clone(), other.to_string())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bern() -> Coordinate {
        Coordinate::new(46.948, 7.447).unwrap()
    }

    #[test]
    fn test_reverse_error_is_not_found() {
        let result = parse_reverse(json!({"error": "Unable to geocode"}), bern());
        assert_eq!(result, Err(SourceError::NotFound("Unable to geocode".to_string())));
    }

    #[test]
    fn test_reverse_record() {
        let body = json!({
            "place_id": 42,
            "lat": "46.9480",
            "lon": "7.4474",
            "display_name": "Bern, Switzerland",
            "address": {"city": "Bern", "country": "Switzerland", "country_code": "ch"},
            "extratags": {"population": "134591", "capital": "yes", "wikidata": null},
            "namedetails": {"name": "Bern", "name:fr": "Berne"}
        });
        let record = parse_reverse(body, bern()).unwrap();
        assert_eq!(record.place_id, Some(42));
        assert_eq!(record.coordinate.longitude, 7.4474);
        assert_eq!(record.locality(), Some("Bern"));
        assert_eq!(
            record.extratags,
            [
                ("population".to_string(), "134591".to_string()),
                ("capital".to_string(), "yes".to_string()),
            ]
        );
        assert_eq!(record.namedetails.get("name:fr").map(String::as_str), Some("Berne"));
    }

    #[test]
    fn test_string_map_is_defensive() {
        assert!(string_map::<BTreeMap<_, _>>(&json!(null)).is_empty());
        assert!(string_map::<Vec<_>>(&json!(["a", "b"])).is_empty());

        let map: BTreeMap<String, String> =
            string_map(&json!({"admin_level": 8, "flags": {"x": true}}));
        assert_eq!(map.get("admin_level").map(String::as_str), Some("8"));
        assert_eq!(map.get("flags").map(String::as_str), Some(r#"{"x":true}"#));
    }

    #[test]
    fn test_search_result_with_bad_coordinates_is_dropped() {
        let raw: Vec<RawPlace> = serde_json::from_value(json!([
            {"place_id": 1, "lat": "46.9", "lon": "7.4", "display_name": "Bern", "type": "city"},
            {"place_id": 2, "lat": "north", "lon": "7.4", "display_name": "Broken"}
        ]))
        .unwrap();
        let places: Vec<Place> = raw.into_iter().filter_map(RawPlace::into_place).collect();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].kind.as_deref(), Some("city"));
    }
}

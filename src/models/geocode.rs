//! Geocoding payloads: forward search candidates and reverse lookup records

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::location::Coordinate;

/// A ranked forward-search candidate
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Place {
    pub place_id: Option<u64>,
    pub display_name: String,
    pub coordinate: Coordinate,
    /// OSM class, e.g. "boundary" or "place"
    pub class: Option<String>,
    /// OSM type within the class, e.g. "city"
    pub kind: Option<String>,
    pub importance: Option<f64>,
}

impl Place {
    /// First segment of the display name ("Bern, Switzerland" -> "Bern")
    #[must_use]
    pub fn short_name(&self) -> &str {
        short_name(&self.display_name)
    }
}

/// Result of a reverse lookup. Address, extratags and namedetails carry no fixed schema.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AddressRecord {
    pub place_id: Option<u64>,
    pub display_name: String,
    pub coordinate: Coordinate,
    pub address: BTreeMap<String, String>,
    /// In upstream order, which is the order previews are cut from
    pub extratags: Vec<(String, String)>,
    pub namedetails: BTreeMap<String, String>,
}

/// A bounded slice of a free-form tag map plus how many entries were left out
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TagPreview {
    pub entries: Vec<(String, String)>,
    pub remaining: usize,
}

impl TagPreview {
    fn from_pairs(pairs: &[(String, String)], limit: usize) -> Self {
        let entries = pairs.iter().take(limit).cloned().collect::<Vec<_>>();
        Self {
            remaining: pairs.len().saturating_sub(entries.len()),
            entries,
        }
    }
}

impl AddressRecord {
    /// First segment of the display name
    #[must_use]
    pub fn short_name(&self) -> &str {
        short_name(&self.display_name)
    }

    /// Most specific settlement name present in the address
    #[must_use]
    pub fn locality(&self) -> Option<&str> {
        ["city", "town", "village", "hamlet", "municipality", "county"]
            .iter()
            .find_map(|key| self.address.get(*key))
            .map(String::as_str)
    }

    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.address.get("country").map(String::as_str)
    }

    /// The first `limit` extratags as the upstream listed them
    #[must_use]
    pub fn extratag_preview(&self, limit: usize) -> TagPreview {
        TagPreview::from_pairs(&self.extratags, limit)
    }
}

fn short_name(display_name: &str) -> &str {
    display_name.split(',').next().unwrap_or(display_name).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(extratags: &[(&str, &str)]) -> AddressRecord {
        AddressRecord {
            place_id: Some(1),
            display_name: "Bern, Verwaltungskreis Bern-Mittelland, Switzerland".to_string(),
            coordinate: Coordinate::new(46.948, 7.447).unwrap(),
            address: BTreeMap::from([
                ("town".to_string(), "Bern".to_string()),
                ("country".to_string(), "Switzerland".to_string()),
            ]),
            extratags: extratags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            namedetails: BTreeMap::new(),
        }
    }

    #[test]
    fn test_extratag_preview_is_capped() {
        let tags: Vec<(String, String)> =
            (0..9).map(|i| (format!("tag{i}"), format!("v{i}"))).collect();
        let tag_refs: Vec<(&str, &str)> =
            tags.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        let record = record(&tag_refs);

        let preview = record.extratag_preview(6);
        assert_eq!(preview.entries.len(), 6);
        assert_eq!(preview.remaining, 3);
        assert_eq!(preview.entries[0], ("tag0".to_string(), "v0".to_string()));
    }

    #[test]
    fn test_extratag_preview_small_map() {
        let record = record(&[("population", "134591"), ("wikidata", "Q70")]);
        let preview = record.extratag_preview(6);
        assert_eq!(preview.entries.len(), 2);
        assert_eq!(preview.remaining, 0);
    }

    #[test]
    fn test_extratag_preview_keeps_upstream_order() {
        let record = record(&[("wikidata", "Q70"), ("population", "134591"), ("capital", "yes")]);
        let preview = record.extratag_preview(2);
        let keys: Vec<&str> = preview.entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["wikidata", "population"]);
        assert_eq!(preview.remaining, 1);
    }

    #[test]
    fn test_address_helpers() {
        let record = record(&[]);
        assert_eq!(record.short_name(), "Bern");
        assert_eq!(record.locality(), Some("Bern"));
        assert_eq!(record.country(), Some("Switzerland"));
    }
}

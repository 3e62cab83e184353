//! Flood risk
//!
//! The flood index is derived locally from precipitation, it does not come
//! from a hydrological model. The derivation reports "Low" for both index 0
//! and index 1, which matches the classification table where every index up
//! to 1 is a single band.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Band, Tone};

/// Label attached to a derived flood index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloodRiskLabel {
    Low,
    Medium,
    High,
}

impl FloodRiskLabel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FloodRiskLabel::Low => "Low",
            FloodRiskLabel::Medium => "Medium",
            FloodRiskLabel::High => "High",
        }
    }
}

impl fmt::Display for FloodRiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive a flood index in [0, 3] from the current precipitation rate and the
/// same-day precipitation sum, both in mm. Rules are evaluated top-down.
#[must_use]
pub fn derive_flood_index(current_mm: f64, daily_sum_mm: f64) -> (u8, FloodRiskLabel) {
    if current_mm > 10.0 || daily_sum_mm > 50.0 {
        (3, FloodRiskLabel::High)
    } else if current_mm > 5.0 || daily_sum_mm > 25.0 {
        (2, FloodRiskLabel::Medium)
    } else if current_mm > 2.0 || daily_sum_mm > 10.0 {
        (1, FloodRiskLabel::Low)
    } else {
        (0, FloodRiskLabel::Low)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FloodBand {
    Low,
    Moderate,
    High,
    Extreme,
}

impl FloodBand {
    /// Classify by numeric index. Upper bounds are inclusive.
    #[must_use]
    pub fn from_index(index: f64) -> Self {
        match index {
            v if v <= 1.0 => FloodBand::Low,
            v if v <= 3.0 => FloodBand::Moderate,
            v if v <= 5.0 => FloodBand::High,
            _ => FloodBand::Extreme,
        }
    }

    /// Case-insensitive keyword match on a risk label
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.to_ascii_lowercase();
        if label.contains("extreme") {
            Some(FloodBand::Extreme)
        } else if label.contains("high") {
            Some(FloodBand::High)
        } else if label.contains("moderate") || label.contains("medium") {
            Some(FloodBand::Moderate)
        } else if label.contains("low") {
            Some(FloodBand::Low)
        } else {
            None
        }
    }

    /// The index decides when present, otherwise the label does
    #[must_use]
    pub fn classify(index: Option<f64>, label: Option<&str>) -> Option<Self> {
        match (index, label) {
            (Some(index), _) => Some(Self::from_index(index)),
            (None, Some(label)) => Self::from_label(label),
            (None, None) => None,
        }
    }
}

impl Band for FloodBand {
    fn label(self) -> &'static str {
        match self {
            FloodBand::Low => "Low Risk",
            FloodBand::Moderate => "Moderate Risk",
            FloodBand::High => "High Risk",
            FloodBand::Extreme => "Extreme Risk",
        }
    }

    fn tone(self) -> Tone {
        match self {
            FloodBand::Low => Tone::Green,
            FloodBand::Moderate => Tone::Yellow,
            FloodBand::High => Tone::Orange,
            FloodBand::Extreme => Tone::Red,
        }
    }

    fn advisory(self) -> &'static str {
        match self {
            FloodBand::Low => "Normal conditions. No immediate flood risk.",
            FloodBand::Moderate => "Monitor weather updates. Be prepared for potential flooding.",
            FloodBand::High => "High risk of flooding. Avoid low-lying areas and watercourses.",
            FloodBand::Extreme => "Extreme flood risk. Evacuate if advised. Stay on higher ground.",
        }
    }

    fn severity(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for FloodBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Detailed safety guidance shown next to a flood reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloodGuidance {
    pub title: &'static str,
    pub advice: &'static str,
    pub recommendations: &'static [&'static str],
}

const HIGH_GUIDANCE: FloodGuidance = FloodGuidance {
    title: "High Flood Risk",
    advice: "Immediate action required. Monitor local authorities for evacuation orders.",
    recommendations: &[
        "Move to higher ground immediately",
        "Avoid walking or driving through floodwaters",
        "Follow local emergency instructions",
        "Keep emergency supplies ready",
        "Stay informed through local news",
    ],
};

const MODERATE_GUIDANCE: FloodGuidance = FloodGuidance {
    title: "Moderate Flood Risk",
    advice: "Be prepared for potential flooding. Monitor weather conditions closely.",
    recommendations: &[
        "Prepare emergency supplies",
        "Move valuable items to higher ground",
        "Monitor local weather updates",
        "Have an evacuation plan ready",
        "Avoid low-lying areas",
    ],
};

const LOW_GUIDANCE: FloodGuidance = FloodGuidance {
    title: "Low Flood Risk",
    advice: "Current conditions show minimal flood risk, but stay informed.",
    recommendations: &[
        "Monitor weather forecasts",
        "Keep emergency contacts handy",
        "Know your evacuation routes",
        "Stay informed about local conditions",
    ],
};

impl FloodGuidance {
    /// Pick guidance from a label and/or index. Either one reaching a level is enough.
    #[must_use]
    pub fn select(index: Option<f64>, label: Option<&str>) -> Self {
        let label = label.map(str::to_ascii_lowercase);
        let label = label.as_deref();
        let index = index.unwrap_or(0.0);

        if label == Some("high") || index >= 3.0 {
            HIGH_GUIDANCE
        } else if label == Some("medium") || label == Some("moderate") || index >= 2.0 {
            MODERATE_GUIDANCE
        } else {
            LOW_GUIDANCE
        }
    }

    /// Guidance for a derived reading
    #[must_use]
    pub fn for_derived(index: u8, risk: FloodRiskLabel) -> Self {
        Self::select(Some(f64::from(index)), Some(risk.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(11.0, 0.0, 3, FloodRiskLabel::High)]
    #[case(0.0, 60.0, 3, FloodRiskLabel::High)]
    #[case(6.0, 0.0, 2, FloodRiskLabel::Medium)]
    #[case(0.0, 30.0, 2, FloodRiskLabel::Medium)]
    #[case(3.0, 0.0, 1, FloodRiskLabel::Low)]
    #[case(0.0, 11.0, 1, FloodRiskLabel::Low)]
    #[case(0.0, 0.0, 0, FloodRiskLabel::Low)]
    #[case(10.0, 50.0, 2, FloodRiskLabel::Medium)]
    #[case(2.0, 10.0, 0, FloodRiskLabel::Low)]
    fn test_derive_flood_index(
        #[case] current: f64,
        #[case] daily: f64,
        #[case] index: u8,
        #[case] label: FloodRiskLabel,
    ) {
        assert_eq!(derive_flood_index(current, daily), (index, label));
    }

    #[rstest]
    #[case(0.0, FloodBand::Low)]
    #[case(1.0, FloodBand::Low)]
    #[case(2.0, FloodBand::Moderate)]
    #[case(3.0, FloodBand::Moderate)]
    #[case(4.0, FloodBand::High)]
    #[case(5.0, FloodBand::High)]
    #[case(5.5, FloodBand::Extreme)]
    fn test_flood_band_from_index(#[case] index: f64, #[case] expected: FloodBand) {
        assert_eq!(FloodBand::from_index(index), expected);
    }

    #[rstest]
    #[case("Low", Some(FloodBand::Low))]
    #[case("MEDIUM", Some(FloodBand::Moderate))]
    #[case("moderate risk", Some(FloodBand::Moderate))]
    #[case("High", Some(FloodBand::High))]
    #[case("unknown", None)]
    fn test_flood_band_from_label(#[case] label: &str, #[case] expected: Option<FloodBand>) {
        assert_eq!(FloodBand::from_label(label), expected);
    }

    #[test]
    fn test_index_wins_over_label() {
        assert_eq!(FloodBand::classify(Some(4.0), Some("low")), Some(FloodBand::High));
        assert_eq!(FloodBand::classify(None, Some("high")), Some(FloodBand::High));
        assert_eq!(FloodBand::classify(None, None), None);
    }

    #[test]
    fn test_flood_severity_is_monotonic() {
        let mut previous = 0;
        let mut value = -1.0;
        while value <= 8.0 {
            let severity = FloodBand::from_index(value).severity();
            assert!(severity >= previous);
            previous = severity;
            value += 0.1;
        }
        assert_eq!(FloodBand::from_index(f64::NAN), FloodBand::Extreme);
    }

    #[test]
    fn test_guidance_selection() {
        assert_eq!(FloodGuidance::for_derived(3, FloodRiskLabel::High).title, "High Flood Risk");
        assert_eq!(
            FloodGuidance::for_derived(2, FloodRiskLabel::Medium).title,
            "Moderate Flood Risk"
        );
        assert_eq!(FloodGuidance::for_derived(1, FloodRiskLabel::Low).title, "Low Flood Risk");
        assert_eq!(FloodGuidance::select(None, Some("HIGH")).recommendations.len(), 5);
        assert_eq!(FloodGuidance::select(None, None).title, "Low Flood Risk");
    }
}

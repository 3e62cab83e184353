//! UV index bands with protective recommendations

use serde::Serialize;
use std::fmt;

use super::{Band, Tone};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum UvBand {
    /// 0-2
    Low,
    /// 3-5
    Moderate,
    /// 6-7
    High,
    /// 8-10
    VeryHigh,
    /// 11+
    Extreme,
}

impl UvBand {
    /// Classify a UV index. Upper bounds are inclusive.
    #[must_use]
    pub fn classify(uv_index: f64) -> Self {
        match uv_index {
            v if v <= 2.0 => UvBand::Low,
            v if v <= 5.0 => UvBand::Moderate,
            v if v <= 7.0 => UvBand::High,
            v if v <= 10.0 => UvBand::VeryHigh,
            _ => UvBand::Extreme,
        }
    }

    /// Protection level headline
    #[must_use]
    pub fn protection(self) -> &'static str {
        match self {
            UvBand::Low => "Low protection required",
            UvBand::Moderate => "Moderate protection required",
            UvBand::High => "High protection required",
            UvBand::VeryHigh => "Very high protection required",
            UvBand::Extreme => "Extreme protection required",
        }
    }

    /// One-line summary for compact cards
    #[must_use]
    pub fn summary(self) -> &'static str {
        match self {
            UvBand::Low => "No protection required",
            UvBand::Moderate => "Take precautions",
            UvBand::High => "Protection required",
            UvBand::VeryHigh => "Extra protection needed",
            UvBand::Extreme => "Avoid sun exposure",
        }
    }

    /// Ordered protective steps. Higher bands escalate the advice of lower ones.
    #[must_use]
    pub fn recommendations(self) -> &'static [&'static str] {
        match self {
            UvBand::Low => &[
                "Wear sunglasses on bright days",
                "Use sunscreen if outdoors for more than 1 hour",
            ],
            UvBand::Moderate => &[
                "Seek shade during midday hours",
                "Wear protective clothing",
                "Apply sunscreen SPF 30+",
                "Wear a wide-brimmed hat",
            ],
            UvBand::High => &[
                "Minimize sun exposure during midday",
                "Apply sunscreen SPF 30+ every 2 hours",
                "Wear protective clothing",
                "Seek shade",
            ],
            UvBand::VeryHigh => &[
                "Avoid sun exposure during midday",
                "Apply sunscreen SPF 50+ every 2 hours",
                "Wear protective clothing",
                "Seek shade",
                "Use extra caution",
            ],
            UvBand::Extreme => &[
                "Avoid all sun exposure during midday",
                "Apply sunscreen SPF 50+ every 2 hours",
                "Wear protective clothing",
                "Seek shade",
                "Take all precautions",
            ],
        }
    }
}

impl Band for UvBand {
    fn label(self) -> &'static str {
        match self {
            UvBand::Low => "Low",
            UvBand::Moderate => "Moderate",
            UvBand::High => "High",
            UvBand::VeryHigh => "Very High",
            UvBand::Extreme => "Extreme",
        }
    }

    fn tone(self) -> Tone {
        match self {
            UvBand::Low => Tone::Green,
            UvBand::Moderate => Tone::Yellow,
            UvBand::High => Tone::Orange,
            UvBand::VeryHigh => Tone::Red,
            UvBand::Extreme => Tone::Purple,
        }
    }

    fn advisory(self) -> &'static str {
        match self {
            UvBand::Low => "You can safely stay outside using minimal sun protection.",
            UvBand::Moderate => {
                "Take precautions during midday hours when the sun is most intense."
            }
            UvBand::High => "Reduce time in the sun between 10 a.m. and 4 p.m.",
            UvBand::VeryHigh => "Minimize sun exposure during midday hours.",
            UvBand::Extreme => "Avoid sun exposure during midday hours.",
        }
    }

    fn severity(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for UvBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, UvBand::Low)]
    #[case(2.0, UvBand::Low)]
    #[case(2.1, UvBand::Moderate)]
    #[case(5.0, UvBand::Moderate)]
    #[case(6.0, UvBand::High)]
    #[case(7.0, UvBand::High)]
    #[case(7.5, UvBand::VeryHigh)]
    #[case(10.0, UvBand::VeryHigh)]
    #[case(10.01, UvBand::Extreme)]
    #[case(14.0, UvBand::Extreme)]
    fn test_uv_boundaries(#[case] value: f64, #[case] expected: UvBand) {
        assert_eq!(UvBand::classify(value), expected);
    }

    #[test]
    fn test_uv_severity_is_monotonic() {
        let mut previous = 0;
        let mut value = -1.0;
        while value <= 16.0 {
            let severity = UvBand::classify(value).severity();
            assert!(severity >= previous, "severity dropped at {value}");
            previous = severity;
            value += 0.05;
        }
        assert_eq!(previous, UvBand::Extreme.severity());
    }

    #[test]
    fn test_recommendations_escalate() {
        let bands = [
            UvBand::Low,
            UvBand::Moderate,
            UvBand::High,
            UvBand::VeryHigh,
            UvBand::Extreme,
        ];
        for pair in bands.windows(2) {
            assert!(pair[1].recommendations().len() >= pair[0].recommendations().len());
        }
        assert!(UvBand::Extreme.recommendations().contains(&"Seek shade"));
        assert!(UvBand::VeryHigh.recommendations()[1].contains("SPF 50+"));
    }

    #[test]
    fn test_uv_category() {
        let category = UvBand::classify(8.2).category();
        assert_eq!(category.level, "Very High");
        assert_eq!(category.tone, Tone::Red);
        assert_eq!(UvBand::classify(f64::NAN), UvBand::Extreme);
    }
}

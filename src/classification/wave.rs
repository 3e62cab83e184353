//! Significant wave height bands. Boundaries use strict less-than.

use serde::Serialize;
use std::fmt;

use super::{Band, Tone};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum WaveBand {
    /// Below 0.5 m
    Calm,
    /// 0.5 m up to 1.25 m
    Slight,
    /// 1.25 m up to 2.5 m
    Moderate,
    /// 2.5 m up to 4 m
    Rough,
    /// 4 m and above
    High,
}

impl WaveBand {
    #[must_use]
    pub fn classify(height_m: f64) -> Self {
        match height_m {
            h if h < 0.5 => WaveBand::Calm,
            h if h < 1.25 => WaveBand::Slight,
            h if h < 2.5 => WaveBand::Moderate,
            h if h < 4.0 => WaveBand::Rough,
            _ => WaveBand::High,
        }
    }
}

impl Band for WaveBand {
    fn label(self) -> &'static str {
        match self {
            WaveBand::Calm => "Calm",
            WaveBand::Slight => "Slight",
            WaveBand::Moderate => "Moderate",
            WaveBand::Rough => "Rough",
            WaveBand::High => "High",
        }
    }

    fn tone(self) -> Tone {
        match self {
            WaveBand::Calm => Tone::Green,
            WaveBand::Slight => Tone::Blue,
            WaveBand::Moderate => Tone::Yellow,
            WaveBand::Rough => Tone::Orange,
            WaveBand::High => Tone::Red,
        }
    }

    fn advisory(self) -> &'static str {
        match self {
            WaveBand::Calm => "Flat water. Suitable for swimming and small craft.",
            WaveBand::Slight => "Small waves. Generally safe for most water activities.",
            WaveBand::Moderate => "Noticeable swell. Small craft should take care.",
            WaveBand::Rough => "Rough seas. Small craft should stay in harbour.",
            WaveBand::High => "Dangerous sea state. Stay away from exposed shorelines.",
        }
    }

    fn severity(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for WaveBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

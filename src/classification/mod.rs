//! Classification rules
//!
//! Deterministic mappings from a raw metric to a discrete band. Every table
//! is a monotonic step function: the severity rank never decreases as the
//! input grows, and every real number lands in exactly one band.
//!
//! Out-of-domain inputs are passed through rather than rejected: negative
//! values fall into the lowest band and `NaN` falls into the highest.

pub mod aqi;
pub mod flood;
pub mod uv;
pub mod wave;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use aqi::{AirQualityAdvisory, AqiBand};
pub use flood::{FloodBand, FloodGuidance, FloodRiskLabel, derive_flood_index};
pub use uv::UvBand;
pub use wave::WaveBand;

/// Color class the presentation layer paints a band with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Green,
    Blue,
    Yellow,
    Orange,
    Red,
    Purple,
    Maroon,
}

/// Derived category handed to consumers. Computed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub level: &'static str,
    /// Rank within the table, 0 for the mildest band
    pub severity: u8,
    pub tone: Tone,
    pub advisory: &'static str,
}

/// A band of a classification table
pub trait Band: Copy + Ord + fmt::Debug {
    fn label(self) -> &'static str;
    fn tone(self) -> Tone;
    fn advisory(self) -> &'static str;
    fn severity(self) -> u8;

    fn category(self) -> Category {
        Category {
            level: self.label(),
            severity: self.severity(),
            tone: self.tone(),
            advisory: self.advisory(),
        }
    }
}

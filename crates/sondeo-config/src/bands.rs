//! Frequency band definitions.

use serde::{Deserialize, Serialize};

/// A named frequency range with the source types it suggests.
///
/// Band tables are static configuration: the profiler preserves table
/// order in its output, and the hybrid classifier uses that order as the
/// priority for tie-breaking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandDefinition {
    /// Human-readable band name.
    pub name: String,
    /// Lower edge in Hz (inclusive).
    pub low_hz: f32,
    /// Upper edge in Hz (exclusive).
    pub high_hz: f32,
    /// Source classes that typically dominate this band.
    #[serde(default)]
    pub candidate_sources: Vec<String>,
}

impl BandDefinition {
    /// Create a band from a name, edges, and candidate source names.
    pub fn new(name: &str, low_hz: f32, high_hz: f32, candidate_sources: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            low_hz,
            high_hz,
            candidate_sources: candidate_sources.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Geometric center frequency of the band.
    pub fn center_hz(&self) -> f32 {
        (self.low_hz * self.high_hz).sqrt()
    }

    /// Bandwidth in Hz.
    pub fn bandwidth(&self) -> f32 {
        self.high_hz - self.low_hz
    }
}

/// The default six-band deployment table, sub-bass through high.
///
/// Tuned for aerial recordings; underwater hydrophone deployments should
/// supply their own table through [`crate::AnalysisSettings`].
pub fn default_band_table() -> Vec<BandDefinition> {
    vec![
        BandDefinition::new(
            "sub_bass",
            10.0,
            80.0,
            &["helicopter", "marine_vessel", "earthquake"],
        ),
        BandDefinition::new(
            "bass",
            80.0,
            300.0,
            &["drone", "car_truck", "helicopter", "marine_vessel"],
        ),
        BandDefinition::new(
            "low_mid",
            300.0,
            1000.0,
            &["drone", "car_truck", "fixed_wing", "human_voice"],
        ),
        BandDefinition::new(
            "mid",
            1000.0,
            3500.0,
            &["siren", "human_voice", "fixed_wing", "bird"],
        ),
        BandDefinition::new(
            "upper_mid",
            3500.0,
            8000.0,
            &["gunshot", "siren", "bird", "insect"],
        ),
        BandDefinition::new(
            "high",
            8000.0,
            16000.0,
            &["bird", "insect", "marine_mammal"],
        ),
    ]
}

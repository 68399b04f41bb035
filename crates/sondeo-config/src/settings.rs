//! Analysis settings: the one struct a deployment tunes.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::bands::{BandDefinition, default_band_table};
use crate::error::ConfigError;
use crate::signature::SignatureMap;
use crate::validation;

/// Speed of sound in air at 20 degrees C, in m/s.
pub const SPEED_OF_SOUND_AIR_M_S: f32 = 343.0;

/// Nominal speed of sound in sea water, in m/s. Use for hydrophone
/// deployments.
pub const SPEED_OF_SOUND_WATER_M_S: f32 = 1500.0;

/// Everything tunable about a clip analysis, loadable from TOML.
///
/// # TOML format
///
/// ```toml
/// propagation_speed_m_s = 343.0
/// frame_len = 4096
/// hop_len = 2048
/// direction_threshold_hz = 2.0
/// mic_spacing_m = 0.05
///
/// [[band_table]]
/// name = "bass"
/// low_hz = 80.0
/// high_hz = 300.0
/// candidate_sources = ["drone", "car_truck"]
///
/// [signature]
/// top_k = 2
/// mobile_boost = 1.3
/// ```
///
/// Every field has a default, so an empty TOML document yields the same
/// settings as [`AnalysisSettings::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Propagation speed of sound in the medium, m/s.
    #[serde(default = "default_propagation_speed")]
    pub propagation_speed_m_s: f32,

    /// Optional reference distance for travel-time estimates, meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f32>,

    /// Known emission frequency of the source in Hz, when available.
    /// Left unset, the velocity estimator infers it from the track.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_frequency_hz: Option<f32>,

    /// Analysis frame length in samples.
    #[serde(default = "default_frame_len")]
    pub frame_len: usize,

    /// Hop between frames in samples.
    #[serde(default = "default_hop_len")]
    pub hop_len: usize,

    /// Lower edge of the dominant-frequency search band, Hz.
    #[serde(default = "default_analysis_low_hz")]
    pub analysis_low_hz: f32,

    /// Upper edge of the dominant-frequency search band, Hz.
    #[serde(default = "default_analysis_high_hz")]
    pub analysis_high_hz: f32,

    /// Dead band on the per-frame frequency shift below which a frame is
    /// classified stationary, Hz.
    #[serde(default = "default_direction_threshold")]
    pub direction_threshold_hz: f32,

    /// Spacing of the microphone pair used for DOA, meters.
    #[serde(default = "default_mic_spacing")]
    pub mic_spacing_m: f32,

    /// Override for the maximum admissible DOA delay, seconds. Unset, the
    /// physical bound `mic_spacing / propagation_speed` applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_delay_secs: Option<f32>,

    /// Ordered band table for the energy profiler and classifier.
    #[serde(default = "default_band_table")]
    pub band_table: Vec<BandDefinition>,

    /// Hybrid classifier weighting table.
    #[serde(default)]
    pub signature: SignatureMap,
}

fn default_propagation_speed() -> f32 {
    SPEED_OF_SOUND_AIR_M_S
}

fn default_frame_len() -> usize {
    4096
}

fn default_hop_len() -> usize {
    2048
}

fn default_analysis_low_hz() -> f32 {
    20.0
}

fn default_analysis_high_hz() -> f32 {
    20000.0
}

fn default_direction_threshold() -> f32 {
    2.0
}

fn default_mic_spacing() -> f32 {
    0.05
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            propagation_speed_m_s: default_propagation_speed(),
            distance_m: None,
            source_frequency_hz: None,
            frame_len: default_frame_len(),
            hop_len: default_hop_len(),
            analysis_low_hz: default_analysis_low_hz(),
            analysis_high_hz: default_analysis_high_hz(),
            direction_threshold_hz: default_direction_threshold(),
            mic_spacing_m: default_mic_spacing(),
            max_delay_secs: None,
            band_table: default_band_table(),
            signature: SignatureMap::default(),
        }
    }
}

impl AnalysisSettings {
    /// Settings for an underwater hydrophone deployment.
    pub fn underwater() -> Self {
        Self {
            propagation_speed_m_s: SPEED_OF_SOUND_WATER_M_S,
            ..Self::default()
        }
    }

    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save settings to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))
    }

    /// Check every field against the constraints the analyzers assume.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate_settings(self)?;
        Ok(())
    }
}

//! Settings and band-table validation.
//!
//! Validation happens before any analyzer touches the numbers, so a bad
//! deployment file surfaces as a [`ValidationError`] naming the offending
//! key instead of a confusing numeric result downstream.

use thiserror::Error;

use crate::bands::BandDefinition;
use crate::settings::AnalysisSettings;

/// A single validation failure with enough context for external logging.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A scalar setting that must be strictly positive was not.
    #[error("'{key}' must be positive, got {value}")]
    NonPositive {
        /// Settings key that failed.
        key: &'static str,
        /// Offending value.
        value: f32,
    },

    /// Frame or hop length was zero.
    #[error("'{key}' must be a positive sample count")]
    ZeroLength {
        /// Settings key that failed.
        key: &'static str,
    },

    /// The band table contained no bands.
    #[error("band table must not be empty")]
    EmptyBandTable,

    /// A band's edges were inverted or non-positive.
    #[error("band '{name}' has invalid edges: [{low_hz}, {high_hz})")]
    InvalidBandEdges {
        /// Name of the offending band.
        name: String,
        /// Lower edge.
        low_hz: f32,
        /// Upper edge.
        high_hz: f32,
    },

    /// A band had an empty name.
    #[error("band at index {index} has an empty name")]
    UnnamedBand {
        /// Position in the band table.
        index: usize,
    },

    /// The signature map asked for zero bands.
    #[error("signature map top_k must be at least 1")]
    ZeroTopK,

    /// The analysis band was inverted.
    #[error("analysis band is inverted: low {low_hz} Hz >= high {high_hz} Hz")]
    InvertedAnalysisBand {
        /// Lower edge of the search band.
        low_hz: f32,
        /// Upper edge of the search band.
        high_hz: f32,
    },
}

/// Validate a band table on its own.
pub fn validate_band_table(bands: &[BandDefinition]) -> Result<(), ValidationError> {
    if bands.is_empty() {
        return Err(ValidationError::EmptyBandTable);
    }
    for (index, band) in bands.iter().enumerate() {
        if band.name.is_empty() {
            return Err(ValidationError::UnnamedBand { index });
        }
        if !(band.low_hz >= 0.0 && band.high_hz > band.low_hz) {
            return Err(ValidationError::InvalidBandEdges {
                name: band.name.clone(),
                low_hz: band.low_hz,
                high_hz: band.high_hz,
            });
        }
    }
    Ok(())
}

/// Validate a full settings struct.
pub fn validate_settings(settings: &AnalysisSettings) -> Result<(), ValidationError> {
    let positive = [
        ("propagation_speed_m_s", settings.propagation_speed_m_s),
        ("direction_threshold_hz", settings.direction_threshold_hz),
        ("mic_spacing_m", settings.mic_spacing_m),
    ];
    for (key, value) in positive {
        if !(value.is_finite() && value > 0.0) {
            return Err(ValidationError::NonPositive { key, value });
        }
    }
    if let Some(distance) = settings.distance_m
        && !(distance.is_finite() && distance > 0.0)
    {
        return Err(ValidationError::NonPositive {
            key: "distance_m",
            value: distance,
        });
    }
    if let Some(freq) = settings.source_frequency_hz
        && !(freq.is_finite() && freq > 0.0)
    {
        return Err(ValidationError::NonPositive {
            key: "source_frequency_hz",
            value: freq,
        });
    }
    if let Some(max_delay) = settings.max_delay_secs
        && !(max_delay.is_finite() && max_delay > 0.0)
    {
        return Err(ValidationError::NonPositive {
            key: "max_delay_secs",
            value: max_delay,
        });
    }

    if settings.frame_len == 0 {
        return Err(ValidationError::ZeroLength { key: "frame_len" });
    }
    if settings.hop_len == 0 {
        return Err(ValidationError::ZeroLength { key: "hop_len" });
    }

    if settings.analysis_low_hz >= settings.analysis_high_hz {
        return Err(ValidationError::InvertedAnalysisBand {
            low_hz: settings.analysis_low_hz,
            high_hz: settings.analysis_high_hz,
        });
    }

    if settings.signature.top_k == 0 {
        return Err(ValidationError::ZeroTopK);
    }

    validate_band_table(&settings.band_table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_validate() {
        assert!(validate_settings(&AnalysisSettings::default()).is_ok());
    }

    #[test]
    fn rejects_non_positive_speed() {
        let mut settings = AnalysisSettings::default();
        settings.propagation_speed_m_s = 0.0;
        let err = validate_settings(&settings).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NonPositive {
                key: "propagation_speed_m_s",
                ..
            }
        ));
    }

    #[test]
    fn rejects_empty_band_table() {
        let mut settings = AnalysisSettings::default();
        settings.band_table.clear();
        assert_eq!(
            validate_settings(&settings),
            Err(ValidationError::EmptyBandTable)
        );
    }

    #[test]
    fn rejects_inverted_band_edges() {
        let mut settings = AnalysisSettings::default();
        settings.band_table[0].low_hz = 500.0;
        settings.band_table[0].high_hz = 100.0;
        assert!(matches!(
            validate_settings(&settings),
            Err(ValidationError::InvalidBandEdges { .. })
        ));
    }

    #[test]
    fn rejects_zero_top_k() {
        let mut settings = AnalysisSettings::default();
        settings.signature.top_k = 0;
        assert_eq!(validate_settings(&settings), Err(ValidationError::ZeroTopK));
    }

    #[test]
    fn rejects_negative_optional_distance() {
        let mut settings = AnalysisSettings::default();
        settings.distance_m = Some(-3.0);
        assert!(matches!(
            validate_settings(&settings),
            Err(ValidationError::NonPositive {
                key: "distance_m",
                ..
            })
        ));
    }

    #[test]
    fn error_messages_name_the_key() {
        let err = ValidationError::NonPositive {
            key: "mic_spacing_m",
            value: -0.05,
        };
        let msg = err.to_string();
        assert!(msg.contains("mic_spacing_m"), "got: {msg}");
        assert!(msg.contains("-0.05"), "got: {msg}");
    }
}

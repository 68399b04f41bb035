//! Error type for the analysis seams.
//!
//! Frame-level work never fails; only the aggregation-level components
//! (velocity estimator, delay estimator, hybrid classifier) raise, and
//! they raise either on malformed input or on misconfiguration. Degenerate
//! numeric input (silence) is handled by well-defined degenerate results
//! instead.

use sondeo_dsp::DspError;
use thiserror::Error;

/// Errors raised by the aggregation-level analyzers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Propagation speed was zero, negative, or not finite.
    #[error("propagation speed must be positive, got {0} m/s")]
    NonPositivePropagationSpeed(f32),

    /// Microphone spacing was zero, negative, or not finite.
    #[error("microphone spacing must be positive, got {0} m")]
    NonPositiveMicSpacing(f32),

    /// Sample rate was zero, negative, or not finite.
    #[error("sample rate must be positive and finite, got {0}")]
    InvalidSampleRate(f32),

    /// The two DOA channels had different lengths.
    #[error("channel length mismatch: first {first} samples, second {second} samples")]
    ChannelLengthMismatch {
        /// Length of the first channel.
        first: usize,
        /// Length of the second channel.
        second: usize,
    },

    /// Both DOA channels were empty.
    #[error("channels must not be empty")]
    EmptyChannels,

    /// The band table had no bands (config key 'band_table').
    #[error("band table must not be empty (config key 'band_table')")]
    EmptyBandTable,

    /// The signature map requested zero bands (config key
    /// 'signature.top_k').
    #[error("signature map top_k must be at least 1 (config key 'signature.top_k')")]
    ZeroTopK,

    /// None of the top-energy bands named any candidate source.
    #[error(
        "top {top_k} bands name no candidate sources (config key 'band_table.candidate_sources')"
    )]
    NoCandidates {
        /// The top-K value in effect.
        top_k: usize,
    },

    /// An error from the spectral frontend.
    #[error(transparent)]
    Dsp(#[from] DspError),
}

impl AnalysisError {
    /// True for the misconfiguration kind (as opposed to malformed input).
    ///
    /// These must never be swallowed by callers composing analyzers.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AnalysisError::EmptyBandTable
                | AnalysisError::ZeroTopK
                | AnalysisError::NoCandidates { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_kind_is_flagged() {
        assert!(AnalysisError::EmptyBandTable.is_configuration());
        assert!(AnalysisError::ZeroTopK.is_configuration());
        assert!(AnalysisError::NoCandidates { top_k: 2 }.is_configuration());
        assert!(!AnalysisError::EmptyChannels.is_configuration());
        assert!(!AnalysisError::NonPositiveMicSpacing(0.0).is_configuration());
    }

    #[test]
    fn messages_carry_context() {
        let msg = AnalysisError::ChannelLengthMismatch {
            first: 100,
            second: 90,
        }
        .to_string();
        assert!(msg.contains("100"), "got: {msg}");
        assert!(msg.contains("90"), "got: {msg}");

        let msg = AnalysisError::NoCandidates { top_k: 2 }.to_string();
        assert!(msg.contains("candidate_sources"), "got: {msg}");
    }
}

//! Error type for the spectral frontend.

use thiserror::Error;

/// Errors raised when constructing frontend components from invalid
/// parameters.
///
/// Per-frame processing itself never fails: a degenerate frame (all-zero
/// samples) still yields a well-formed spectral frame, and the consumers
/// decide what to do with it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DspError {
    /// Sample rate was zero, negative, or not finite.
    #[error("sample rate must be positive and finite, got {0}")]
    InvalidSampleRate(f32),

    /// Frame length was zero.
    #[error("frame length must be positive")]
    InvalidFrameLength,

    /// Hop length was zero.
    #[error("hop length must be positive")]
    InvalidHopLength,
}

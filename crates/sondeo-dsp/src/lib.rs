//! Sondeo DSP - spectral frontend for acoustic clip analysis
//!
//! This crate turns raw sample buffers into windowed spectral frames and
//! provides the small numeric primitives shared by the analyzers built on
//! top of it:
//!
//! - [`window`] - window functions (Hann, Hamming, Blackman, ...)
//! - [`fft`] - cached FFT plans over rustfft with real-input helpers
//! - [`frame`] - the frame windower / STFT frontend producing [`SpectralFrame`]s
//! - [`math`] - dB conversion with a floor, median, parabolic peak refinement
//!
//! Everything here is a pure function of its input: the same buffer and the
//! same parameters produce bit-identical frames, regardless of how callers
//! schedule the per-frame work.
//!
//! # Example
//!
//! ```rust
//! use sondeo_dsp::{FrameSequencer, Window};
//!
//! let sequencer = FrameSequencer::new(44100.0, 4096, 2048, Window::Hann).unwrap();
//! let samples = vec![0.0f32; 44100];
//! let frames = sequencer.frames(&samples);
//! assert_eq!(frames.len(), sequencer.num_frames(samples.len()));
//! ```

pub mod fft;
pub mod frame;
pub mod math;
pub mod window;

mod error;

pub use error::DspError;
pub use fft::{Fft, magnitude_spectrum};
pub use frame::{FrameSequencer, SpectralFrame};
pub use math::{DB_POWER_FLOOR, median, parabolic_offset, power_db};
pub use window::Window;

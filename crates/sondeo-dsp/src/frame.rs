//! Frame windower / FFT frontend.
//!
//! Splits a sample buffer into overlapping frames, windows each frame,
//! and transforms it into a magnitude spectrum. The output is an ordered,
//! finite sequence of [`SpectralFrame`]s; calling [`FrameSequencer::frames`]
//! again on the same buffer restarts the sequence from frame zero.
//!
//! # Short-buffer policy
//!
//! A buffer shorter than one frame is zero-padded to exactly one frame.
//! A trailing partial frame past the last full hop is dropped, matching
//! the usual STFT convention. Neither case is an error.

use crate::error::DspError;
use crate::fft::{self, Fft};
use crate::window::Window;

/// One windowed, transformed analysis frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralFrame {
    /// Position of this frame in the sequence, starting at zero.
    pub index: usize,
    /// Center time of the frame within the clip, in seconds.
    pub time_secs: f32,
    /// Magnitude per bin, DC through Nyquist (`frame_len/2 + 1` values).
    pub magnitudes: Vec<f32>,
    /// Width of one bin in Hz.
    pub bin_hz: f32,
}

impl SpectralFrame {
    /// Number of frequency bins.
    pub fn num_bins(&self) -> usize {
        self.magnitudes.len()
    }

    /// Frequency in Hz at the center of `bin`.
    pub fn frequency(&self, bin: usize) -> f32 {
        bin as f32 * self.bin_hz
    }

    /// Power (squared magnitude) per bin.
    pub fn power(&self) -> Vec<f32> {
        self.magnitudes.iter().map(|&m| m * m).collect()
    }
}

/// Configured frame windower producing [`SpectralFrame`]s from a buffer.
#[derive(Debug)]
pub struct FrameSequencer {
    sample_rate: f32,
    frame_len: usize,
    hop_len: usize,
    window: Window,
    coefficients: Vec<f32>,
    fft: Fft,
}

impl FrameSequencer {
    /// Build a sequencer for the given framing parameters.
    ///
    /// # Errors
    ///
    /// Returns [`DspError`] when the sample rate is not positive and
    /// finite, or when frame or hop length is zero.
    pub fn new(
        sample_rate: f32,
        frame_len: usize,
        hop_len: usize,
        window: Window,
    ) -> Result<Self, DspError> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(DspError::InvalidSampleRate(sample_rate));
        }
        if frame_len == 0 {
            return Err(DspError::InvalidFrameLength);
        }
        if hop_len == 0 {
            return Err(DspError::InvalidHopLength);
        }

        Ok(Self {
            sample_rate,
            frame_len,
            hop_len,
            window,
            coefficients: window.coefficients(frame_len),
            fft: Fft::new(frame_len),
        })
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Frame length in samples.
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Hop length in samples.
    pub fn hop_len(&self) -> usize {
        self.hop_len
    }

    /// Window function in use.
    pub fn window(&self) -> Window {
        self.window
    }

    /// Hop duration in seconds.
    pub fn hop_secs(&self) -> f32 {
        self.hop_len as f32 / self.sample_rate
    }

    /// Width of one frequency bin in Hz.
    pub fn bin_hz(&self) -> f32 {
        self.sample_rate / self.frame_len as f32
    }

    /// Number of frames a buffer of `num_samples` produces.
    ///
    /// Always at least one: short buffers are zero-padded to a single
    /// frame rather than rejected.
    pub fn num_frames(&self, num_samples: usize) -> usize {
        if num_samples <= self.frame_len {
            1
        } else {
            (num_samples - self.frame_len) / self.hop_len + 1
        }
    }

    /// Window and transform every frame of `samples`.
    ///
    /// Pure: the result depends only on `samples` and the sequencer
    /// parameters, and each frame is computed independently of the others.
    pub fn frames(&self, samples: &[f32]) -> Vec<SpectralFrame> {
        let bin_hz = self.bin_hz();
        (0..self.num_frames(samples.len()))
            .map(|index| {
                let start = index * self.hop_len;
                let end = (start + self.frame_len).min(samples.len());

                let mut frame: Vec<f32> = samples[start.min(samples.len())..end].to_vec();
                frame.resize(self.frame_len, 0.0);

                for (sample, &coeff) in frame.iter_mut().zip(self.coefficients.iter()) {
                    *sample *= coeff;
                }

                let spectrum = self.fft.real_forward(&frame);
                SpectralFrame {
                    index,
                    time_secs: (start as f32 + self.frame_len as f32 / 2.0) / self.sample_rate,
                    magnitudes: fft::magnitude_spectrum(&spectrum),
                    bin_hz,
                }
            })
            .collect()
    }
}

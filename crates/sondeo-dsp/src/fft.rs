//! FFT plans with real-input helpers.
//!
//! Thin wrapper over rustfft that caches one forward and one inverse plan
//! of a fixed size. Real input is padded or truncated to the plan size and
//! only the non-negative half of the spectrum is returned.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use std::sync::Arc;

/// A forward/inverse FFT plan pair of fixed size.
pub struct Fft {
    forward: Arc<dyn rustfft::Fft<f32>>,
    inverse: Arc<dyn rustfft::Fft<f32>>,
    size: usize,
}

impl std::fmt::Debug for Fft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fft").field("size", &self.size).finish()
    }
}

impl Fft {
    /// Plan forward and inverse transforms of `size` points.
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            forward: planner.plan_fft_forward(size),
            inverse: planner.plan_fft_inverse(size),
            size,
        }
    }

    /// Transform size in samples.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of bins in the half spectrum returned by [`Fft::real_forward`].
    pub fn num_bins(&self) -> usize {
        self.size / 2 + 1
    }

    /// Forward transform of a real signal.
    ///
    /// Input shorter than the plan size is zero-padded; longer input is
    /// truncated. Returns the `size/2 + 1` bins from DC to Nyquist.
    pub fn real_forward(&self, input: &[f32]) -> Vec<Complex<f32>> {
        let mut buffer: Vec<Complex<f32>> = input
            .iter()
            .take(self.size)
            .map(|&x| Complex::new(x, 0.0))
            .collect();
        buffer.resize(self.size, Complex::new(0.0, 0.0));

        self.forward.process(&mut buffer);

        buffer.truncate(self.num_bins());
        buffer
    }

    /// In-place forward transform of a complex buffer of the plan size.
    pub fn forward_in_place(&self, buffer: &mut [Complex<f32>]) {
        self.forward.process(buffer);
    }

    /// In-place inverse transform, normalized by `1/size`.
    pub fn inverse_in_place(&self, buffer: &mut [Complex<f32>]) {
        self.inverse.process(buffer);
        let scale = 1.0 / self.size as f32;
        for c in buffer.iter_mut() {
            *c *= scale;
        }
    }
}

/// Magnitudes of a complex spectrum.
pub fn magnitude_spectrum(spectrum: &[Complex<f32>]) -> Vec<f32> {
    spectrum.iter().map(|c| c.norm()).collect()
}

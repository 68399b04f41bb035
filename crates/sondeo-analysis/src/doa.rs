//! Direction-of-arrival estimation from a microphone pair.
//!
//! The inter-channel delay comes from GCC-PHAT: the cross-power spectrum
//! of the two channels is whitened to unit magnitude per bin, which
//! discards level information and keeps only phase. The resulting
//! correlation peak is sharp even in reverberant conditions where plain
//! cross-correlation smears.
//!
//! Sign convention: a positive delay means the second channel lags the
//! first, i.e. the source sits on the first microphone's side.

use rustfft::num_complex::Complex;
use sondeo_config::AnalysisSettings;
use sondeo_dsp::{Fft, parabolic_offset};
use tracing::debug;

use crate::error::AnalysisError;

/// Magnitude floor for the PHAT weighting, guards empty bins.
const PHAT_FLOOR: f32 = 1e-10;

/// Delay and bearing of a source relative to a microphone pair.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct DoaEstimate {
    /// Sample rate the delay was measured at, Hz.
    pub sample_rate: f32,
    /// Inter-channel delay in seconds, positive when the second channel
    /// lags the first.
    pub delay_secs: f32,
    /// Bearing in degrees from broadside, in [-90, 90].
    pub angle_deg: f32,
    /// True when the measured delay exceeded the physically admissible
    /// range for the array geometry and the angle was clamped to an
    /// endfire +/-90 degrees.
    pub saturated: bool,
}

/// GCC-PHAT delay estimator for a two-microphone array.
#[derive(Debug, Clone, Copy)]
pub struct DelayAngleEstimator {
    sample_rate: f32,
    mic_spacing_m: f32,
    propagation_speed_m_s: f32,
    max_delay_secs: Option<f32>,
}

impl DelayAngleEstimator {
    /// Create an estimator for a pair spaced `mic_spacing_m` apart.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidSampleRate`],
    /// [`AnalysisError::NonPositiveMicSpacing`], or
    /// [`AnalysisError::NonPositivePropagationSpeed`] when the
    /// corresponding parameter is not positive and finite.
    pub fn new(
        sample_rate: f32,
        mic_spacing_m: f32,
        propagation_speed_m_s: f32,
    ) -> Result<Self, AnalysisError> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(AnalysisError::InvalidSampleRate(sample_rate));
        }
        if !(mic_spacing_m.is_finite() && mic_spacing_m > 0.0) {
            return Err(AnalysisError::NonPositiveMicSpacing(mic_spacing_m));
        }
        if !(propagation_speed_m_s.is_finite() && propagation_speed_m_s > 0.0) {
            return Err(AnalysisError::NonPositivePropagationSpeed(
                propagation_speed_m_s,
            ));
        }
        Ok(Self {
            sample_rate,
            mic_spacing_m,
            propagation_speed_m_s,
            max_delay_secs: None,
        })
    }

    /// Build an estimator from deployment settings.
    pub fn from_settings(
        settings: &AnalysisSettings,
        sample_rate: f32,
    ) -> Result<Self, AnalysisError> {
        let mut estimator = Self::new(
            sample_rate,
            settings.mic_spacing_m,
            settings.propagation_speed_m_s,
        )?;
        estimator.max_delay_secs = settings.max_delay_secs;
        Ok(estimator)
    }

    /// Widen (or narrow) the delay search window beyond the physical
    /// bound `spacing / speed`. Useful when the recording rig introduces
    /// a fixed inter-channel offset larger than the acoustic path allows.
    pub fn with_max_delay(mut self, max_delay_secs: f32) -> Self {
        self.max_delay_secs = Some(max_delay_secs);
        self
    }

    /// Largest delay the search will consider, in seconds.
    pub fn max_delay_secs(&self) -> f32 {
        self.max_delay_secs
            .unwrap_or(self.mic_spacing_m / self.propagation_speed_m_s)
    }

    /// Estimate each channel of an array against the first (reference)
    /// channel.
    ///
    /// Returns one estimate per non-reference channel, in input order.
    /// The configured spacing applies to every pair, so this fits
    /// evenly spaced arrays where each element sits `mic_spacing_m` from
    /// the reference.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::EmptyChannels`] when fewer than two
    /// channels are given; per-pair errors propagate from
    /// [`Self::estimate`].
    pub fn estimate_array(&self, channels: &[&[f32]]) -> Result<Vec<DoaEstimate>, AnalysisError> {
        let Some((reference, rest)) = channels.split_first() else {
            return Err(AnalysisError::EmptyChannels);
        };
        if rest.is_empty() {
            return Err(AnalysisError::EmptyChannels);
        }
        rest.iter()
            .map(|channel| self.estimate(reference, channel))
            .collect()
    }

    /// Estimate delay and bearing from two synchronized channels.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::EmptyChannels`] for empty input and
    /// [`AnalysisError::ChannelLengthMismatch`] when the channels differ
    /// in length.
    pub fn estimate(&self, first: &[f32], second: &[f32]) -> Result<DoaEstimate, AnalysisError> {
        if first.is_empty() || second.is_empty() {
            return Err(AnalysisError::EmptyChannels);
        }
        if first.len() != second.len() {
            return Err(AnalysisError::ChannelLengthMismatch {
                first: first.len(),
                second: second.len(),
            });
        }

        let n = (first.len() + second.len() - 1).next_power_of_two();
        let fft = Fft::new(n);

        let mut spec_a: Vec<Complex<f32>> = first
            .iter()
            .map(|&x| Complex::new(x, 0.0))
            .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
            .take(n)
            .collect();
        let mut spec_b: Vec<Complex<f32>> = second
            .iter()
            .map(|&x| Complex::new(x, 0.0))
            .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
            .take(n)
            .collect();
        fft.forward_in_place(&mut spec_a);
        fft.forward_in_place(&mut spec_b);

        // Phase transform: whiten the cross-power spectrum to unit
        // magnitude so only phase drives the correlation peak.
        let mut cross: Vec<Complex<f32>> = spec_a
            .iter()
            .zip(spec_b.iter())
            .map(|(&a, &b)| {
                let r = a.conj() * b;
                r / r.norm().max(PHAT_FLOOR)
            })
            .collect();
        fft.inverse_in_place(&mut cross);

        // Negative lags wrap to the tail of the inverse transform.
        let max_shift = ((self.max_delay_secs() * self.sample_rate).floor() as isize)
            .clamp(1, (n / 2) as isize);
        let value_at = |lag: isize| {
            let idx = lag.rem_euclid(n as isize) as usize;
            cross[idx].re
        };

        let mut peak_lag = -max_shift;
        let mut peak_value = value_at(peak_lag).abs();
        for lag in (-max_shift + 1)..=max_shift {
            let value = value_at(lag).abs();
            if value > peak_value {
                peak_value = value;
                peak_lag = lag;
            }
        }

        let offset = parabolic_offset(
            value_at(peak_lag - 1).abs(),
            peak_value,
            value_at(peak_lag + 1).abs(),
        );
        let delay_secs = (peak_lag as f32 + offset) / self.sample_rate;

        // tau = d * sin(theta) / c, inverted and clamped to the physical
        // range of the array.
        let sine = delay_secs * self.propagation_speed_m_s / self.mic_spacing_m;
        let saturated = sine.abs() > 1.0;
        let angle_deg = sine.clamp(-1.0, 1.0).asin().to_degrees();
        if saturated {
            debug!(
                delay_secs,
                angle_deg, "delay exceeds array bound, clamping to endfire"
            );
        }

        Ok(DoaEstimate {
            sample_rate: self.sample_rate,
            delay_secs,
            angle_deg,
            saturated,
        })
    }
}

//! Per-frame dominant-frequency extraction.
//!
//! For each spectral frame the tracker restricts the search to a valid
//! analysis band (excluding DC and a one-bin Nyquist guard), picks the
//! magnitude peak, and refines it with parabolic interpolation across the
//! peak and its two neighbors for sub-bin resolution.
//!
//! Silence is not an error here: a frame with no energy above the
//! threshold yields a sentinel (`None`) frequency, and downstream
//! consumers skip sentinels rather than treating them as 0 Hz.

use serde::Serialize;
use sondeo_dsp::{FrameSequencer, SpectralFrame, parabolic_offset};

/// Magnitude below which a peak is considered silence.
const SILENCE_MAGNITUDE: f32 = 1e-6;

/// One point of a frequency track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackPoint {
    /// Frame center time in seconds.
    pub time_secs: f32,
    /// Dominant frequency of the frame, or `None` for a silent frame.
    pub frequency_hz: Option<f32>,
    /// Fraction of in-band power held by the peak bin, in [0, 1].
    pub confidence: f32,
}

/// Dominant frequency over time. One point per frame, in frame order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyTrack {
    /// Per-frame track points; length equals the frame count.
    pub points: Vec<TrackPoint>,
    /// Sample rate of the source buffer in Hz.
    pub sample_rate: f32,
    /// Hop between frames in seconds.
    pub hop_secs: f32,
}

impl FrequencyTrack {
    /// Number of frames in the track.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the track has no frames.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Frequencies of the non-sentinel frames, in frame order.
    pub fn valid_frequencies(&self) -> impl Iterator<Item = f32> + '_ {
        self.points.iter().filter_map(|p| p.frequency_hz)
    }

    /// Number of non-sentinel frames.
    pub fn num_valid(&self) -> usize {
        self.valid_frequencies().count()
    }
}

/// Dominant-frequency tracker over a fixed analysis band.
#[derive(Debug, Clone, Copy)]
pub struct FrequencyTracker {
    low_hz: f32,
    high_hz: f32,
}

impl FrequencyTracker {
    /// Track within `[low_hz, high_hz]`. The band is additionally clipped
    /// to exclude DC and the topmost (Nyquist guard) bin.
    pub fn new(low_hz: f32, high_hz: f32) -> Self {
        Self { low_hz, high_hz }
    }

    /// Lower edge of the search band in Hz.
    pub fn low_hz(&self) -> f32 {
        self.low_hz
    }

    /// Upper edge of the search band in Hz.
    pub fn high_hz(&self) -> f32 {
        self.high_hz
    }

    /// Dominant frequency of a single frame with its confidence.
    ///
    /// Exact ties in magnitude resolve to the lowest-frequency bin. The
    /// returned confidence is the peak bin's share of in-band power, zero
    /// for silent frames.
    pub fn dominant(&self, frame: &SpectralFrame) -> (Option<f32>, f32) {
        let num_bins = frame.num_bins();
        if num_bins < 3 {
            return (None, 0.0);
        }

        // Search window: skip DC (bin 0) and guard the Nyquist bin.
        let lowest = ((self.low_hz / frame.bin_hz).ceil() as usize).max(1);
        let highest = (((self.high_hz / frame.bin_hz).floor() as usize) + 1).min(num_bins - 1);
        if lowest >= highest {
            return (None, 0.0);
        }

        let band = &frame.magnitudes[lowest..highest];
        let mut peak = 0usize;
        for (i, &mag) in band.iter().enumerate() {
            // Strict comparison keeps the lowest bin on an exact tie.
            if mag > band[peak] {
                peak = i;
            }
        }
        if band[peak] < SILENCE_MAGNITUDE {
            return (None, 0.0);
        }

        let peak_bin = lowest + peak;
        let offset = if peak_bin >= 1 && peak_bin + 1 <= num_bins - 1 {
            parabolic_offset(
                frame.magnitudes[peak_bin - 1],
                frame.magnitudes[peak_bin],
                frame.magnitudes[peak_bin + 1],
            )
        } else {
            0.0
        };
        let frequency = (peak_bin as f32 + offset) * frame.bin_hz;

        let band_power: f32 = band.iter().map(|&m| m * m).sum();
        let confidence = if band_power > 0.0 {
            band[peak] * band[peak] / band_power
        } else {
            0.0
        };

        (Some(frequency), confidence)
    }

    /// Track every frame of a prepared frame sequence.
    ///
    /// A pure map over the frames: results are identical however the
    /// per-frame work is scheduled.
    pub fn track_frames(
        &self,
        frames: &[SpectralFrame],
        sample_rate: f32,
        hop_secs: f32,
    ) -> FrequencyTrack {
        let points = frames
            .iter()
            .map(|frame| {
                let (frequency_hz, confidence) = self.dominant(frame);
                TrackPoint {
                    time_secs: frame.time_secs,
                    frequency_hz,
                    confidence,
                }
            })
            .collect();

        FrequencyTrack {
            points,
            sample_rate,
            hop_secs,
        }
    }

    /// Window, transform, and track a raw clip in one pass.
    pub fn track_clip(&self, sequencer: &FrameSequencer, samples: &[f32]) -> FrequencyTrack {
        let frames = sequencer.frames(samples);
        self.track_frames(&frames, sequencer.sample_rate(), sequencer.hop_secs())
    }
}

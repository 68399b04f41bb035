//! Doppler-based radial velocity estimation.
//!
//! Converts a frequency track into per-frame radial velocities and an
//! aggregate motion summary.
//!
//! # Physics
//!
//! A source emitting `f0` and moving toward a stationary observer at
//! radial speed `v` through a medium with propagation speed `c` is heard
//! at `f = f0 * c / (c - v)`. Rearranged for the estimate:
//!
//! ```text
//! v = c * (f - f0) / f
//! ```
//!
//! Sign convention: positive shift (observed above reference) means the
//! source is approaching, and the returned velocity is positive.
//!
//! # Reference frequency
//!
//! The true unshifted emission frequency is not independently observable
//! from a single clip. When the caller does not supply one, the estimator
//! uses the median of the valid track frequencies. This is an explicit
//! approximation: it biases the clip's net velocity toward zero, so a
//! clip that only ever approaches will read slow. Supply
//! `source_frequency_hz` when a reference recording exists.

use serde::Serialize;
use sondeo_config::AnalysisSettings;
use sondeo_dsp::median;
use tracing::debug;

use crate::error::AnalysisError;
use crate::tracker::FrequencyTrack;

/// Motion classification of a frame or clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Observed frequency above reference: source moving toward us.
    Approaching,
    /// Observed frequency below reference: source moving away.
    Receding,
    /// Frequency shift within the dead band.
    Stationary,
}

/// Per-frame velocity estimate, for plotting collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DopplerFrame {
    /// Frame center time in seconds.
    pub time_secs: f32,
    /// Observed dominant frequency, `None` for silent frames.
    pub frequency_hz: Option<f32>,
    /// Estimated radial velocity in m/s, positive toward the observer.
    pub velocity_m_s: f32,
    /// Motion classification of this frame.
    pub direction: Direction,
    /// Time to cover the configured distance at this frame's speed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_time_secs: Option<f32>,
}

/// Aggregate motion summary of a clip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DopplerSummary {
    /// Mean signed velocity over moving frames, m/s.
    pub mean_velocity_m_s: f32,
    /// Largest absolute velocity over moving frames, m/s.
    pub max_velocity_m_s: f32,
    /// Majority-vote direction over valid frames; ties are stationary.
    pub dominant_direction: Direction,
    /// Number of frames in the track, sentinels included.
    pub num_frames: usize,
    /// Clip duration covered by the track, seconds.
    pub duration_secs: f32,
    /// Time for sound to cover the configured distance, seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_travel_time_secs: Option<f32>,
    /// Reference frequency used for the shift computation, Hz.
    pub reference_frequency_hz: f32,
}

impl DopplerSummary {
    /// True when the dominant direction reports motion.
    pub fn is_moving(&self) -> bool {
        self.dominant_direction != Direction::Stationary
    }
}

/// Full Doppler analysis: the per-frame series plus its summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DopplerAnalysis {
    /// One entry per track frame.
    pub frames: Vec<DopplerFrame>,
    /// Aggregate statistics.
    pub summary: DopplerSummary,
}

/// Converts a frequency track into velocities and a motion summary.
#[derive(Debug, Clone)]
pub struct VelocityEstimator {
    propagation_speed_m_s: f32,
    source_frequency_hz: Option<f32>,
    direction_threshold_hz: f32,
    distance_m: Option<f32>,
}

impl VelocityEstimator {
    /// Create an estimator for a medium with the given propagation speed.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::NonPositivePropagationSpeed`] when the
    /// speed is not positive and finite.
    pub fn new(propagation_speed_m_s: f32) -> Result<Self, AnalysisError> {
        if !(propagation_speed_m_s.is_finite() && propagation_speed_m_s > 0.0) {
            return Err(AnalysisError::NonPositivePropagationSpeed(
                propagation_speed_m_s,
            ));
        }
        Ok(Self {
            propagation_speed_m_s,
            source_frequency_hz: None,
            direction_threshold_hz: 2.0,
            distance_m: None,
        })
    }

    /// Build an estimator from deployment settings.
    pub fn from_settings(settings: &AnalysisSettings) -> Result<Self, AnalysisError> {
        let mut estimator = Self::new(settings.propagation_speed_m_s)?;
        estimator.source_frequency_hz = settings.source_frequency_hz;
        estimator.direction_threshold_hz = settings.direction_threshold_hz;
        estimator.distance_m = settings.distance_m;
        Ok(estimator)
    }

    /// Use a known emission frequency instead of inferring one.
    pub fn with_source_frequency(mut self, frequency_hz: f32) -> Self {
        self.source_frequency_hz = Some(frequency_hz);
        self
    }

    /// Set the dead band on the frequency shift, in Hz. Shifts inside the
    /// band classify as stationary, suppressing noise-driven flips.
    pub fn with_direction_threshold(mut self, threshold_hz: f32) -> Self {
        self.direction_threshold_hz = threshold_hz;
        self
    }

    /// Enable travel-time estimates for the given distance in meters.
    pub fn with_distance(mut self, distance_m: f32) -> Self {
        self.distance_m = Some(distance_m);
        self
    }

    /// Reference frequency for a track: the configured emission frequency
    /// when set, else the median of valid track frequencies.
    fn reference_frequency(&self, track: &FrequencyTrack) -> Option<f32> {
        if let Some(freq) = self.source_frequency_hz {
            return Some(freq);
        }
        let valid: Vec<f32> = track.valid_frequencies().collect();
        let inferred = median(&valid);
        if let Some(freq) = inferred {
            debug!(
                reference_hz = freq,
                num_valid = valid.len(),
                "inferred source frequency from track median"
            );
        }
        inferred
    }

    /// Analyze a frequency track.
    ///
    /// An all-sentinel track produces the degenerate zero-velocity,
    /// stationary summary rather than an error.
    pub fn analyze(&self, track: &FrequencyTrack) -> DopplerAnalysis {
        let duration_secs = track.len() as f32 * track.hop_secs;

        let Some(reference) = self.reference_frequency(track) else {
            debug!(num_frames = track.len(), "all-sentinel track, reporting stationary");
            return Self::degenerate(track, duration_secs, self.source_frequency_hz);
        };

        let frames: Vec<DopplerFrame> = track
            .points
            .iter()
            .map(|point| {
                let Some(observed) = point.frequency_hz else {
                    return DopplerFrame {
                        time_secs: point.time_secs,
                        frequency_hz: None,
                        velocity_m_s: 0.0,
                        direction: Direction::Stationary,
                        travel_time_secs: None,
                    };
                };

                let delta = observed - reference;
                let direction = if delta.abs() < self.direction_threshold_hz {
                    Direction::Stationary
                } else if delta > 0.0 {
                    Direction::Approaching
                } else {
                    Direction::Receding
                };
                let velocity = if observed > 0.0 {
                    self.propagation_speed_m_s * delta / observed
                } else {
                    0.0
                };
                let travel_time = match (self.distance_m, direction) {
                    (Some(distance), Direction::Approaching | Direction::Receding)
                        if velocity.abs() > f32::EPSILON =>
                    {
                        Some(distance / velocity.abs())
                    }
                    _ => None,
                };

                DopplerFrame {
                    time_secs: point.time_secs,
                    frequency_hz: Some(observed),
                    velocity_m_s: velocity,
                    direction,
                    travel_time_secs: travel_time,
                }
            })
            .collect();

        let summary = self.summarize(track, &frames, duration_secs, reference);
        DopplerAnalysis { frames, summary }
    }

    fn summarize(
        &self,
        track: &FrequencyTrack,
        frames: &[DopplerFrame],
        duration_secs: f32,
        reference: f32,
    ) -> DopplerSummary {
        let moving: Vec<&DopplerFrame> = frames
            .iter()
            .filter(|f| f.frequency_hz.is_some() && f.direction != Direction::Stationary)
            .collect();

        let (mean_velocity, max_velocity) = if moving.is_empty() {
            (0.0, 0.0)
        } else {
            let sum: f32 = moving.iter().map(|f| f.velocity_m_s).sum();
            let max = moving
                .iter()
                .map(|f| f.velocity_m_s.abs())
                .fold(0.0f32, f32::max);
            (sum / moving.len() as f32, max)
        };

        // Majority vote over valid frames; any tie for the lead counts as
        // stationary.
        let mut votes = [0usize; 3];
        for frame in frames.iter().filter(|f| f.frequency_hz.is_some()) {
            let slot = match frame.direction {
                Direction::Approaching => 0,
                Direction::Receding => 1,
                Direction::Stationary => 2,
            };
            votes[slot] += 1;
        }
        let top = *votes.iter().max().unwrap_or(&0);
        let dominant_direction = if top == 0 || votes.iter().filter(|&&v| v == top).count() > 1 {
            Direction::Stationary
        } else if votes[0] == top {
            Direction::Approaching
        } else if votes[1] == top {
            Direction::Receding
        } else {
            Direction::Stationary
        };

        DopplerSummary {
            mean_velocity_m_s: mean_velocity,
            max_velocity_m_s: max_velocity,
            dominant_direction,
            num_frames: track.len(),
            duration_secs,
            mean_travel_time_secs: self
                .distance_m
                .map(|d| d / self.propagation_speed_m_s),
            reference_frequency_hz: reference,
        }
    }

    fn degenerate(
        track: &FrequencyTrack,
        duration_secs: f32,
        reference: Option<f32>,
    ) -> DopplerAnalysis {
        let frames = track
            .points
            .iter()
            .map(|point| DopplerFrame {
                time_secs: point.time_secs,
                frequency_hz: None,
                velocity_m_s: 0.0,
                direction: Direction::Stationary,
                travel_time_secs: None,
            })
            .collect();

        DopplerAnalysis {
            frames,
            summary: DopplerSummary {
                mean_velocity_m_s: 0.0,
                max_velocity_m_s: 0.0,
                dominant_direction: Direction::Stationary,
                num_frames: track.len(),
                duration_secs,
                mean_travel_time_secs: None,
                reference_frequency_hz: reference.unwrap_or(0.0),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::TrackPoint;

    fn track_from(freqs: &[Option<f32>]) -> FrequencyTrack {
        let hop_secs = 0.05;
        FrequencyTrack {
            points: freqs
                .iter()
                .enumerate()
                .map(|(i, &frequency_hz)| TrackPoint {
                    time_secs: i as f32 * hop_secs,
                    frequency_hz,
                    confidence: if frequency_hz.is_some() { 1.0 } else { 0.0 },
                })
                .collect(),
            sample_rate: 44100.0,
            hop_secs,
        }
    }

    #[test]
    fn rejects_non_positive_speed() {
        assert!(matches!(
            VelocityEstimator::new(0.0),
            Err(AnalysisError::NonPositivePropagationSpeed(_))
        ));
        assert!(matches!(
            VelocityEstimator::new(-343.0),
            Err(AnalysisError::NonPositivePropagationSpeed(_))
        ));
    }

    #[test]
    fn approaching_source_gives_positive_velocity() {
        // f = f0 * c / (c - v) with f0 = 1000, c = 343, v = 20
        // => f = 1061.92; the estimator inverts this exactly.
        let estimator = VelocityEstimator::new(343.0)
            .unwrap()
            .with_source_frequency(1000.0);
        let track = track_from(&[Some(1061.92); 8]);
        let analysis = estimator.analyze(&track);

        assert_eq!(analysis.summary.dominant_direction, Direction::Approaching);
        assert!(
            (analysis.summary.mean_velocity_m_s - 20.0).abs() < 0.05,
            "mean velocity {} should be ~20 m/s",
            analysis.summary.mean_velocity_m_s
        );
    }

    #[test]
    fn receding_source_gives_negative_velocity() {
        // f = f0 * c / (c + v) with v = 15 => f = 957.98
        let estimator = VelocityEstimator::new(343.0)
            .unwrap()
            .with_source_frequency(1000.0);
        let track = track_from(&[Some(957.98); 8]);
        let analysis = estimator.analyze(&track);

        assert_eq!(analysis.summary.dominant_direction, Direction::Receding);
        assert!(
            (analysis.summary.mean_velocity_m_s + 15.0).abs() < 0.05,
            "mean velocity {} should be ~-15 m/s",
            analysis.summary.mean_velocity_m_s
        );
    }

    #[test]
    fn shift_inside_dead_band_is_stationary() {
        let estimator = VelocityEstimator::new(343.0)
            .unwrap()
            .with_source_frequency(1000.0)
            .with_direction_threshold(2.0);
        let track = track_from(&[Some(1001.0), Some(999.5), Some(1000.8)]);
        let analysis = estimator.analyze(&track);

        assert_eq!(analysis.summary.dominant_direction, Direction::Stationary);
        assert_eq!(analysis.summary.mean_velocity_m_s, 0.0);
        assert_eq!(analysis.summary.max_velocity_m_s, 0.0);
    }

    #[test]
    fn all_sentinel_track_is_degenerate_stationary() {
        let estimator = VelocityEstimator::new(343.0).unwrap();
        let track = track_from(&[None; 5]);
        let analysis = estimator.analyze(&track);

        assert_eq!(analysis.frames.len(), 5);
        assert_eq!(analysis.summary.dominant_direction, Direction::Stationary);
        assert_eq!(analysis.summary.mean_velocity_m_s, 0.0);
        assert_eq!(analysis.summary.num_frames, 5);
    }

    #[test]
    fn sentinel_frames_are_skipped_not_zero_hz() {
        // A sentinel in the middle must not register as a huge negative
        // shift from the 1000 Hz reference.
        let estimator = VelocityEstimator::new(343.0)
            .unwrap()
            .with_source_frequency(1000.0);
        let track = track_from(&[Some(1061.92), None, Some(1061.92)]);
        let analysis = estimator.analyze(&track);

        assert_eq!(analysis.summary.dominant_direction, Direction::Approaching);
        assert_eq!(analysis.frames[1].velocity_m_s, 0.0);
        assert!(analysis.summary.mean_velocity_m_s > 0.0);
    }

    #[test]
    fn median_reference_balances_symmetric_track() {
        // Without a supplied source frequency the median is the
        // reference, so a symmetric approach/recede track votes evenly
        // and ties resolve to stationary.
        let estimator = VelocityEstimator::new(343.0).unwrap();
        let track = track_from(&[
            Some(1040.0),
            Some(1020.0),
            Some(1000.0),
            Some(980.0),
            Some(960.0),
        ]);
        let analysis = estimator.analyze(&track);

        assert_eq!(analysis.summary.reference_frequency_hz, 1000.0);
        assert_eq!(analysis.summary.dominant_direction, Direction::Stationary);
    }

    #[test]
    fn duration_is_frames_times_hop() {
        let estimator = VelocityEstimator::new(343.0).unwrap();
        let track = track_from(&[Some(1000.0); 10]);
        let analysis = estimator.analyze(&track);
        assert!((analysis.summary.duration_secs - 0.5).abs() < 1e-6);
    }

    #[test]
    fn travel_time_is_distance_over_propagation_speed() {
        let estimator = VelocityEstimator::new(343.0)
            .unwrap()
            .with_source_frequency(1000.0)
            .with_distance(686.0);
        let track = track_from(&[Some(1061.92); 4]);
        let analysis = estimator.analyze(&track);

        let travel = analysis.summary.mean_travel_time_secs.unwrap();
        assert!((travel - 2.0).abs() < 1e-6);

        // Per-frame travel times use the frame's own speed instead.
        let frame_travel = analysis.frames[0].travel_time_secs.unwrap();
        assert!((frame_travel - 686.0 / 20.0).abs() < 0.1);
    }

    #[test]
    fn majority_vote_ties_resolve_to_stationary() {
        let estimator = VelocityEstimator::new(343.0)
            .unwrap()
            .with_source_frequency(1000.0);
        let track = track_from(&[Some(1061.92), Some(957.98)]);
        let analysis = estimator.analyze(&track);
        assert_eq!(analysis.summary.dominant_direction, Direction::Stationary);
    }

    #[test]
    fn forward_inverse_round_trip_recovers_velocity() {
        // Synthesize observed frequencies from known velocities, then
        // recover them.
        let c = 343.0;
        let f0 = 800.0;
        let velocities = [5.0f32, 12.0, 25.0, 40.0];
        let observed: Vec<Option<f32>> =
            velocities.iter().map(|&v| Some(f0 * c / (c - v))).collect();

        let estimator = VelocityEstimator::new(c).unwrap().with_source_frequency(f0);
        let analysis = estimator.analyze(&track_from(&observed));

        for (frame, &expected) in analysis.frames.iter().zip(velocities.iter()) {
            assert!(
                (frame.velocity_m_s - expected).abs() < 0.01,
                "recovered {} m/s, expected {expected} m/s",
                frame.velocity_m_s
            );
        }
    }
}

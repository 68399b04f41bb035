//! Band energy profiling.
//!
//! Distributes spectral power over a configured table of frequency bands
//! and reports each band's absolute level plus its fraction of the total
//! in-band power. The fractions are what the classifier consumes; the dB
//! levels are for display and logging.

use serde::Serialize;
use sondeo_config::BandDefinition;
use sondeo_dsp::{SpectralFrame, power_db};

use crate::error::AnalysisError;

/// Power measurement for one band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandEnergy {
    /// Band name from the table.
    pub name: String,
    /// Lower edge in Hz, inclusive.
    pub low_hz: f32,
    /// Upper edge in Hz, exclusive.
    pub high_hz: f32,
    /// Source types the band table associates with this band.
    pub candidate_sources: Vec<String>,
    /// Summed spectral power in the band.
    pub power: f32,
    /// Share of the total in-band power, in [0, 1]. Fractions over a
    /// profile sum to one, also for silent input.
    pub fraction: f32,
    /// Band power in dB, floored for silent bands.
    pub energy_db: f32,
}

/// Energy distribution of a clip over the band table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandProfile {
    /// One entry per band, in table order.
    pub bands: Vec<BandEnergy>,
    /// Total power across all bands.
    pub total_power: f32,
}

impl BandProfile {
    /// Band indices sorted by descending fraction. The sort is stable, so
    /// equal fractions keep table order.
    pub fn ranked(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.bands.len()).collect();
        order.sort_by(|&a, &b| {
            self.bands[b]
                .fraction
                .partial_cmp(&self.bands[a].fraction)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        order
    }

    /// The band holding the largest fraction, if any bands exist.
    pub fn dominant(&self) -> Option<&BandEnergy> {
        self.ranked().first().map(|&i| &self.bands[i])
    }
}

/// Computes band profiles against a fixed band table.
#[derive(Debug, Clone)]
pub struct BandProfiler {
    table: Vec<BandDefinition>,
}

impl BandProfiler {
    /// Profile against the given band table.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::EmptyBandTable`] for an empty table.
    pub fn new(table: Vec<BandDefinition>) -> Result<Self, AnalysisError> {
        if table.is_empty() {
            return Err(AnalysisError::EmptyBandTable);
        }
        Ok(Self { table })
    }

    /// The band table in effect.
    pub fn table(&self) -> &[BandDefinition] {
        &self.table
    }

    /// Profile a clip from its spectral frames.
    ///
    /// Frame power spectra are averaged bin-wise before the bands are
    /// summed, so long and short clips compare on the same scale. With no
    /// frames, or a clip with no in-band power at all, every band reports
    /// zero power and the fractions fall back to a uniform split.
    pub fn profile(&self, frames: &[SpectralFrame]) -> BandProfile {
        let num_bins = frames.first().map_or(0, SpectralFrame::num_bins);
        let mut mean_power = vec![0.0f32; num_bins];
        for frame in frames {
            for (acc, p) in mean_power.iter_mut().zip(frame.power()) {
                *acc += p;
            }
        }
        if !frames.is_empty() {
            let scale = 1.0 / frames.len() as f32;
            for p in &mut mean_power {
                *p *= scale;
            }
        }
        let bin_hz = frames.first().map_or(0.0, |f| f.bin_hz);

        self.profile_power_bins(&mean_power, bin_hz)
    }

    /// Profile a single frame.
    pub fn profile_frame(&self, frame: &SpectralFrame) -> BandProfile {
        self.profile_power_bins(&frame.power(), frame.bin_hz)
    }

    fn profile_power_bins(&self, power: &[f32], bin_hz: f32) -> BandProfile {
        let powers: Vec<f32> = self
            .table
            .iter()
            .map(|band| {
                if bin_hz <= 0.0 {
                    return 0.0;
                }
                power
                    .iter()
                    .enumerate()
                    .filter(|(k, _)| {
                        let freq = *k as f32 * bin_hz;
                        freq >= band.low_hz && freq < band.high_hz
                    })
                    .map(|(_, &p)| p)
                    .sum()
            })
            .collect();

        let total_power: f32 = powers.iter().sum();
        let uniform = 1.0 / self.table.len() as f32;

        let bands = self
            .table
            .iter()
            .zip(powers.iter())
            .map(|(band, &p)| BandEnergy {
                name: band.name.clone(),
                low_hz: band.low_hz,
                high_hz: band.high_hz,
                candidate_sources: band.candidate_sources.clone(),
                power: p,
                fraction: if total_power > 0.0 {
                    p / total_power
                } else {
                    uniform
                },
                energy_db: power_db(p),
            })
            .collect();

        BandProfile { bands, total_power }
    }
}

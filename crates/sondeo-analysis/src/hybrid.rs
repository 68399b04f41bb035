//! Hybrid source classification.
//!
//! Candidates come from the band table: each band names the source types
//! that typically put energy there. The classifier seeds each candidate
//! with the fractions of the top-energy bands that list it, then, when a
//! Doppler summary is available and reports motion, reweights mobile
//! sources up and the rest down. Confidences are renormalized to sum to
//! one after each step, so they read as a ranking, not probabilities.

use serde::Serialize;
use sondeo_config::{BandDefinition, SignatureMap};
use tracing::debug;

use crate::bands::{BandEnergy, BandProfile};
use crate::doppler::{Direction, DopplerSummary};
use crate::error::AnalysisError;

/// Which evidence fed a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Band energies only.
    FrequencyOnly,
    /// Band energies reweighted by a Doppler motion summary.
    HybridWithDoppler,
}

/// One candidate source with its confidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceScore {
    /// Source type name from the band table.
    pub source: String,
    /// Relative confidence in [0, 1]; scores over a ranking sum to one.
    pub confidence: f32,
}

/// Ranked classification of a clip.
///
/// Carries the evidence it was derived from, so the record is complete
/// on its own for external reporting collaborators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    /// The top-ranked source type.
    pub first_guess: String,
    /// All candidates, sorted by descending confidence. Ties rank by
    /// band-table priority: the candidate first named by an earlier
    /// table band wins.
    pub ranking: Vec<SourceScore>,
    /// The band energies the candidates were seeded from, in table
    /// order.
    pub band_energies: Vec<BandEnergy>,
    /// Mean radial velocity from the Doppler summary, m/s; `None` when
    /// no Doppler evidence was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity_m_s: Option<f32>,
    /// Dominant motion direction from the Doppler summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    /// Whether the Doppler summary reported motion; `None` when no
    /// Doppler evidence was supplied.
    pub is_moving: Option<bool>,
    /// Evidence used.
    pub method: Method,
}

/// Classifies band profiles, optionally informed by Doppler motion.
#[derive(Debug, Clone)]
pub struct HybridClassifier {
    table: Vec<BandDefinition>,
    signature: SignatureMap,
}

impl HybridClassifier {
    /// Build a classifier over a band table and weighting map.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::EmptyBandTable`] or
    /// [`AnalysisError::ZeroTopK`]; both are configuration errors.
    pub fn new(table: Vec<BandDefinition>, signature: SignatureMap) -> Result<Self, AnalysisError> {
        if table.is_empty() {
            return Err(AnalysisError::EmptyBandTable);
        }
        if signature.top_k == 0 {
            return Err(AnalysisError::ZeroTopK);
        }
        Ok(Self { table, signature })
    }

    /// Classify a band profile.
    ///
    /// `doppler` switches the method to [`Method::HybridWithDoppler`];
    /// the reweighting only applies when it reports motion.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::NoCandidates`] when none of the
    /// top-energy bands names any candidate source. That points at a
    /// band table with empty candidate lists, so it is a configuration
    /// error, not a property of the clip.
    pub fn classify(
        &self,
        profile: &BandProfile,
        doppler: Option<&DopplerSummary>,
    ) -> Result<Classification, AnalysisError> {
        let top_k = self.signature.top_k;
        let top: Vec<usize> = profile.ranked().into_iter().take(top_k).collect();

        // Seed in table order: insertion order is then the tie-break
        // priority, and the stable sort below preserves it.
        let mut ranking: Vec<SourceScore> = Vec::new();
        for (band_idx, band) in self.table.iter().enumerate() {
            if !top.contains(&band_idx) {
                continue;
            }
            let Some(energy) = profile.bands.get(band_idx) else {
                continue;
            };
            for source in &band.candidate_sources {
                match ranking.iter_mut().find(|s| &s.source == source) {
                    Some(score) => score.confidence += energy.fraction,
                    None => ranking.push(SourceScore {
                        source: source.clone(),
                        confidence: energy.fraction,
                    }),
                }
            }
        }

        if ranking.is_empty() {
            return Err(AnalysisError::NoCandidates { top_k });
        }
        normalize(&mut ranking);

        let method = match doppler {
            Some(summary) => {
                if summary.dominant_direction != Direction::Stationary {
                    for score in &mut ranking {
                        score.confidence *= if self.signature.is_mobile(&score.source) {
                            self.signature.mobile_boost
                        } else {
                            self.signature.stationary_penalty
                        };
                    }
                    normalize(&mut ranking);
                }
                Method::HybridWithDoppler
            }
            None => Method::FrequencyOnly,
        };

        // Stable: candidates tied on confidence keep table priority.
        ranking.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let first_guess = ranking[0].source.clone();
        debug!(
            first_guess = %first_guess,
            num_candidates = ranking.len(),
            ?method,
            "classified clip"
        );

        Ok(Classification {
            first_guess,
            ranking,
            band_energies: profile.bands.clone(),
            velocity_m_s: doppler.map(|s| s.mean_velocity_m_s),
            direction: doppler.map(|s| s.dominant_direction),
            is_moving: doppler.map(DopplerSummary::is_moving),
            method,
        })
    }
}

fn normalize(ranking: &mut [SourceScore]) {
    let total: f32 = ranking.iter().map(|s| s.confidence).sum();
    if total > 0.0 {
        for score in ranking.iter_mut() {
            score.confidence /= total;
        }
    } else {
        let uniform = 1.0 / ranking.len() as f32;
        for score in ranking.iter_mut() {
            score.confidence = uniform;
        }
    }
}

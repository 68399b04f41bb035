//! Sondeo Analysis - Acoustic source characterization
//!
//! Turns a mono clip (plus an optional second channel) into a motion and
//! identity estimate for the dominant sound source:
//!
//! - [`tracker`] - Dominant-frequency tracking with sub-bin peak refinement
//! - [`doppler`] - Radial velocity and direction from the frequency track
//! - [`doa`] - GCC-PHAT inter-channel delay and bearing estimation
//! - [`bands`] - Energy distribution over a configurable band table
//! - [`hybrid`] - Ranked source classification from bands plus motion
//! - [`pipeline`] - One-call composition of all the stages
//!
//! ## Example Workflow
//!
//! ```rust,ignore
//! use sondeo_analysis::ClipAnalyzer;
//! use sondeo_config::AnalysisSettings;
//!
//! let settings = AnalysisSettings::default();
//! settings.validate()?;
//!
//! let analyzer = ClipAnalyzer::new(&settings, 44100.0)?;
//! let report = analyzer.analyze(&samples)?;
//! println!(
//!     "{} ({:?}, {:.1} m/s)",
//!     report.classification.first_guess,
//!     report.doppler.summary.dominant_direction,
//!     report.doppler.summary.mean_velocity_m_s,
//! );
//! ```
//!
//! ## Direction of arrival
//!
//! ```rust,ignore
//! let estimate = analyzer.locate(&left, &right)?;
//! println!("{:.1} deg off broadside", estimate.angle_deg);
//! ```

pub mod bands;
pub mod doa;
pub mod doppler;
pub mod hybrid;
pub mod pipeline;
pub mod tracker;

mod error;

// Re-export main types
pub use bands::{BandEnergy, BandProfile, BandProfiler};
pub use doa::{DelayAngleEstimator, DoaEstimate};
pub use doppler::{Direction, DopplerAnalysis, DopplerFrame, DopplerSummary, VelocityEstimator};
pub use error::AnalysisError;
pub use hybrid::{Classification, HybridClassifier, Method, SourceScore};
pub use pipeline::{ClipAnalyzer, ClipReport};
pub use tracker::{FrequencyTrack, FrequencyTracker, TrackPoint};

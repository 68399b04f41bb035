//! Deployment configuration for the sondeo acoustic analysis core.
//!
//! The analyzers themselves are pure functions; everything tunable about
//! them lives here, loadable from TOML so a deployment (aerial microphone
//! pair, underwater hydrophone, ...) can swap parameters without code
//! changes:
//!
//! - [`AnalysisSettings`] - framing, propagation speed, thresholds, DOA
//!   geometry, all in one serde struct with sensible defaults
//! - [`BandDefinition`] / [`default_band_table`] - the named frequency
//!   bands and the source types each band suggests
//! - [`SignatureMap`] - the hybrid classifier's weighting table
//!
//! # Example
//!
//! ```rust
//! use sondeo_config::AnalysisSettings;
//!
//! let settings = AnalysisSettings::default();
//! settings.validate().unwrap();
//! assert_eq!(settings.band_table.len(), 6);
//! ```

mod bands;
mod error;
mod settings;
mod signature;

/// Settings and band-table validation.
pub mod validation;

pub use bands::{BandDefinition, default_band_table};
pub use error::ConfigError;
pub use settings::{AnalysisSettings, SPEED_OF_SOUND_AIR_M_S, SPEED_OF_SOUND_WATER_M_S};
pub use signature::SignatureMap;
pub use validation::ValidationError;

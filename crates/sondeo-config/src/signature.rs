//! The hybrid classifier's weighting table.

use serde::{Deserialize, Serialize};

/// Data-driven decision policy for the hybrid classifier.
///
/// Expressing the top-K/boost policy as a table keeps the classifier free
/// of nested branching: candidates come from the band table, and this map
/// only says how many bands to consider and how motion evidence reweights
/// mobile versus stationary source types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureMap {
    /// Number of top-energy bands contributing candidates.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Multiplier applied to mobile-source candidates when the Doppler
    /// summary reports motion.
    #[serde(default = "default_mobile_boost")]
    pub mobile_boost: f32,

    /// Multiplier applied to non-mobile candidates when motion is
    /// reported.
    #[serde(default = "default_stationary_penalty")]
    pub stationary_penalty: f32,

    /// Source classes tagged as mobile.
    #[serde(default = "default_mobile_sources")]
    pub mobile_sources: Vec<String>,
}

fn default_top_k() -> usize {
    2
}

fn default_mobile_boost() -> f32 {
    1.3
}

fn default_stationary_penalty() -> f32 {
    0.7
}

fn default_mobile_sources() -> Vec<String> {
    ["drone", "car_truck", "fixed_wing", "helicopter", "marine_vessel"]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

impl Default for SignatureMap {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            mobile_boost: default_mobile_boost(),
            stationary_penalty: default_stationary_penalty(),
            mobile_sources: default_mobile_sources(),
        }
    }
}

impl SignatureMap {
    /// Whether `class` is tagged as a mobile source type.
    pub fn is_mobile(&self, class: &str) -> bool {
        self.mobile_sources.iter().any(|m| m == class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_tag_vehicles_as_mobile() {
        let map = SignatureMap::default();
        assert!(map.is_mobile("drone"));
        assert!(map.is_mobile("marine_vessel"));
        assert!(!map.is_mobile("earthquake"));
        assert!(!map.is_mobile("bird"));
    }

    #[test]
    fn default_policy_values() {
        let map = SignatureMap::default();
        assert_eq!(map.top_k, 2);
        assert!(map.mobile_boost > 1.0);
        assert!(map.stationary_penalty < 1.0);
    }
}

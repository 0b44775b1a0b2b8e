//! Synthesis configuration.
//!
//! Every tunable of the pipeline lives here as plain data with a `Default`
//! carrying the stock values. Hosts can load partial overrides from JSON;
//! any field left out keeps its default.
//!
//! ```
//! use floorplan_logic::config::SynthesisConfig;
//!
//! let config = SynthesisConfig::from_json(r#"{"anneal": {"iterations": 500, "seed": 7}}"#).unwrap();
//! assert_eq!(config.anneal.iterations, 500);
//! assert_eq!(config.anneal.snap_interval, 200);
//! assert_eq!(config.margin, 0.2);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sizing::SizeTable;

/// Default distance (m) between the layout's minimum corner and the origin.
pub const DEFAULT_MARGIN: f64 = 0.2;

/// Top-level configuration for [`crate::pipeline::synthesize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    pub sizes: SizeTable,
    pub placer: PlacerConfig,
    pub anneal: AnnealConfig,
    /// Margin used by the normalizer.
    pub margin: f64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            sizes: SizeTable::default(),
            placer: PlacerConfig::default(),
            anneal: AnnealConfig::default(),
            margin: DEFAULT_MARGIN,
        }
    }
}

impl SynthesisConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Same config with a different annealing seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.anneal.seed = seed;
        self
    }

    /// Same config with a different annealing budget.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.anneal.iterations = iterations;
        self
    }
}

/// Constructive placer tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacerConfig {
    /// Step (m) between slide offsets along an anchor's edge.
    pub slide_step: f64,
    /// Gap (m) left to the right of the bounding box for fallback placements.
    pub fallback_gap: f64,
}

impl Default for PlacerConfig {
    fn default() -> Self {
        Self {
            slide_step: 0.5,
            fallback_gap: 0.5,
        }
    }
}

/// Annealer tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealConfig {
    /// Fixed iteration budget; there is no other stopping rule.
    pub iterations: u32,
    pub seed: u64,
    /// Starting temperature, cooled linearly towards zero.
    pub initial_temperature: f64,
    /// Largest random translation (m) per axis per step.
    pub max_shift: f64,
    /// Run a snap sweep every this many iterations (0 disables).
    pub snap_interval: u32,
    /// Aspect ratio tolerated without penalty.
    pub ideal_aspect: f64,
    pub weights: CostWeights,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            iterations: 2000,
            seed: 42,
            initial_temperature: 1.0,
            max_shift: 0.8,
            snap_interval: 200,
            ideal_aspect: 1.5,
            weights: CostWeights::default(),
        }
    }
}

/// Linear weights of the four cost terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostWeights {
    pub overlap: f64,
    pub adjacency: f64,
    pub area: f64,
    pub aspect: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            overlap: 100.0,
            adjacency: 0.2,
            area: 1.0,
            aspect: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = SynthesisConfig::default();
        assert_eq!(c.placer.slide_step, 0.5);
        assert_eq!(c.anneal.initial_temperature, 1.0);
        assert_eq!(c.anneal.max_shift, 0.8);
        assert_eq!(c.anneal.weights.overlap, 100.0);
        assert_eq!(c.anneal.weights.adjacency, 0.2);
    }

    #[test]
    fn test_empty_json_is_default() {
        let c = SynthesisConfig::from_json("{}").unwrap();
        assert_eq!(c, SynthesisConfig::default());
    }

    #[test]
    fn test_partial_weights_override() {
        let c = SynthesisConfig::from_json(r#"{"anneal": {"weights": {"area": 2.5}}}"#).unwrap();
        assert_eq!(c.anneal.weights.area, 2.5);
        assert_eq!(c.anneal.weights.overlap, 100.0);
        assert_eq!(c.anneal.iterations, 2000);
    }

    #[test]
    fn test_round_trip_preserves_size_table() {
        let c = SynthesisConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let back = SynthesisConfig::from_json(&json).unwrap();
        assert_eq!(back.sizes, c.sizes);
    }
}

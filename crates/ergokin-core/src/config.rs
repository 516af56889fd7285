use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{CostWeights, SafetyZone};

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_variation_step() -> f64 {
    0.1
}
const fn default_max_iterations() -> u32 {
    200
}
const fn default_cost_tolerance() -> f64 {
    1e-9
}
const fn default_gradient_tolerance() -> f64 {
    1e-7
}

/// Hip abduction/rotation and ankle abduction are pinned upright on both
/// sides unless the caller overrides them.
fn default_pins() -> HashMap<String, f64> {
    let mut pins = HashMap::new();
    for side in ["left", "right"] {
        for joint in ["hip_0", "hip_2", "ankle_0"] {
            pins.insert(format!("{side}_{joint}"), 0.0);
        }
    }
    pins
}

// ---------------------------------------------------------------------------
// SolverConfig
// ---------------------------------------------------------------------------

/// Parameters of the bundled bounded minimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Maximum solver iterations (default: 200).
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Stop when an accepted step drops the cost by less than this
    /// (default: 1e-9).
    #[serde(default = "default_cost_tolerance")]
    pub cost_tolerance: f64,

    /// Stop when the finite-difference gradient norm falls below this
    /// (default: 1e-7).
    #[serde(default = "default_gradient_tolerance")]
    pub gradient_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            cost_tolerance: default_cost_tolerance(),
            gradient_tolerance: default_gradient_tolerance(),
        }
    }
}

// ---------------------------------------------------------------------------
// OptimizationConfig
// ---------------------------------------------------------------------------

/// Configuration of one posture optimization engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationConfig {
    /// Cost-term weights (default: all 1).
    #[serde(default)]
    pub weights: CostWeights,

    /// Cartesian safety zone for the active chain's end-effector
    /// (default: unbounded).
    #[serde(default)]
    pub safety_zone: SafetyZone,

    /// Finite-difference perturbation size passed to the minimizer
    /// (default: 0.1).
    #[serde(default = "default_variation_step")]
    pub variation_step: f64,

    /// Bundled minimizer parameters.
    #[serde(default)]
    pub solver: SolverConfig,

    /// Joints pinned before every optimization. Merge rule: caller-supplied
    /// fixed joints override entries of this table.
    #[serde(default = "default_pins")]
    pub default_pins: HashMap<String, f64>,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            weights: CostWeights::default(),
            safety_zone: SafetyZone::default(),
            variation_step: default_variation_step(),
            solver: SolverConfig::default(),
            default_pins: default_pins(),
        }
    }
}

impl OptimizationConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (term, value) in [
            ("reba", self.weights.reba),
            ("safety", self.weights.safety),
            ("fixed_frame", self.weights.fixed_frame),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeWeight { term, value });
            }
        }
        if !(self.variation_step > 0.0) {
            return Err(ConfigError::InvalidStep(self.variation_step));
        }
        if self.solver.max_iterations == 0 {
            return Err(ConfigError::InvalidSolver {
                field: "max_iterations",
                message: "must be > 0".into(),
            });
        }
        if !(self.solver.cost_tolerance > 0.0) {
            return Err(ConfigError::InvalidSolver {
                field: "cost_tolerance",
                message: format!("must be > 0, got {}", self.solver.cost_tolerance),
            });
        }
        if !(self.solver.gradient_tolerance > 0.0) {
            return Err(ConfigError::InvalidSolver {
                field: "gradient_tolerance",
                message: format!("must be > 0, got {}", self.solver.gradient_tolerance),
            });
        }
        Ok(())
    }

    /// Default pins merged with caller-supplied fixed joints. Caller wins.
    pub fn merged_pins(&self, fixed_joints: &HashMap<String, f64>) -> HashMap<String, f64> {
        let mut pins = self.default_pins.clone();
        pins.extend(fixed_joints.iter().map(|(k, &v)| (k.clone(), v)));
        pins
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

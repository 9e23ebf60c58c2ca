//! Thresholds and limits for path extension.

use crate::obstacles::DEFAULT_CLEARANCE;
use crate::{PlannerError, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtenderConfig {
    /// Tip-to-goal pose distance at which extension counts as converged.
    /// Default: 0.1
    pub dist_thresh: f64,

    /// Minimum separation between an accepted node's end-effector position
    /// and any obstacle of its wave.
    /// Default: 0.05
    pub min_clearance: f64,

    /// Scale applied to every Jacobian-transpose step, `q + gain * J^T * dx`.
    /// Arms with long links overshoot the goal at 1.0.
    /// Default: 1.0
    pub step_gain: f64,

    /// Margin added on both sides of the tip-to-goal box when sampling.
    /// Default: 0.1
    pub random_offset: f64,

    /// Minimum separation for the sampled point itself. When unset the
    /// randomized extender uses `dist_thresh`.
    pub sample_clearance: Option<f64>,

    /// Step cap for the Jacobian-transpose walk.
    /// Default: 1000
    pub max_steps: usize,

    /// Sampling attempt cap for the randomized extender.
    /// Default: 1000
    pub max_attempts: usize,

    /// Nodes the randomized extender accepts before handing control back.
    /// Default: 1
    pub max_random_nodes: usize,
}

impl Default for ExtenderConfig {
    fn default() -> Self {
        Self {
            dist_thresh: 0.1,
            min_clearance: DEFAULT_CLEARANCE,
            step_gain: 1.0,
            random_offset: 0.1,
            sample_clearance: None,
            max_steps: 1000,
            max_attempts: 1000,
            max_random_nodes: 1,
        }
    }
}

impl ExtenderConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("dist_thresh", Some(self.dist_thresh)),
            ("min_clearance", Some(self.min_clearance)),
            ("random_offset", Some(self.random_offset)),
            ("sample_clearance", self.sample_clearance),
        ];
        for (name, value) in thresholds {
            if let Some(value) = value
                && (!value.is_finite() || value < 0.0)
            {
                return Err(PlannerError::Config(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }

        if !self.step_gain.is_finite() || self.step_gain <= 0.0 {
            return Err(PlannerError::Config(format!(
                "step_gain must be a finite positive number, got {}",
                self.step_gain
            )));
        }

        let limits = [
            ("max_steps", self.max_steps),
            ("max_attempts", self.max_attempts),
            ("max_random_nodes", self.max_random_nodes),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(PlannerError::Config(format!("{name} must be at least 1")));
            }
        }
        Ok(())
    }

    /// Clearance applied to sampled points.
    pub fn effective_sample_clearance(&self) -> f64 {
        self.sample_clearance.unwrap_or(self.dist_thresh)
    }
}

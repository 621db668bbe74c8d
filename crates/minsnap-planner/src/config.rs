//! Planner configuration
//!
//! Configuration parameters for turning waypoint paths into trajectories
//! and sampling them for downstream consumers. Loaded from YAML.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Main planner configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Waypoint timing
    pub timing: TimingConfig,
    /// Downstream sampling
    pub sampling: SamplingConfig,
    /// Solve options
    pub solve: SolveConfig,
}

impl PlannerConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: Self = serde_yaml::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timing.validate()?;
        self.sampling.validate()
    }
}

/// Timing assigned to untimed path states
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Time between consecutive path states [s]
    pub timestep: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            timestep: 2.0,
        }
    }
}

impl TimingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "timing.timestep must be positive, got {}",
                self.timestep
            )));
        }
        Ok(())
    }
}

/// Fixed-rate sampling for publishers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Sampling rate [Hz]
    pub rate_hz: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self { rate_hz: 50.0 }
    }
}

impl SamplingConfig {
    /// Sampling period [s]
    pub fn period(&self) -> f64 {
        1.0 / self.rate_hz
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.rate_hz.is_finite() && self.rate_hz > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "sampling.rate_hz must be positive, got {}",
                self.rate_hz
            )));
        }
        Ok(())
    }
}

/// Solver execution options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveConfig {
    /// Solve the four channels on separate threads
    pub parallel_axes: bool,
}

//! Configuration loading for SetuPlan
//!
//! Roadmap registrations and planner settings are read once at startup
//! from a TOML file; nothing is reloaded during concurrent planning.

use crate::error::{PlanError, Result};
use crate::types::RoadmapSpec;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Clone, Debug, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub planner: PlannerSettings,

    /// Roadmaps to register at startup
    #[serde(default)]
    pub roadmaps: Vec<RoadmapEntry>,
}

/// Planner settings
#[derive(Clone, Debug, Deserialize)]
pub struct PlannerSettings {
    /// Timeout handed to the engine when a request does not set one (seconds)
    #[serde(default = "default_timeout_secs")]
    pub default_timeout_secs: f32,

    /// Enable verbose engine diagnostics
    #[serde(default)]
    pub debug: bool,
}

/// One roadmap registration
#[derive(Clone, Debug, Deserialize)]
pub struct RoadmapEntry {
    /// Logical roadmap name (unique)
    pub name: String,

    /// Roadmap graph file
    pub graph_file: String,

    /// Voxel region file
    pub occupancy_file: String,

    /// Tool transform file
    pub transform_file: String,
}

fn default_timeout_secs() -> f32 {
    5.0
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            default_timeout_secs: default_timeout_secs(),
            debug: false,
        }
    }
}

impl PlannerSettings {
    /// Reject values TOML accepts but a timeout cannot hold;
    /// `Duration::from_secs_f32` panics on anything negative or
    /// non-finite, so this runs before settings are handed out
    pub fn validate(&self) -> Result<()> {
        if !self.default_timeout_secs.is_finite() || self.default_timeout_secs < 0.0 {
            return Err(PlanError::Config(format!(
                "default_timeout_secs must be finite and non-negative, got {}",
                self.default_timeout_secs
            )));
        }
        Ok(())
    }

    /// Default solve timeout as a duration
    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs_f32(self.default_timeout_secs)
    }
}

impl RoadmapEntry {
    /// Convert into the registry's immutable specification form
    pub fn to_spec(&self) -> RoadmapSpec {
        RoadmapSpec {
            name: self.name.clone(),
            graph_file: self.graph_file.clone(),
            occupancy_file: self.occupancy_file.clone(),
            transform_file: self.transform_file.clone(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: PlannerConfig = toml::from_str(&content)?;
        config.planner.validate()?;
        Ok(config)
    }
}

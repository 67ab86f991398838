//! Physics tuning
//!
//! Loaded from an optional JSON file; every missing field falls back to the
//! defaults in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigurationError, positive};

/// Physics settings for one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Friction deceleration magnitude (units/s²), applied against motion
    pub deceleration: f64,
    /// Cap on the launch speed handed in by the input layer
    pub max_launch_speed: f64,
    /// Fixed simulation timestep (seconds)
    pub sim_dt: f64,
    /// Maximum ticks per rendered frame
    pub max_substeps: u32,
    /// Table half extent along world X
    pub table_half_width: f64,
    /// Table half extent along world Z
    pub table_half_depth: f64,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            deceleration: FRICTION_DECELERATION,
            max_launch_speed: MAX_LAUNCH_SPEED,
            sim_dt: SIM_DT,
            max_substeps: MAX_SUBSTEPS,
            table_half_width: TABLE_HALF_WIDTH,
            table_half_depth: TABLE_HALF_DEPTH,
        }
    }
}

impl PhysicsSettings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file, or use defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                let settings = Self::from_json(&json)?;
                log::info!("Loaded physics settings from {}", path.display());
                Ok(settings)
            }
            None => {
                log::info!("Using default physics settings");
                Ok(Self::default())
            }
        }
    }

    /// Reject zero, negative or non-finite tuning.
    ///
    /// Deceleration may be zero (frictionless table); everything else must be
    /// strictly positive.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.deceleration.is_finite() || self.deceleration < 0.0 {
            return Err(ConfigurationError::InvalidSetting {
                name: "deceleration",
                value: self.deceleration,
            });
        }
        positive("max_launch_speed", self.max_launch_speed)?;
        positive("sim_dt", self.sim_dt)?;
        positive("max_substeps", f64::from(self.max_substeps))?;
        positive("table_half_width", self.table_half_width)?;
        positive("table_half_depth", self.table_half_depth)?;
        Ok(())
    }

    /// Frictionless variant, handy for exact collision scenarios
    pub fn frictionless() -> Self {
        Self {
            deceleration: 0.0,
            ..Self::default()
        }
    }
}

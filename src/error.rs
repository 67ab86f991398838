//! Construction-time errors
//!
//! Nothing in the tick path fails; bad shapes and bad tuning are rejected
//! before an entity or world enters the simulation.

use thiserror::Error;

/// Invalid static configuration of a shape, entity or settings block
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("disc radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
    #[error("rectangle half extents must be positive and finite, got {half_width} x {half_depth}")]
    InvalidHalfExtents { half_width: f64, half_depth: f64 },
    #[error("rectangle axis must be a finite non-zero vector, got ({x}, {z})")]
    InvalidAxis { x: f64, z: f64 },
    #[error("position must be finite, got ({x}, {z})")]
    InvalidPosition { x: f64, z: f64 },
    #[error("setting `{name}` must be positive and finite, got {value}")]
    InvalidSetting { name: &'static str, value: f64 },
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Reject anything that is not strictly positive and finite
pub(crate) fn positive(name: &'static str, value: f64) -> Result<f64, ConfigurationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigurationError::InvalidSetting { name, value })
    }
}

//! Knockout Physics - disc collision core for a turn-based chip knockout game
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (collider geometry, detection, contact
//!   tracking, resolution, integration)
//! - `settings`: Data-driven physics tuning
//! - `error`: Construction-time configuration errors

pub mod error;
pub mod settings;
pub mod sim;

pub use error::ConfigurationError;
pub use settings::PhysicsSettings;

use glam::DVec2;

/// Physics configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz, independent of render rate)
    pub const SIM_DT: f64 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the stepper will try to catch up on (seconds)
    pub const MAX_FRAME_DT: f64 = 0.1;

    /// Friction deceleration magnitude (units/s²)
    pub const FRICTION_DECELERATION: f64 = 4.0;
    /// Speed below which a decaying chip is considered at rest
    pub const REST_SPEED: f64 = 1e-9;

    /// Launch speed cap (drag length in the aiming UI)
    pub const MAX_LAUNCH_SPEED: f64 = 4.0;

    /// Chip defaults
    pub const CHIP_RADIUS: f64 = 0.5;
    pub const CHIP_HALF_HEIGHT: f64 = 0.25;

    /// Table surface half extents (world X, world Z)
    pub const TABLE_HALF_WIDTH: f64 = 3.0;
    pub const TABLE_HALF_DEPTH: f64 = 5.0;

    /// Default oblique wall: half width sqrt(5)/2, half depth 0.1
    pub const WALL_HALF_WIDTH: f64 = 1.118_033_988_749_895;
    pub const WALL_HALF_DEPTH: f64 = 0.1;
}

/// Unit vector for an in-plane rotation of `angle` radians about the up axis.
///
/// Rotating world X by `angle` about +Y lands on `(cos, -sin)` in (x, z).
#[inline]
pub fn axis_from_angle(angle: f64) -> DVec2 {
    DVec2::new(angle.cos(), -angle.sin())
}

/// Left-hand perpendicular in the (x, z) plane
#[inline]
pub fn perpendicular(v: DVec2) -> DVec2 {
    DVec2::new(-v.y, v.x)
}

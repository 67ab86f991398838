//! Table entities: chips (movable discs) and walls (static rectangles)
//!
//! Entities own position and velocity. Colliders only read them through
//! [`EntityInfo`] and write velocities back through the world.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigurationError;
use crate::axis_from_angle;

/// Stable identity of an entity on the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityId {
    Chip(u32),
    Wall(u32),
}

/// Shape parameters reported alongside an entity's position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Extent {
    Disc {
        radius: f64,
    },
    Rect {
        half_width: f64,
        half_depth: f64,
        axis: DVec2,
    },
}

/// Position query result: world position plus shape parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityInfo {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub extent: Extent,
}

impl EntityInfo {
    /// Projection onto the table plane
    #[inline]
    pub fn planar(&self) -> DVec2 {
        DVec2::new(self.x, self.z)
    }
}

/// A chip (puck)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chip {
    pub id: u32,
    /// Centre in world space; y is half the chip height above the table
    pub pos: DVec3,
    pub radius: f64,
    /// `None` is a stationary chip
    pub vel: Option<DVec2>,
    /// Cleared once the chip has been knocked off the table
    pub in_play: bool,
}

impl Chip {
    pub fn new(id: u32, x: f64, z: f64, radius: f64) -> Result<Self, ConfigurationError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConfigurationError::InvalidRadius(radius));
        }
        if !(x.is_finite() && z.is_finite()) {
            return Err(ConfigurationError::InvalidPosition { x, z });
        }
        Ok(Self {
            id,
            pos: DVec3::new(x, CHIP_HALF_HEIGHT, z),
            radius,
            vel: None,
            in_play: true,
        })
    }

    pub fn entity_id(&self) -> EntityId {
        EntityId::Chip(self.id)
    }

    pub fn info(&self) -> EntityInfo {
        EntityInfo {
            x: self.pos.x,
            y: self.pos.y,
            z: self.pos.z,
            extent: Extent::Disc {
                radius: self.radius,
            },
        }
    }

    /// Move the chip to new planar coordinates, keeping its height
    pub fn place(&mut self, x: f64, z: f64) {
        self.pos.x = x;
        self.pos.z = z;
    }

    #[inline]
    pub fn planar_pos(&self) -> DVec2 {
        DVec2::new(self.pos.x, self.pos.z)
    }

    /// Velocity with `None` read as zero
    #[inline]
    pub fn velocity(&self) -> DVec2 {
        self.vel.unwrap_or(DVec2::ZERO)
    }

    pub fn set_velocity(&mut self, vel: DVec2) {
        self.vel = Some(vel);
    }

    pub fn is_moving(&self) -> bool {
        self.in_play && self.velocity() != DVec2::ZERO
    }
}

/// A static wall or obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub id: u32,
    pub pos: DVec3,
    pub half_width: f64,
    pub half_depth: f64,
    /// In-plane rotation about the up axis (radians)
    pub angle: f64,
}

impl Wall {
    pub fn new(
        id: u32,
        x: f64,
        z: f64,
        angle: f64,
        half_width: f64,
        half_depth: f64,
    ) -> Result<Self, ConfigurationError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(half_width) || !valid(half_depth) {
            return Err(ConfigurationError::InvalidHalfExtents {
                half_width,
                half_depth,
            });
        }
        if !(x.is_finite() && z.is_finite()) {
            return Err(ConfigurationError::InvalidPosition { x, z });
        }
        if !angle.is_finite() {
            return Err(ConfigurationError::InvalidSetting {
                name: "wall angle",
                value: angle,
            });
        }
        Ok(Self {
            id,
            pos: DVec3::new(x, CHIP_HALF_HEIGHT, z),
            half_width,
            half_depth,
            angle,
        })
    }

    pub fn entity_id(&self) -> EntityId {
        EntityId::Wall(self.id)
    }

    #[inline]
    pub fn axis(&self) -> DVec2 {
        axis_from_angle(self.angle)
    }

    pub fn info(&self) -> EntityInfo {
        EntityInfo {
            x: self.pos.x,
            y: self.pos.y,
            z: self.pos.z,
            extent: Extent::Rect {
                half_width: self.half_width,
                half_depth: self.half_depth,
                axis: self.axis(),
            },
        }
    }
}

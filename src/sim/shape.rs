//! Planar collider footprints
//!
//! Everything lives on the table plane: a `DVec2` holds world `(x, z)`.
//! Chips are discs; walls and obstacles are rectangles with their own
//! in-plane rotation.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::perpendicular;

/// Circular footprint of a chip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Disc {
    pub center: DVec2,
    /// Always > 0
    pub radius: f64,
}

impl Disc {
    pub fn new(center: DVec2, radius: f64) -> Result<Self, ConfigurationError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConfigurationError::InvalidRadius(radius));
        }
        Ok(Self { center, radius })
    }
}

/// Rectangle footprint with arbitrary in-plane rotation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedRectangle {
    pub center: DVec2,
    /// Half extent along `axis`
    pub half_width: f64,
    /// Half extent along the perpendicular of `axis`
    pub half_depth: f64,
    /// Unit vector of the rectangle's own width direction
    pub axis: DVec2,
}

impl OrientedRectangle {
    pub fn new(
        center: DVec2,
        half_width: f64,
        half_depth: f64,
        axis: DVec2,
    ) -> Result<Self, ConfigurationError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(half_width) || !valid(half_depth) {
            return Err(ConfigurationError::InvalidHalfExtents {
                half_width,
                half_depth,
            });
        }
        let axis = match axis.try_normalize() {
            Some(axis) => axis,
            None => return Err(ConfigurationError::InvalidAxis { x: axis.x, z: axis.y }),
        };
        Ok(Self {
            center,
            half_width,
            half_depth,
            axis,
        })
    }

    /// World-aligned rectangle (axis = +X)
    pub fn axis_aligned(
        center: DVec2,
        half_width: f64,
        half_depth: f64,
    ) -> Result<Self, ConfigurationError> {
        Self::new(center, half_width, half_depth, DVec2::X)
    }

    /// Unit vector along the depth extent
    #[inline]
    pub fn depth_axis(&self) -> DVec2 {
        perpendicular(self.axis)
    }

    /// Express a world point in the rectangle's own frame
    #[inline]
    pub fn to_local(&self, p: DVec2) -> DVec2 {
        let d = p - self.center;
        DVec2::new(d.dot(self.axis), d.dot(self.depth_axis()))
    }

    /// Map a local-frame point back to world space
    #[inline]
    pub fn to_world(&self, local: DVec2) -> DVec2 {
        self.center + self.axis * local.x + self.depth_axis() * local.y
    }

    /// Nearest point of the (solid) rectangle to `p`.
    ///
    /// Clamps in the rectangle's frame, so rotation is honoured.
    pub fn closest_point(&self, p: DVec2) -> DVec2 {
        let local = self.to_local(p);
        let clamped = DVec2::new(
            local.x.clamp(-self.half_width, self.half_width),
            local.y.clamp(-self.half_depth, self.half_depth),
        );
        self.to_world(clamped)
    }

    /// Boundary-inclusive point containment
    pub fn contains_point(&self, p: DVec2) -> bool {
        let local = self.to_local(p);
        local.x.abs() <= self.half_width && local.y.abs() <= self.half_depth
    }
}

/// Closed set of collider shapes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Disc(Disc),
    Rect(OrientedRectangle),
}

impl Shape {
    pub fn center(&self) -> DVec2 {
        match self {
            Shape::Disc(d) => d.center,
            Shape::Rect(r) => r.center,
        }
    }

    pub fn as_disc(&self) -> Option<&Disc> {
        match self {
            Shape::Disc(d) => Some(d),
            Shape::Rect(_) => None,
        }
    }

    pub fn as_rect(&self) -> Option<&OrientedRectangle> {
        match self {
            Shape::Rect(r) => Some(r),
            Shape::Disc(_) => None,
        }
    }
}

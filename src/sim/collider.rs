//! Colliders: per-entity geometry snapshots
//!
//! A collider is built once with its entity and refreshed every tick from the
//! entity's live pose. It never owns position or velocity.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityInfo, Extent};
use super::shape::{Disc, OrientedRectangle, Shape};
use crate::error::ConfigurationError;

/// Index of a collider in the world's collider table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColliderId(pub u32);

/// Geometry snapshot tagged with its owning entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collider {
    pub id: ColliderId,
    /// Back-reference to the owner (lookup key, not ownership)
    pub owner: EntityId,
    pub shape: Shape,
    /// Inactive colliders are skipped by every query
    pub active: bool,
}

impl Collider {
    /// Build a collider from the owner's current pose
    pub fn new(id: ColliderId, owner: EntityId, info: &EntityInfo) -> Result<Self, ConfigurationError> {
        let center = info.planar();
        let shape = match info.extent {
            Extent::Disc { radius } => Shape::Disc(Disc::new(center, radius)?),
            Extent::Rect {
                half_width,
                half_depth,
                axis,
            } => Shape::Rect(OrientedRectangle::new(center, half_width, half_depth, axis)?),
        };
        Ok(Self {
            id,
            owner,
            shape,
            active: true,
        })
    }

    /// Overwrite the geometry from the owner's current pose.
    ///
    /// The shape kind is fixed at construction; a mismatched extent is ignored.
    pub fn refresh(&mut self, info: &EntityInfo) {
        let center = info.planar();
        match (&mut self.shape, info.extent) {
            (Shape::Disc(disc), Extent::Disc { radius }) => {
                disc.center = center;
                disc.radius = radius;
            }
            (
                Shape::Rect(rect),
                Extent::Rect {
                    half_width,
                    half_depth,
                    axis,
                },
            ) => {
                rect.center = center;
                rect.half_width = half_width;
                rect.half_depth = half_depth;
                rect.axis = axis.try_normalize().unwrap_or(DVec2::X);
            }
            _ => log::warn!("collider {:?} refreshed with mismatched extent", self.id),
        }
    }

    pub fn is_disc(&self) -> bool {
        matches!(self.shape, Shape::Disc(_))
    }
}

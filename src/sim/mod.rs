//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Stable iteration order (by entity ID)
//! - No rendering, input or turn bookkeeping

pub mod collider;
pub mod collision;
pub mod contact;
pub mod entity;
pub mod integrate;
pub mod resolve;
pub mod shape;
pub mod tick;
pub mod world;

pub use collider::{Collider, ColliderId};
pub use collision::{
    CollisionResult, disc_disc, disc_rectangle, disc_rectangle_contact, overlaps, rect_rect,
};
pub use contact::ContactTracker;
pub use entity::{Chip, EntityId, EntityInfo, Extent, Wall};
pub use integrate::{advance_position, apply_friction, integrate};
pub use resolve::{elastic_exchange, reflect_if_approaching, reflect_velocity};
pub use shape::{Disc, OrientedRectangle, Shape};
pub use tick::{FixedStepper, PhysicsEvent, TickInput, tick};
pub use world::World;

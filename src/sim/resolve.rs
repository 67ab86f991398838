//! Impulse resolution
//!
//! Velocity-only updates: equal-mass elastic exchange between chips and
//! mirror reflection off walls. Positions are never touched here.
//! Degenerate geometry (coincident centres, zero-length normals) yields
//! `None` so the caller skips the pair for this tick.

use glam::DVec2;

/// Equal-mass, frictionless, perfectly elastic exchange along the line of
/// centres.
///
/// `p1`/`p2` are the planar centres, `v1`/`v2` the velocities. Returns the
/// new velocities, or `None` when the pair is already separating or the
/// centres coincide.
pub fn elastic_exchange(p1: DVec2, v1: DVec2, p2: DVec2, v2: DVec2) -> Option<(DVec2, DVec2)> {
    let normal = (p1 - p2).try_normalize()?;
    let closing_speed = (v1 - v2).dot(normal);
    if closing_speed >= 0.0 {
        return None;
    }
    Some((v1 - closing_speed * normal, v2 + closing_speed * normal))
}

/// Mirror reflection: `v - 2n(n·v)`.
///
/// Speed is preserved and only the component along `normal` flips. The
/// normal is re-normalized; a zero or non-finite normal yields `None`.
#[inline]
pub fn reflect_velocity(velocity: DVec2, normal: DVec2) -> Option<DVec2> {
    let n = normal.try_normalize()?;
    Some(velocity - 2.0 * velocity.dot(n) * n)
}

/// Reflect only if the body moves into the surface whose outward normal
/// (toward the body) is `normal`
pub fn reflect_if_approaching(velocity: DVec2, normal: DVec2) -> Option<DVec2> {
    let n = normal.try_normalize()?;
    if velocity.dot(n) >= 0.0 {
        return None;
    }
    reflect_velocity(velocity, n)
}

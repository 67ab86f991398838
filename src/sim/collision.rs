//! Narrow-phase collision detection
//!
//! Pure, boundary-inclusive predicates over the closed shape set. Touching
//! counts as colliding. The rectangle tests work in the rectangle's own frame,
//! so rotated walls are handled exactly rather than as world-aligned boxes.

use glam::DVec2;

use super::shape::{Disc, OrientedRectangle, Shape};

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Unit surface normal, pointing from the obstacle toward the disc centre
    pub normal: DVec2,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: DVec2::ZERO,
        }
    }
}

/// Two discs on the table plane overlap or touch
#[inline]
pub fn disc_disc(a: &Disc, b: &Disc) -> bool {
    a.center.distance(b.center) <= a.radius + b.radius
}

/// A disc overlaps or touches an oriented rectangle
#[inline]
pub fn disc_rectangle(disc: &Disc, rect: &OrientedRectangle) -> bool {
    let closest = rect.closest_point(disc.center);
    closest.distance(disc.center) <= disc.radius
}

/// Disc against oriented rectangle, with the contact normal used for
/// reflection.
///
/// When the disc centre is inside the rectangle the normal of the nearest
/// face is used instead of the (zero-length) centre offset.
pub fn disc_rectangle_contact(disc: &Disc, rect: &OrientedRectangle) -> CollisionResult {
    let closest = rect.closest_point(disc.center);
    let offset = disc.center - closest;
    let dist = offset.length();

    if dist > disc.radius {
        return CollisionResult::miss();
    }

    if let Some(normal) = offset.try_normalize() {
        return CollisionResult { hit: true, normal };
    }

    // Centre on or inside the rectangle: face out through the nearest side
    let local = rect.to_local(disc.center);
    let gap_width = rect.half_width - local.x.abs();
    let gap_depth = rect.half_depth - local.y.abs();
    let normal = if gap_depth <= gap_width {
        rect.depth_axis() * local.y.signum()
    } else {
        rect.axis * local.x.signum()
    };
    CollisionResult { hit: true, normal }
}

/// Two oriented rectangles overlap or touch (separating-axis test)
pub fn rect_rect(a: &OrientedRectangle, b: &OrientedRectangle) -> bool {
    let delta = b.center - a.center;
    let axes = [a.axis, a.depth_axis(), b.axis, b.depth_axis()];
    axes.iter().all(|&axis| {
        let reach_a = projected_reach(a, axis);
        let reach_b = projected_reach(b, axis);
        delta.dot(axis).abs() <= reach_a + reach_b
    })
}

/// Half length of a rectangle's shadow on `axis`
#[inline]
fn projected_reach(rect: &OrientedRectangle, axis: DVec2) -> f64 {
    rect.half_width * rect.axis.dot(axis).abs() + rect.half_depth * rect.depth_axis().dot(axis).abs()
}

/// Pairwise overlap over every shape combination
pub fn overlaps(a: &Shape, b: &Shape) -> bool {
    match (a, b) {
        (Shape::Disc(a), Shape::Disc(b)) => disc_disc(a, b),
        (Shape::Disc(disc), Shape::Rect(rect)) | (Shape::Rect(rect), Shape::Disc(disc)) => {
            disc_rectangle(disc, rect)
        }
        (Shape::Rect(a), Shape::Rect(b)) => rect_rect(a, b),
    }
}

/// Whether a disc's centre has left a surface (it falls off the table)
#[inline]
pub fn disc_off_surface(disc: &Disc, surface: &OrientedRectangle) -> bool {
    !surface.contains_point(disc.center)
}

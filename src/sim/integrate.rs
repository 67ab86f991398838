//! Position integration and friction decay

use glam::DVec2;

use crate::consts::REST_SPEED;

/// Explicit Euler step of a planar position
#[inline]
pub fn advance_position(position: DVec2, velocity: DVec2, dt: f64) -> DVec2 {
    position + velocity * dt
}

/// Apply constant-magnitude friction against the direction of motion.
///
/// `deceleration` is a magnitude (units/s²). Zero velocity stays zero. A step
/// that would overshoot past rest (the new velocity points against the old)
/// snaps to exactly zero instead of reversing; so does any leftover speed
/// below [`REST_SPEED`].
pub fn apply_friction(velocity: DVec2, deceleration: f64, dt: f64) -> DVec2 {
    let Some(direction) = velocity.try_normalize() else {
        return DVec2::ZERO;
    };
    let decayed = velocity - direction * (deceleration * dt);
    if velocity.dot(decayed) < 0.0 || decayed.length() <= REST_SPEED {
        DVec2::ZERO
    } else {
        decayed
    }
}

/// One integration step for a body: returns the new position and velocity.
///
/// Bodies with no velocity are left untouched.
pub fn integrate(
    position: DVec2,
    velocity: Option<DVec2>,
    deceleration: f64,
    dt: f64,
) -> (DVec2, Option<DVec2>) {
    match velocity {
        Some(vel) => (
            advance_position(position, vel, dt),
            Some(apply_friction(vel, deceleration, dt)),
        ),
        None => (position, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_position_step() {
        let p = advance_position(DVec2::new(1.0, 1.0), DVec2::new(2.0, -4.0), 0.5);
        assert_eq!(p, DVec2::new(2.0, -1.0));
    }

    #[test]
    fn test_zero_velocity_is_absorbing() {
        assert_eq!(apply_friction(DVec2::ZERO, 4.0, 0.01), DVec2::ZERO);
        let (p, v) = integrate(DVec2::new(1.0, 2.0), Some(DVec2::ZERO), 4.0, 0.01);
        assert_eq!(p, DVec2::new(1.0, 2.0));
        assert_eq!(v, Some(DVec2::ZERO));
    }

    #[test]
    fn test_no_velocity_is_untouched() {
        let (p, v) = integrate(DVec2::new(1.0, 2.0), None, 4.0, 0.01);
        assert_eq!(p, DVec2::new(1.0, 2.0));
        assert_eq!(v, None);
    }

    #[test]
    fn test_friction_decays_along_direction() {
        let v = apply_friction(DVec2::new(3.0, 4.0), 4.0, 0.25);
        // Speed 5 -> 4, direction unchanged
        assert!((v.length() - 4.0).abs() < 1e-12);
        assert!((v.normalize() - DVec2::new(0.6, 0.8)).length() < 1e-12);
    }

    #[test]
    fn test_overshoot_snaps_to_zero() {
        assert_eq!(apply_friction(DVec2::new(0.01, 0.0), 4.0, 0.01), DVec2::ZERO);
        assert_eq!(apply_friction(DVec2::new(0.0, -0.03), 4.0, 0.01), DVec2::ZERO);
    }

    #[test]
    fn test_one_second_of_friction_stops_chip() {
        let dt = 0.01;
        let mut pos = DVec2::ZERO;
        let mut vel = Some(DVec2::new(4.0, 0.0));
        for _ in 0..100 {
            (pos, vel) = integrate(pos, vel, 4.0, dt);
            let v = vel.unwrap();
            assert!(v.x >= 0.0, "x velocity reversed: {v}");
            assert_eq!(v.y, 0.0);
        }
        assert_eq!(vel, Some(DVec2::ZERO));
        // Distance travelled is close to v²/2a = 2
        assert!((pos.x - 2.0).abs() < 0.05);
    }

    #[test]
    fn test_sim_rate_friction_stops_chip() {
        let dt = crate::consts::SIM_DT;
        let mut vel = DVec2::new(4.0, 0.0);
        for _ in 0..120 {
            vel = apply_friction(vel, 4.0, dt);
            assert!(vel.x >= 0.0);
        }
        assert_eq!(vel, DVec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_friction_never_reverses_or_grows(
            vx in -10.0f64..10.0, vz in -10.0f64..10.0,
            decel in 0.0f64..20.0, dt in 0.0001f64..0.1,
        ) {
            let v = DVec2::new(vx, vz);
            let next = apply_friction(v, decel, dt);
            prop_assert!(next.dot(v) >= 0.0);
            prop_assert!(next.length() <= v.length() + 1e-12);
            prop_assert!(next.is_finite());
        }
    }
}

//! Simulation tick
//!
//! One tick runs refresh → detect → track → resolve → integrate over every
//! active collider, synchronously. Pairs are resolved one after another, so a
//! velocity updated by an earlier pair feeds the next pair in the same tick.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collision::{disc_disc, disc_off_surface, disc_rectangle, disc_rectangle_contact};
use super::entity::EntityId;
use super::integrate::integrate;
use super::resolve::{elastic_exchange, reflect_if_approaching};
use super::shape::Disc;
use super::world::World;
use crate::consts::MAX_FRAME_DT;

/// Per-tick input from the turn layer
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Starting velocities for chips `(chip id, velocity)`, applied before
    /// anything else this tick
    pub launches: Vec<(u32, DVec2)>,
}

/// Something the surrounding game may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PhysicsEvent {
    ChipsCollided { a: u32, b: u32 },
    WallHit { chip: u32, wall: u32 },
    KnockedOut { chip: u32 },
    /// Every chip came to rest this tick
    Settled,
}

/// Advance the world by one timestep.
///
/// A `dt` that is not finite and positive runs nothing, not even launches.
pub fn tick(world: &mut World, input: &TickInput, dt: f64) -> Vec<PhysicsEvent> {
    if !(dt.is_finite() && dt > 0.0) {
        log::warn!("skipping tick with invalid dt {dt}");
        return Vec::new();
    }

    let mut events = Vec::new();
    world.time_ticks += 1;

    for &(id, velocity) in &input.launches {
        if world.launch(id, velocity).is_none() {
            log::warn!("launch for unknown or retired chip {id}");
        }
    }

    world.refresh_colliders();
    resolve_chip_pairs(world, &mut events);
    resolve_wall_contacts(world, &mut events);
    integrate_chips(world, dt);
    knock_out_fallen(world, &mut events);

    let moving = world.any_moving();
    if world.was_moving && !moving {
        log::info!("all chips at rest after {} ticks", world.time_ticks);
        events.push(PhysicsEvent::Settled);
    }
    world.was_moving = moving;

    events
}

/// Chip-chip pairs: resolved every tick they overlap, gated only by the
/// closing-speed check
fn resolve_chip_pairs(world: &mut World, events: &mut Vec<PhysicsEvent>) {
    let active: Vec<usize> = (0..world.chips.len())
        .filter(|&i| world.chips[i].in_play)
        .collect();

    for (n, &i) in active.iter().enumerate() {
        for &j in &active[n + 1..] {
            let (Some(a), Some(b)) = (
                disc_of(world, EntityId::Chip(world.chips[i].id)),
                disc_of(world, EntityId::Chip(world.chips[j].id)),
            ) else {
                continue;
            };
            if !disc_disc(&a, &b) {
                continue;
            }

            let (ci, cj) = (&world.chips[i], &world.chips[j]);
            match elastic_exchange(a.center, ci.velocity(), b.center, cj.velocity()) {
                Some((vi, vj)) => {
                    let (id_i, id_j) = (ci.id, cj.id);
                    world.chips[i].set_velocity(vi);
                    world.chips[j].set_velocity(vj);
                    log::debug!("chips {id_i} and {id_j} collided");
                    events.push(PhysicsEvent::ChipsCollided { a: id_i, b: id_j });
                }
                None if a.center == b.center => {
                    log::debug!("chips {} and {} share a centre, skipping", ci.id, cj.id);
                }
                None => {}
            }
        }
    }
}

/// Chip-wall pairs: reflected only on the tick contact begins
fn resolve_wall_contacts(world: &mut World, events: &mut Vec<PhysicsEvent>) {
    for i in 0..world.chips.len() {
        if !world.chips[i].in_play {
            continue;
        }
        let chip_id = world.chips[i].id;
        let Some(chip_cid) = world.collider_id(EntityId::Chip(chip_id)) else {
            continue;
        };
        let Some(disc) = disc_of(world, EntityId::Chip(chip_id)) else {
            continue;
        };

        for w in 0..world.walls.len() {
            let wall_id = world.walls[w].id;
            let Some(wall_collider) = world.collider(EntityId::Wall(wall_id)) else {
                continue;
            };
            let (wall_cid, Some(&rect)) = (wall_collider.id, wall_collider.shape.as_rect()) else {
                continue;
            };

            if !disc_rectangle(&disc, &rect) {
                world.contacts.unregister(chip_cid, wall_cid);
                continue;
            }
            if !world.contacts.register(chip_cid, wall_cid) {
                continue;
            }

            let contact = disc_rectangle_contact(&disc, &rect);
            let chip = &mut world.chips[i];
            match reflect_if_approaching(chip.velocity(), contact.normal) {
                Some(reflected) => {
                    chip.set_velocity(reflected);
                    log::debug!("chip {chip_id} bounced off wall {wall_id}");
                    events.push(PhysicsEvent::WallHit {
                        chip: chip_id,
                        wall: wall_id,
                    });
                }
                None => log::trace!("chip {chip_id} touched wall {wall_id} without approaching"),
            }
        }
    }
}

fn integrate_chips(world: &mut World, dt: f64) {
    let deceleration = world.settings.deceleration;
    for chip in world.chips.iter_mut().filter(|c| c.in_play) {
        let (pos, vel) = integrate(chip.planar_pos(), chip.vel, deceleration, dt);
        chip.place(pos.x, pos.y);
        chip.vel = vel;
    }
}

fn knock_out_fallen(world: &mut World, events: &mut Vec<PhysicsEvent>) {
    let surface = world.surface;
    let fallen: Vec<u32> = world
        .chips_in_play()
        .filter(|c| {
            let disc = Disc {
                center: c.planar_pos(),
                radius: c.radius,
            };
            disc_off_surface(&disc, &surface)
        })
        .map(|c| c.id)
        .collect();

    for id in fallen {
        if world.knock_out(id) {
            events.push(PhysicsEvent::KnockedOut { chip: id });
        }
    }
}

/// Active disc geometry of an entity, as last refreshed
fn disc_of(world: &World, owner: EntityId) -> Option<Disc> {
    world
        .collider(owner)
        .filter(|c| c.active)
        .and_then(|c| c.shape.as_disc().copied())
}

/// Fixed-timestep driver decoupling the physics rate from the frame rate
#[derive(Debug, Clone, Default)]
pub struct FixedStepper {
    accumulator: f64,
}

impl FixedStepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run as many fixed ticks as `frame_dt` covers, up to the substep cap.
    ///
    /// `input` is applied on the first tick only. Time beyond the cap is
    /// dropped rather than carried into the next frame.
    pub fn advance(&mut self, world: &mut World, input: &TickInput, frame_dt: f64) -> Vec<PhysicsEvent> {
        let sim_dt = world.settings.sim_dt;
        let max_substeps = world.settings.max_substeps;
        if frame_dt.is_finite() {
            self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT.max(sim_dt));
        }

        let mut events = Vec::new();
        let mut pending = Some(input);
        let mut substeps = 0;
        while self.accumulator >= sim_dt && substeps < max_substeps {
            let step_input = pending.take();
            let empty = TickInput::default();
            events.extend(tick(world, step_input.unwrap_or(&empty), sim_dt));
            self.accumulator -= sim_dt;
            substeps += 1;
        }

        if self.accumulator >= sim_dt {
            log::warn!(
                "physics fell behind, dropping {:.4}s after {substeps} substeps",
                self.accumulator
            );
            self.accumulator = 0.0;
        }

        // Launches must not be lost when the frame was too short to tick
        if let Some(input) = pending.filter(|i| !i.launches.is_empty()) {
            for &(id, velocity) in &input.launches {
                world.launch(id, velocity);
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::PhysicsSettings;

    fn frictionless() -> World {
        World::new(PhysicsSettings::frictionless()).unwrap()
    }

    #[test]
    fn test_head_on_first_tick() {
        let mut world = frictionless();
        let a = world.spawn_chip(0.0, 0.0, 0.5).unwrap();
        let b = world.spawn_chip(0.9, 0.0, 0.5).unwrap();
        let input = TickInput {
            launches: vec![(a, DVec2::new(1.0, 0.0)), (b, DVec2::new(-1.0, 0.0))],
        };

        let events = tick(&mut world, &input, SIM_DT);
        assert!(events.contains(&PhysicsEvent::ChipsCollided { a, b }));
        assert_eq!(world.chip(a).unwrap().velocity(), DVec2::new(-1.0, 0.0));
        assert_eq!(world.chip(b).unwrap().velocity(), DVec2::new(1.0, 0.0));
    }

    #[test]
    fn test_shared_centre_does_not_block_other_pairs() {
        let mut world = frictionless();
        let a = world.spawn_chip(0.0, 0.0, 0.5).unwrap();
        let b = world.spawn_chip(0.0, 0.0, 0.5).unwrap();
        let c = world.spawn_chip(0.0, 2.0, 0.5).unwrap();
        let d = world.spawn_chip(0.0, 2.9, 0.5).unwrap();
        let input = TickInput {
            launches: vec![
                (a, DVec2::new(1.0, 0.0)),
                (b, DVec2::new(-1.0, 0.0)),
                (c, DVec2::new(0.0, 1.0)),
                (d, DVec2::new(0.0, -1.0)),
            ],
        };

        let events = tick(&mut world, &input, SIM_DT);
        assert_eq!(events, vec![PhysicsEvent::ChipsCollided { a: c, b: d }]);
        assert_eq!(world.chip(a).unwrap().velocity(), DVec2::new(1.0, 0.0));
        assert_eq!(world.chip(b).unwrap().velocity(), DVec2::new(-1.0, 0.0));
        assert!((world.chip(c).unwrap().velocity() - DVec2::new(0.0, -1.0)).length() < 1e-12);
        assert!((world.chip(d).unwrap().velocity() - DVec2::new(0.0, 1.0)).length() < 1e-12);
        for chip in &world.chips {
            assert!(chip.velocity().is_finite());
            assert!(chip.planar_pos().is_finite());
        }
    }

    #[test]
    fn test_invalid_dt_is_skipped() {
        for dt in [-0.5, 0.0, f64::NAN, f64::INFINITY] {
            let mut world = World::new(PhysicsSettings::default()).unwrap();
            let chip = world.spawn_chip(0.0, 0.0, CHIP_RADIUS).unwrap();
            world.launch(chip, DVec2::new(1.0, 0.0));

            assert!(tick(&mut world, &TickInput::default(), dt).is_empty());
            let c = world.chip(chip).unwrap();
            assert_eq!(c.velocity(), DVec2::new(1.0, 0.0));
            assert_eq!(c.planar_pos(), DVec2::ZERO);
            assert!(c.in_play);
            assert_eq!(world.time_ticks, 0);
        }
    }

    #[test]
    fn test_overlapping_separating_pair_not_resolved_again() {
        let mut world = frictionless();
        let a = world.spawn_chip(0.0, 0.0, 0.5).unwrap();
        let b = world.spawn_chip(0.9, 0.0, 0.5).unwrap();
        let input = TickInput {
            launches: vec![(a, DVec2::new(-1.0, 0.0)), (b, DVec2::new(1.0, 0.0))],
        };
        let events = tick(&mut world, &input, SIM_DT);
        assert!(events.is_empty());
        assert_eq!(world.chip(a).unwrap().velocity(), DVec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_wall_bounce_is_onset_gated() {
        let mut world = frictionless();
        let chip = world.spawn_chip(0.0, 0.0, 0.5).unwrap();
        // Thin wall just to the right, its face normal along world X
        let wall = world
            .spawn_wall(0.54, 0.0, std::f64::consts::FRAC_PI_2, 1.0, 0.05)
            .unwrap();
        let input = TickInput {
            launches: vec![(chip, DVec2::new(1.0, 0.0))],
        };

        let events = tick(&mut world, &input, SIM_DT);
        assert_eq!(events, vec![PhysicsEvent::WallHit { chip, wall }]);
        let v = world.chip(chip).unwrap().velocity();
        assert!((v - DVec2::new(-1.0, 0.0)).length() < 1e-12);

        // Still overlapping next tick: no second reflection
        let events = tick(&mut world, &TickInput::default(), SIM_DT);
        assert!(events.is_empty());
        let v = world.chip(chip).unwrap().velocity();
        assert!((v - DVec2::new(-1.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_resting_contact_never_reflects() {
        let mut world = frictionless();
        let chip = world.spawn_chip(0.0, 0.0, 0.5).unwrap();
        world.spawn_wall(0.0, 0.54, 0.0, 2.0, 0.05).unwrap();
        // Sliding along the wall: touching but not approaching
        let input = TickInput {
            launches: vec![(chip, DVec2::new(0.5, 0.0))],
        };
        for _ in 0..10 {
            let events = tick(&mut world, &input, SIM_DT);
            assert!(events.is_empty());
        }
        assert_eq!(world.chip(chip).unwrap().velocity(), DVec2::new(0.5, 0.0));
        assert_eq!(world.contacts.len(), 1);
    }

    #[test]
    fn test_recontact_fires_again() {
        let mut world = frictionless();
        let chip = world.spawn_chip(0.0, 0.0, 0.5).unwrap();
        let wall = world.spawn_wall(0.0, 0.6, 0.0, 2.0, 0.05).unwrap();
        let cc = world.collider_id(EntityId::Chip(chip)).unwrap();
        let wc = world.collider_id(EntityId::Wall(wall)).unwrap();

        world.launch(chip, DVec2::new(0.0, 1.2));
        let mut hits = 0;
        for _ in 0..120 {
            let events = tick(&mut world, &TickInput::default(), SIM_DT);
            hits += events
                .iter()
                .filter(|e| matches!(e, PhysicsEvent::WallHit { .. }))
                .count();
            if world.chip(chip).unwrap().velocity().y < 0.0 && !world.contacts.is_touching(cc, wc) {
                break;
            }
        }
        assert_eq!(hits, 1);

        // Teleport back into contact moving toward the wall again
        world.chip_mut(chip).unwrap().place(0.0, 0.1);
        world.launch(chip, DVec2::new(0.0, 1.0));
        let events = tick(&mut world, &TickInput::default(), SIM_DT);
        assert!(events.contains(&PhysicsEvent::WallHit { chip, wall }));
    }

    #[test]
    fn test_chip_falls_off_table() {
        let mut world = World::new(PhysicsSettings::default()).unwrap();
        let chip = world.spawn_chip(2.9, 0.0, CHIP_RADIUS).unwrap();
        let input = TickInput {
            launches: vec![(chip, DVec2::new(4.0, 0.0))],
        };
        let mut knocked = false;
        for _ in 0..30 {
            let events = tick(&mut world, &input, SIM_DT);
            if events.contains(&PhysicsEvent::KnockedOut { chip }) {
                knocked = true;
                break;
            }
        }
        assert!(knocked);
        assert!(!world.chip(chip).unwrap().in_play);
        assert!(!world.any_moving());
    }

    #[test]
    fn test_settled_event() {
        let mut world = World::new(PhysicsSettings::default()).unwrap();
        let chip = world.spawn_chip(0.0, 0.0, CHIP_RADIUS).unwrap();
        let mut input = TickInput {
            launches: vec![(chip, DVec2::new(0.0, 1.0))],
        };
        let mut settled_at = None;
        for n in 0..200 {
            let events = tick(&mut world, &input, SIM_DT);
            input = TickInput::default();
            if events.contains(&PhysicsEvent::Settled) {
                settled_at = Some(n);
                break;
            }
        }
        // 1 unit/s at 4 units/s² stops after 0.25s = 30 ticks
        let n = settled_at.unwrap();
        assert!((29..=31).contains(&n));
        assert!(!world.any_moving());
    }

    #[test]
    fn test_unknown_launch_is_ignored() {
        let mut world = frictionless();
        let input = TickInput {
            launches: vec![(42, DVec2::X)],
        };
        assert!(tick(&mut world, &input, SIM_DT).is_empty());
    }

    #[test]
    fn test_stepper_runs_fixed_ticks() {
        let mut world = frictionless();
        let chip = world.spawn_chip(0.0, 0.0, CHIP_RADIUS).unwrap();
        let mut stepper = FixedStepper::new();
        let input = TickInput {
            launches: vec![(chip, DVec2::new(1.0, 0.0))],
        };
        stepper.advance(&mut world, &input, 0.035);
        assert_eq!(world.time_ticks, 4);

        // A huge frame is capped at max_substeps
        stepper.advance(&mut world, &TickInput::default(), 5.0);
        assert_eq!(world.time_ticks, 4 + u64::from(MAX_SUBSTEPS));
    }

    #[test]
    fn test_stepper_keeps_launch_on_short_frame() {
        let mut world = frictionless();
        let chip = world.spawn_chip(0.0, 0.0, CHIP_RADIUS).unwrap();
        let mut stepper = FixedStepper::new();
        let input = TickInput {
            launches: vec![(chip, DVec2::new(1.0, 0.0))],
        };
        stepper.advance(&mut world, &input, 0.001);
        assert_eq!(world.time_ticks, 0);
        assert_eq!(world.chip(chip).unwrap().velocity(), DVec2::new(1.0, 0.0));
    }
}

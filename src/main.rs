//! Knockout Physics demo
//!
//! Sets up the standard table, fires every chip with a seeded random launch
//! and runs the physics at a simulated 60 fps until everything settles.
//!
//! Usage: `knockout-physics [settings.json] [seed]`

use std::path::PathBuf;
use std::process::ExitCode;

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use knockout_physics::consts::*;
use knockout_physics::sim::{FixedStepper, PhysicsEvent, TickInput, World};
use knockout_physics::{ConfigurationError, PhysicsSettings};

/// Simulated render frame
const FRAME_DT: f64 = 1.0 / 60.0;
/// Give up after this much simulated time
const MAX_SECONDS: f64 = 30.0;

/// Starting chip spots: three per side
const HOME_SPOTS: [(f64, f64); 6] = [
    (0.0, 4.0),
    (2.0, 4.0),
    (-2.0, 4.0),
    (0.0, -4.0),
    (2.0, -4.0),
    (-2.0, -4.0),
];

fn build_table(settings: PhysicsSettings) -> Result<(World, Vec<u32>), ConfigurationError> {
    let mut world = World::new(settings)?;
    let chips = HOME_SPOTS
        .iter()
        .map(|&(x, z)| world.spawn_chip(x, z, CHIP_RADIUS))
        .collect::<Result<Vec<_>, _>>()?;

    // Two oblique bumpers in the middle of the table
    let tilt = 2.0_f64.atan();
    world.spawn_wall(-1.5, 0.0, tilt, WALL_HALF_WIDTH, WALL_HALF_DEPTH)?;
    world.spawn_wall(1.5, 0.0, -tilt, WALL_HALF_WIDTH, WALL_HALF_DEPTH)?;
    Ok((world, chips))
}

/// Aim every chip roughly at the opposing side
fn random_launches(world: &World, chips: &[u32], rng: &mut Pcg32) -> Vec<(u32, DVec2)> {
    chips
        .iter()
        .filter_map(|&id| world.chip(id))
        .map(|chip| {
            let toward = if chip.pos.z > 0.0 { -1.0 } else { 1.0 };
            let spread: f64 = rng.random_range(-0.6..0.6);
            let speed: f64 = rng.random_range(1.5..6.0);
            let dir = DVec2::new(spread, toward).normalize();
            (chip.id, dir * speed)
        })
        .collect()
}

fn run() -> Result<(), ConfigurationError> {
    let mut args = std::env::args().skip(1);
    let settings_path = args.next().map(PathBuf::from);
    let seed = args.next().and_then(|s| s.parse::<u64>().ok()).unwrap_or(12345);

    let settings = PhysicsSettings::load(settings_path.as_deref())?;
    let (mut world, chips) = build_table(settings)?;
    let mut rng = Pcg32::seed_from_u64(seed);

    let input = TickInput {
        launches: random_launches(&world, &chips, &mut rng),
    };
    log::info!("seed {seed}: launching {} chips", input.launches.len());

    let mut stepper = FixedStepper::new();
    let mut elapsed = 0.0;
    let mut pending = Some(input);
    while elapsed < MAX_SECONDS {
        let input = pending.take().unwrap_or_default();
        let events = stepper.advance(&mut world, &input, FRAME_DT);
        elapsed += FRAME_DT;

        for event in &events {
            match event {
                PhysicsEvent::ChipsCollided { a, b } => log::debug!("t={elapsed:.2}s chips {a}/{b}"),
                PhysicsEvent::WallHit { chip, wall } => log::debug!("t={elapsed:.2}s chip {chip} hit wall {wall}"),
                PhysicsEvent::KnockedOut { chip } => log::info!("t={elapsed:.2}s chip {chip} off the table"),
                PhysicsEvent::Settled => {}
            }
        }
        if events.contains(&PhysicsEvent::Settled) || !world.any_moving() {
            break;
        }
    }

    let survivors: Vec<String> = world
        .chips_in_play()
        .map(|c| format!("{}@({:.2}, {:.2})", c.id, c.pos.x, c.pos.z))
        .collect();
    log::info!(
        "settled after {:.2}s ({} ticks); {} chips remain: {}",
        elapsed,
        world.time_ticks,
        survivors.len(),
        survivors.join(", ")
    );
    Ok(())
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

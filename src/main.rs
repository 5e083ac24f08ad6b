//! Spiral Run native entry point
//!
//! Headless driver: generates a course, then runs the fixed-timestep loop
//! with a simple autopilot standing in for keyboard and mouse input.
//!
//! Usage: `spiral-run [seed] [frames]`

use rand::Rng;

use spiral_run::consts::{MAX_SUBSTEPS, SIM_DT};
use spiral_run::sim::{RunEvent, Simulation, StepInput};
use spiral_run::{Settings, xz};

/// Frame time the driver pretends the display runs at
const FRAME_DT: f32 = 1.0 / 60.0;
/// Default run length: two minutes of frames
const DEFAULT_FRAMES: u32 = 60 * 120;

/// Heads for the next platform below the player's feet
#[derive(Debug, Default)]
struct Autopilot {
    target: usize,
}

impl Autopilot {
    fn input(&mut self, sim: &Simulation) -> StepInput {
        let scale = sim.tuning.platform_scale;
        let feet = sim.player.position.y - sim.player.size.y;

        while let Some(platform) = sim.platforms.get(self.target) {
            let top = platform.center.y * scale.y + scale.y / 2.0;
            if top < feet - 0.01 {
                break;
            }
            self.target += 1;
        }

        let Some(platform) = sim.platforms.get(self.target) else {
            return StepInput::default();
        };
        let to_target = xz(platform.center * scale - sim.player.position);
        let grounded = sim.is_grounded();

        StepInput {
            wish_dir: to_target.normalize_or_zero(),
            jump: grounded && to_target.length() > 0.35,
        }
    }

    fn restart(&mut self) {
        self.target = 0;
    }
}

fn main() {
    env_logger::init();
    log::info!("Spiral Run (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| rand::rng().random());
    let frames = args
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let settings = Settings::load();
    let mut sim = match Simulation::with_seed(seed, &settings) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Invalid settings: {e}");
            std::process::exit(1);
        }
    };
    println!(
        "Seed {}: {} platforms, spawn {:?}",
        seed,
        sim.platforms.len(),
        sim.run.spawn
    );

    let mut pilot = Autopilot::default();
    let mut accumulator = 0.0_f32;
    let mut lowest_reached = sim.run.spawn.y;

    for _ in 0..frames {
        accumulator += FRAME_DT.min(0.1);

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = pilot.input(&sim);
            match sim.step(&input, SIM_DT) {
                Some(RunEvent::Finished {
                    elapsed,
                    personal_best,
                }) => {
                    let marker = if personal_best { " (best)" } else { "" };
                    println!("Time: {} seconds{}", elapsed, marker);
                    pilot.restart();
                }
                Some(RunEvent::Fell) => pilot.restart(),
                None => {}
            }
            lowest_reached = lowest_reached.min(sim.position().y);
            accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    let run = &sim.run;
    println!(
        "{} attempts, {} falls, {} finishes, best {:?}, lowest height {:.2} of {:.2}",
        run.attempts,
        run.falls,
        run.finishes,
        run.best_time,
        lowest_reached,
        run.lowest_platform_y
    );
    log::debug!("Final position {:?}", sim.position());
}

//! Per-frame player step
//!
//! Fixed order within one step: contacts, gravity and jump, horizontal
//! movement, integration, post-move velocity clipping, reset checks, timer.

use glam::Vec3;

use super::collision::{ContactSet, clip_velocity};
use super::state::{PhysicsTuning, Simulation};
use crate::{horizontal_speed, xz};

/// Input for a single step
#[derive(Debug, Clone, Default)]
pub struct StepInput {
    /// Desired horizontal direction, unit length or zero
    pub wish_dir: Vec3,
    /// Jump key held (re-triggers every grounded step while held)
    pub jump: bool,
}

/// Something the caller should surface to the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunEvent {
    /// Fell below the course; run restarted
    Fell,
    /// Landed on the bottom of the course; run restarted
    Finished { elapsed: f32, personal_best: bool },
}

/// Advance the simulation by `dt` seconds
pub fn step(sim: &mut Simulation, input: &StepInput, dt: f32) -> Option<RunEvent> {
    let grounded = sim.contacts().is_grounded();
    let tuning = &sim.tuning;
    let player = &mut sim.player;

    if grounded {
        player.velocity.y = player.velocity.y.max(0.0);
    } else {
        player.velocity.y -= tuning.gravity * dt;
    }

    if input.jump && grounded {
        player.velocity.y = tuning.jump_force;
    }

    player.velocity = if grounded && !input.jump {
        ground_move(player.velocity, input.wish_dir, tuning, dt)
    } else {
        air_move(player.velocity, input.wish_dir, tuning, dt)
    };

    player.position += player.velocity * dt;

    let mut contacts = sim.contacts();
    log::trace!("Contacts after move: {:?}", contacts.as_slice());
    sim.player.velocity = clip_velocity(sim.player.velocity, &contacts);

    check_resets(sim, &mut contacts, dt)
}

/// Fail and finish checks, then the timer
fn check_resets(sim: &mut Simulation, contacts: &mut ContactSet, dt: f32) -> Option<RunEvent> {
    let lowest = sim.run.lowest_platform_y;
    let mut event = None;

    if sim.player.position.y <= sim.tuning.fail_height(lowest) {
        log::debug!(
            "Fell at {:?} after {:.2}s",
            sim.player.position,
            sim.run.elapsed
        );
        sim.run.falls += 1;
        sim.reset_run();
        *contacts = sim.contacts();
        event = Some(RunEvent::Fell);
    }

    if sim.player.position.y <= sim.tuning.finish_height(lowest) && contacts.is_grounded() {
        let elapsed = sim.run.elapsed;
        let personal_best = sim.run.record_finish(elapsed);
        if personal_best {
            log::info!("Finished in {:.3}s (new best)", elapsed);
        } else {
            log::info!("Finished in {:.3}s", elapsed);
        }
        sim.reset_run();
        event = Some(RunEvent::Finished {
            elapsed,
            personal_best,
        });
    }

    if event.is_none() {
        sim.run.elapsed += dt;
    }
    event
}

/// Friction, then accelerate toward max ground speed
pub fn ground_move(velocity: Vec3, wish_dir: Vec3, tuning: &PhysicsTuning, dt: f32) -> Vec3 {
    let mut velocity = velocity;
    velocity.x *= tuning.friction;
    velocity.z *= tuning.friction;
    accelerate(velocity, wish_dir, tuning.max_ground_speed, tuning, dt)
}

/// Limited air control plus speed-dependent horizontal drag
///
/// The drag factor is taken from the full speed and applied to X first; Z
/// then uses a factor recomputed from the already damped velocity.
pub fn air_move(velocity: Vec3, wish_dir: Vec3, tuning: &PhysicsTuning, dt: f32) -> Vec3 {
    let mut velocity = accelerate(velocity, wish_dir, tuning.max_air_speed, tuning, dt);
    velocity.x *= air_drag(velocity, tuning);
    velocity.z *= air_drag(velocity, tuning);
    velocity
}

/// Multiplier in (0, 1] that shrinks as speed grows
#[inline]
pub fn air_drag(velocity: Vec3, tuning: &PhysicsTuning) -> f32 {
    tuning
        .air_drag_base
        .powf((velocity.length() / tuning.air_drag_speed_scale).powf(tuning.air_drag_exponent))
}

/// Add speed along `wish_dir` until the projected speed reaches `target_speed`
///
/// The gain per step is capped at `max_ground_speed * acceleration * dt` in
/// both ground and air.
pub fn accelerate(
    velocity: Vec3,
    wish_dir: Vec3,
    target_speed: f32,
    tuning: &PhysicsTuning,
    dt: f32,
) -> Vec3 {
    let max_accel = tuning.max_ground_speed * tuning.acceleration;
    let current_speed = xz(velocity).dot(wish_dir);
    let add_speed = (target_speed - current_speed).clamp(0.0, max_accel * dt);
    velocity + add_speed * wish_dir
}

impl Simulation {
    /// See [`step`]
    pub fn step(&mut self, input: &StepInput, dt: f32) -> Option<RunEvent> {
        step(self, input, dt)
    }

    /// Current horizontal speed, for HUDs
    pub fn horizontal_speed(&self) -> f32 {
        horizontal_speed(self.player.velocity)
    }
}

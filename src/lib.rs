//! Spiral Run - a first-person speedrun down a generated spiral staircase
//!
//! Core modules:
//! - `sim`: Deterministic simulation (path generation, collisions, player movement)
//! - `input`: Turns look direction and key state into a wish direction
//! - `settings`: Data-driven tuning, loadable from JSON

pub mod input;
pub mod settings;
pub mod sim;

pub use settings::{ConfigError, Settings};
pub use sim::{RunEvent, Simulation, StepInput};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;
    use std::f32::consts::{FRAC_PI_2, TAU};

    /// Fixed simulation timestep used by the native driver (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Downward acceleration while airborne (units/s²)
    pub const GRAVITY: f32 = 3.5;
    /// Horizontal velocity multiplier applied every grounded step
    pub const FRICTION: f32 = 0.7;
    pub const MAX_GROUND_SPEED: f32 = 10.0;
    /// Air control cap, much lower than ground speed
    pub const MAX_AIR_SPEED: f32 = 1.0;
    /// Multiplied by max ground speed to get the per-second acceleration cap
    pub const ACCELERATION: f32 = 5.0;
    /// Instantaneous vertical velocity set on jump
    pub const JUMP_FORCE: f32 = 1.3;

    /// Air drag: `base^((|v| / speed_scale)^exponent)`
    pub const AIR_DRAG_BASE: f32 = 0.99;
    pub const AIR_DRAG_SPEED_SCALE: f32 = 20.0;
    pub const AIR_DRAG_EXPONENT: f32 = 1.1;

    /// Player box: width, height (below the eye point), depth
    pub const PLAYER_SIZE: Vec3 = Vec3::new(0.65, 0.6, 0.65);
    /// World scale applied to every platform (also its full extent)
    pub const PLATFORM_SCALE: Vec3 = Vec3::new(0.4, 0.1, 0.4);

    /// How far below the lowest platform the player may fall before a reset
    pub const FAIL_MARGIN: f32 = 0.5;
    /// Face-touch tolerance for contact classification
    pub const CONTACT_EPSILON: f32 = 0.05;

    /// Path generation defaults
    pub const ARC_RADIUS_MIN: f32 = 5.0;
    pub const ARC_RADIUS_MAX: f32 = 20.0;
    pub const TURN_LENGTH_MIN: f32 = FRAC_PI_2;
    pub const TURN_LENGTH_MAX: f32 = TAU;
    pub const INITIAL_ARC_STEP: f32 = 8.0;
    pub const ARC_STEP_INCREMENT: f32 = 1.0;
    pub const ARC_LENGTH_BUDGET: f32 = 300.0;
    pub const VERTICAL_STEP: f32 = 2.0;
    pub const START_HEIGHT: f32 = 0.0;
    /// Extra height above the player box at spawn
    pub const SPAWN_LIFT: f32 = 1.0;
}

/// Point on a horizontal circle of radius `r` at angle `theta` (XZ plane)
#[inline]
pub fn polar_xz(r: f32, theta: f32) -> Vec3 {
    Vec3::new(r * theta.cos(), 0.0, r * theta.sin())
}

/// Horizontal (XZ) part of a vector
#[inline]
pub fn xz(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Length of the horizontal part of a vector
#[inline]
pub fn horizontal_speed(v: Vec3) -> f32 {
    xz(v).length()
}

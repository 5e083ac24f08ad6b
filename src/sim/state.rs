//! Simulation state and core types
//!
//! Platforms are generated once per run and never mutated. The player and
//! run timer are mutated every step and restored on fail/finish resets.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, ContactSet, detect_contacts};
use super::path::{PathLayout, generate};
use crate::consts::*;
use crate::settings::{ConfigError, Settings};

/// A platform, stored in unscaled platform units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub center: Vec3,
}

impl Platform {
    pub fn new(center: Vec3) -> Self {
        Self { center }
    }

    /// World-space box: the scaled center, with `platform_scale` as full extent
    pub fn bounds(&self, platform_scale: Vec3) -> Aabb {
        Aabb::from_center(self.center * platform_scale, platform_scale)
    }
}

/// Movement and collision tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub gravity: f32,
    pub friction: f32,
    pub max_ground_speed: f32,
    pub max_air_speed: f32,
    pub acceleration: f32,
    pub jump_force: f32,
    pub air_drag_base: f32,
    pub air_drag_speed_scale: f32,
    pub air_drag_exponent: f32,
    /// Player box (width, height below the eye point, depth)
    pub player_size: Vec3,
    pub platform_scale: Vec3,
    pub fail_margin: f32,
    pub contact_epsilon: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            friction: FRICTION,
            max_ground_speed: MAX_GROUND_SPEED,
            max_air_speed: MAX_AIR_SPEED,
            acceleration: ACCELERATION,
            jump_force: JUMP_FORCE,
            air_drag_base: AIR_DRAG_BASE,
            air_drag_speed_scale: AIR_DRAG_SPEED_SCALE,
            air_drag_exponent: AIR_DRAG_EXPONENT,
            player_size: PLAYER_SIZE,
            platform_scale: PLATFORM_SCALE,
            fail_margin: FAIL_MARGIN,
            contact_epsilon: CONTACT_EPSILON,
        }
    }
}

impl PhysicsTuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("physics.gravity", self.gravity),
            ("physics.max_ground_speed", self.max_ground_speed),
            ("physics.max_air_speed", self.max_air_speed),
            ("physics.acceleration", self.acceleration),
            ("physics.jump_force", self.jump_force),
            ("physics.fail_margin", self.fail_margin),
            ("physics.contact_epsilon", self.contact_epsilon),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::invalid(field, "must be finite and not negative"));
            }
        }
        if !(0.0..=1.0).contains(&self.friction) {
            return Err(ConfigError::invalid("physics.friction", "must be within [0, 1]"));
        }
        if !(self.air_drag_base > 0.0 && self.air_drag_base <= 1.0) {
            return Err(ConfigError::invalid(
                "physics.air_drag_base",
                "must be within (0, 1]",
            ));
        }
        if !(self.air_drag_speed_scale > 0.0) {
            return Err(ConfigError::invalid(
                "physics.air_drag_speed_scale",
                "must be positive",
            ));
        }
        if !(self.player_size.min_element() > 0.0 && self.player_size.is_finite()) {
            return Err(ConfigError::invalid("physics.player_size", "must be positive"));
        }
        if !(self.platform_scale.min_element() > 0.0 && self.platform_scale.is_finite()) {
            return Err(ConfigError::invalid("physics.platform_scale", "must be positive"));
        }
        Ok(())
    }

    /// Height at or below which a grounded player has finished the run
    pub fn finish_height(&self, lowest_platform_y: f32) -> f32 {
        lowest_platform_y + self.platform_scale.y / 2.0 + self.player_size.y
    }

    /// Height at or below which the player has fallen off the course
    pub fn fail_height(&self, lowest_platform_y: f32) -> f32 {
        lowest_platform_y - self.fail_margin
    }
}

/// The player body
///
/// `position` is the eye point: the box spans `size.y` below it and
/// `size.x / 2`, `size.z / 2` to either side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub size: Vec3,
}

impl PlayerState {
    pub fn new(position: Vec3, size: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            size,
        }
    }

    pub fn bounds(&self) -> Aabb {
        let half = Vec3::new(self.size.x / 2.0, 0.0, self.size.z / 2.0);
        Aabb::new(
            Vec3::new(
                self.position.x - half.x,
                self.position.y - self.size.y,
                self.position.z - half.z,
            ),
            Vec3::new(
                self.position.x + half.x,
                self.position.y,
                self.position.z + half.z,
            ),
        )
    }
}

/// Run timer and bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Seconds since the last reset
    pub elapsed: f32,
    pub spawn: Vec3,
    /// World-space center height of the last platform
    pub lowest_platform_y: f32,
    /// Number of resets of either kind
    pub attempts: u32,
    pub falls: u32,
    pub finishes: u32,
    /// Fastest finish this session
    pub best_time: Option<f32>,
}

impl RunState {
    pub fn new(spawn: Vec3, lowest_platform_y: f32) -> Self {
        Self {
            elapsed: 0.0,
            spawn,
            lowest_platform_y,
            attempts: 0,
            falls: 0,
            finishes: 0,
            best_time: None,
        }
    }

    /// Record a finish; returns true for a new personal best
    pub fn record_finish(&mut self, elapsed: f32) -> bool {
        self.finishes += 1;
        match self.best_time {
            Some(best) if best <= elapsed => false,
            _ => {
                self.best_time = Some(elapsed);
                true
            }
        }
    }
}

/// One self-contained run: course, player, and timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    /// Seed the course was generated from (None if an external RNG was used)
    pub seed: Option<u64>,
    pub tuning: PhysicsTuning,
    pub platforms: Vec<Platform>,
    pub player: PlayerState,
    pub run: RunState,
}

impl Simulation {
    /// Generate a course with the given RNG and place the player at spawn
    pub fn new<R: Rng + ?Sized>(rng: &mut R, settings: &Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let tuning = settings.physics.clone();
        let layout = generate(
            rng,
            &settings.path,
            tuning.platform_scale,
            tuning.player_size.y,
        );
        Ok(Self::from_layout(layout, tuning))
    }

    /// Deterministic course from a seed
    pub fn with_seed(seed: u64, settings: &Settings) -> Result<Self, ConfigError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut sim = Self::new(&mut rng, settings)?;
        sim.seed = Some(seed);
        log::info!("Course seed: {}", seed);
        Ok(sim)
    }

    /// Wrap an existing layout (hand-built courses, tests)
    pub fn from_layout(layout: PathLayout, tuning: PhysicsTuning) -> Self {
        let player = PlayerState::new(layout.spawn, tuning.player_size);
        Self {
            seed: None,
            run: RunState::new(layout.spawn, layout.lowest_platform_y),
            platforms: layout.platforms,
            player,
            tuning,
        }
    }

    /// Contacts for the player's current position
    pub fn contacts(&self) -> ContactSet {
        detect_contacts(
            &self.player,
            &self.platforms,
            self.tuning.platform_scale,
            self.tuning.contact_epsilon,
        )
    }

    pub fn is_grounded(&self) -> bool {
        self.contacts().is_grounded()
    }

    pub fn position(&self) -> Vec3 {
        self.player.position
    }

    /// Put the player back at spawn with a fresh timer
    pub fn reset_run(&mut self) {
        self.run.elapsed = 0.0;
        self.run.attempts += 1;
        self.player.velocity = Vec3::ZERO;
        self.player.position = self.run.spawn;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::path::PathParams;

    #[test]
    fn test_player_box_hangs_below_eye_point() {
        let player = PlayerState::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.5, 0.6, 0.4));
        let b = player.bounds();
        assert_eq!(b.max.y, 2.0);
        assert!((b.min.y - 1.4).abs() < 1e-6);
        assert!((b.min.x - 0.75).abs() < 1e-6);
        assert!((b.max.z - 3.2).abs() < 1e-6);
    }

    #[test]
    fn test_platform_bounds_scaled() {
        let b = Platform::new(Vec3::new(10.0, -2.0, 0.0)).bounds(PLATFORM_SCALE);
        assert!((b.min.x - 3.8).abs() < 1e-5);
        assert!((b.max.x - 4.2).abs() < 1e-5);
        assert!((b.max.y - (-0.15)).abs() < 1e-5);
    }

    #[test]
    fn test_with_seed_spawns_player() {
        let settings = Settings::default();
        let sim = Simulation::with_seed(12345, &settings).expect("default settings are valid");
        assert_eq!(sim.seed, Some(12345));
        assert!(!sim.platforms.is_empty());
        assert_eq!(sim.player.position, sim.run.spawn);
        assert_eq!(sim.player.velocity, Vec3::ZERO);
        assert_eq!(sim.run.elapsed, 0.0);
    }

    #[test]
    fn test_new_rejects_invalid_settings() {
        let mut settings = Settings::default();
        settings.path = PathParams {
            vertical_step: -1.0,
            ..Default::default()
        };
        assert!(Simulation::with_seed(1, &settings).is_err());

        let mut settings = Settings::default();
        settings.physics.friction = 1.5;
        assert!(Simulation::with_seed(1, &settings).is_err());

        // A budget shorter than the first arc step would leave no platforms
        let mut settings = Settings::default();
        settings.path.length_budget = 5.0;
        assert!(Simulation::with_seed(1, &settings).is_err());
    }

    #[test]
    fn test_record_finish_tracks_best() {
        let mut run = RunState::new(Vec3::ZERO, 0.0);
        assert!(run.record_finish(30.0));
        assert!(!run.record_finish(31.0));
        assert!(run.record_finish(25.5));
        assert_eq!(run.best_time, Some(25.5));
        assert_eq!(run.finishes, 3);
    }

    #[test]
    fn test_reset_run_restores_spawn() {
        let mut sim = Simulation::with_seed(7, &Settings::default()).expect("valid");
        sim.player.position += Vec3::new(3.0, -10.0, 1.0);
        sim.player.velocity = Vec3::new(1.0, -4.0, 0.0);
        sim.run.elapsed = 12.0;

        sim.reset_run();
        assert_eq!(sim.player.position, sim.run.spawn);
        assert_eq!(sim.player.velocity, Vec3::ZERO);
        assert_eq!(sim.run.elapsed, 0.0);
        assert_eq!(sim.run.attempts, 1);
    }

    #[test]
    fn test_tuning_thresholds() {
        let tuning = PhysicsTuning::default();
        assert!((tuning.finish_height(-10.0) - (-10.0 + 0.05 + 0.6)).abs() < 1e-5);
        assert!((tuning.fail_height(-10.0) - (-10.5)).abs() < 1e-5);
    }
}

//! Spiral staircase generation
//!
//! The course is a descending chain of circular arcs that alternate turning
//! direction (a switchback staircase). Each placed platform:
//! - drops the height by a fixed vertical step
//! - advances the angle by `dc / (2r)` around the current arc pivot
//! - lengthens the next arc step by a fixed increment, so later jumps are longer
//!
//! Generation stops once the accumulated arc length would exceed the budget.

use std::f32::consts::PI;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::state::Platform;
use crate::consts::*;
use crate::polar_xz;
use crate::settings::ConfigError;

/// Closed interval sampled uniformly by the generator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    pub min: f32,
    pub max: f32,
}

impl FloatRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A degenerate range that always samples `value`
    pub const fn constant(value: f32) -> Self {
        Self::new(value, value)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.min == self.max {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }

    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(ConfigError::invalid(field, "bounds must be finite"));
        }
        if self.min > self.max {
            return Err(ConfigError::invalid(field, "min must not exceed max"));
        }
        Ok(())
    }
}

/// Parameters for one staircase
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathParams {
    /// Radius of each arc, resampled at every turn
    pub radius: FloatRange,
    /// Angular budget of each turn (radians)
    pub turn_length: FloatRange,
    /// Arc length between the first two platforms
    pub initial_arc_step: f32,
    /// Added to the arc step after every platform
    pub arc_step_increment: f32,
    /// Total arc length of the course
    pub length_budget: f32,
    /// Height drop per platform (in platform units)
    pub vertical_step: f32,
    /// Height of the (unplaced) platform before the first one
    pub start_height: f32,
    /// Clearance between the player box and the spawn platform height
    pub spawn_lift: f32,
}

impl Default for PathParams {
    fn default() -> Self {
        Self {
            radius: FloatRange::new(ARC_RADIUS_MIN, ARC_RADIUS_MAX),
            turn_length: FloatRange::new(TURN_LENGTH_MIN, TURN_LENGTH_MAX),
            initial_arc_step: INITIAL_ARC_STEP,
            arc_step_increment: ARC_STEP_INCREMENT,
            length_budget: ARC_LENGTH_BUDGET,
            vertical_step: VERTICAL_STEP,
            start_height: START_HEIGHT,
            spawn_lift: SPAWN_LIFT,
        }
    }
}

impl PathParams {
    /// Reject parameter sets that would divide by zero or never terminate
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.radius.check("path.radius")?;
        if self.radius.min <= 0.0 {
            return Err(ConfigError::invalid("path.radius", "radius must be positive"));
        }
        self.turn_length.check("path.turn_length")?;
        if self.turn_length.min < 0.0 {
            return Err(ConfigError::invalid(
                "path.turn_length",
                "turn length must not be negative",
            ));
        }
        if !(self.initial_arc_step > 0.0) {
            return Err(ConfigError::invalid(
                "path.initial_arc_step",
                "must be positive",
            ));
        }
        if !(self.arc_step_increment >= 0.0) {
            return Err(ConfigError::invalid(
                "path.arc_step_increment",
                "must not be negative",
            ));
        }
        if !(self.length_budget > 0.0 && self.length_budget.is_finite()) {
            return Err(ConfigError::invalid(
                "path.length_budget",
                "must be positive and finite",
            ));
        }
        if self.length_budget <= self.initial_arc_step {
            return Err(ConfigError::invalid(
                "path.length_budget",
                "must exceed the initial arc step or the course is empty",
            ));
        }
        if !(self.vertical_step > 0.0) {
            return Err(ConfigError::invalid("path.vertical_step", "must be positive"));
        }
        if !self.start_height.is_finite() || !self.spawn_lift.is_finite() {
            return Err(ConfigError::invalid(
                "path.start_height",
                "start height and spawn lift must be finite",
            ));
        }
        Ok(())
    }
}

/// A generated course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathLayout {
    /// Platforms in descending order (unscaled platform units)
    pub platforms: Vec<Platform>,
    /// Arc step used to place each platform, parallel to `platforms`
    pub arc_steps: Vec<f32>,
    /// World-space spawn point (player eye position)
    pub spawn: Vec3,
    /// World-space height of the last platform's center
    pub lowest_platform_y: f32,
    /// Total arc length consumed
    pub arc_length: f32,
}

impl PathLayout {
    /// World-space box of platform `index`, if it exists
    pub fn platform_bounds(&self, index: usize, platform_scale: Vec3) -> Option<Aabb> {
        self.platforms
            .get(index)
            .map(|p| p.bounds(platform_scale))
    }
}

/// Generate a spiral staircase
///
/// `platform_scale` and `player_height` only affect the derived spawn point
/// and finish height; platform centers are returned in platform units.
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    params: &PathParams,
    platform_scale: Vec3,
    player_height: f32,
) -> PathLayout {
    let mut r = params.radius.sample(rng);
    let mut dc = params.initial_arc_step;
    let mut dtheta = dc / (2.0 * r);
    let mut theta = 0.0_f32;
    let mut rot = 1.0_f32;
    let mut pivot = Vec3::ZERO;
    let mut y = params.start_height;
    let mut sum_c = 0.0_f32;

    let spawn = (pivot + polar_xz(r, theta + rot * dtheta) + Vec3::new(0.0, y, 0.0))
        * platform_scale
        + Vec3::new(0.0, player_height + params.spawn_lift, 0.0);

    let mut platforms = Vec::new();
    let mut arc_steps = Vec::new();

    while sum_c + dc < params.length_budget {
        let turn_length = params.turn_length.sample(rng);
        let start_theta = theta;
        let mut arc_pos = pivot;
        let mut placed = 0usize;

        theta += rot * dtheta;
        // The first step of a turn is always taken so every turn makes progress
        while (placed == 0 || (start_theta - theta).abs() <= turn_length)
            && sum_c + dc <= params.length_budget
        {
            arc_pos = pivot + polar_xz(r, theta);
            y -= params.vertical_step;
            platforms.push(Platform::new(arc_pos + Vec3::new(0.0, y, 0.0)));
            arc_steps.push(dc);

            sum_c += dc;
            dc += params.arc_step_increment;
            dtheta = dc / (2.0 * r);
            placed += 1;
            theta += rot * dtheta;
        }

        let old_pivot = pivot;
        r = params.radius.sample(rng);
        pivot = arc_pos + r * (arc_pos - old_pivot).normalize_or_zero();

        // Undo the overshoot half-step, then face back toward the new pivot
        theta -= rot * ((dc - params.arc_step_increment) / (2.0 * r));
        theta = if theta < PI { theta + PI } else { theta - PI };
        rot = -rot;

        log::debug!(
            "Turn placed {} platforms (budget {:.2} rad), next radius {:.2} at pivot {:?}",
            placed,
            turn_length,
            r,
            pivot
        );
    }

    let lowest_platform_y = y * platform_scale.y;
    log::info!(
        "Generated {} platforms over arc length {:.1}, spawn {:?}, finish height {:.2}",
        platforms.len(),
        sum_c,
        spawn,
        lowest_platform_y
    );

    PathLayout {
        platforms,
        arc_steps,
        spawn,
        lowest_platform_y,
        arc_length: sum_c,
    }
}

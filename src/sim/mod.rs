//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Injected or seeded RNG only
//! - Stable iteration order (platform generation order)
//! - No rendering, windowing, or raw input dependencies

pub mod collision;
pub mod path;
pub mod state;
pub mod tick;

pub use collision::{Aabb, ContactSet, classify_contact, clip_against, clip_velocity, detect_contacts};
pub use path::{FloatRange, PathLayout, PathParams, generate};
pub use state::{Platform, PhysicsTuning, PlayerState, RunState, Simulation};
pub use tick::{RunEvent, StepInput, step};

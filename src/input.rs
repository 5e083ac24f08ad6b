//! Movement key state to wish direction
//!
//! Lives outside `sim`: the simulation only ever sees the resulting vector.

use glam::Vec3;

use crate::xz;

/// Movement keys held this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveKeys {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveKeys {
    pub fn any(&self) -> bool {
        self.forward || self.back || self.left || self.right
    }
}

/// Horizontal unit direction for the held keys relative to `look`
///
/// Pitch is ignored. Opposing keys cancel; no keys (or a straight up/down
/// look) gives the zero vector.
pub fn wish_dir(look: Vec3, keys: MoveKeys) -> Vec3 {
    let forward = xz(look).normalize_or_zero();
    let right = forward.cross(Vec3::Y).normalize_or_zero();

    let mut wish = Vec3::ZERO;
    if keys.forward {
        wish += forward;
    }
    if keys.back {
        wish -= forward;
    }
    if keys.left {
        wish -= right;
    }
    if keys.right {
        wish += right;
    }
    wish.normalize_or_zero()
}

//! Collision detection and response for axis-aligned boxes
//!
//! Every platform is tested against the player box each query (no spatial
//! index). An overlapping platform contributes exactly one face normal,
//! picked by a fixed-priority face check: X before Y before Z, min face
//! before max face. Deep overlaps with no face in tolerance count as
//! standing on top.

use glam::Vec3;

use super::state::{Platform, PlayerState};

/// Absolute tolerance on interval ends so f32 rounding of a resting pose
/// still reads as touching
pub const OVERLAP_SLACK: f32 = 1e-4;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box of full extent `size` centered on `center`
    pub fn from_center(center: Vec3, size: Vec3) -> Self {
        let half = size / 2.0;
        Self::new(center - half, center + half)
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Closed-interval overlap on all three axes (touching counts)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x + OVERLAP_SLACK
            && self.max.x + OVERLAP_SLACK >= other.min.x
            && self.min.y <= other.max.y + OVERLAP_SLACK
            && self.max.y + OVERLAP_SLACK >= other.min.y
            && self.min.z <= other.max.z + OVERLAP_SLACK
            && self.max.z + OVERLAP_SLACK >= other.min.z
    }
}

/// Face normals of a unit box, pointing away from the platform
pub mod normals {
    use glam::Vec3;

    pub const NEG_X: Vec3 = Vec3::NEG_X;
    pub const POS_X: Vec3 = Vec3::X;
    pub const NEG_Y: Vec3 = Vec3::NEG_Y;
    pub const UP: Vec3 = Vec3::Y;
    pub const NEG_Z: Vec3 = Vec3::NEG_Z;
    pub const POS_Z: Vec3 = Vec3::Z;
}

/// Face normals touching the player this query, in platform order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactSet {
    normals: Vec<Vec3>,
}

impl ContactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, normal: Vec3) {
        self.normals.push(normal);
    }

    /// Standing on something: some contact is exactly +Y
    pub fn is_grounded(&self) -> bool {
        self.normals.iter().any(|n| *n == normals::UP)
    }

    pub fn contains(&self, normal: Vec3) -> bool {
        self.normals.contains(&normal)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec3> {
        self.normals.iter()
    }

    pub fn len(&self) -> usize {
        self.normals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normals.is_empty()
    }

    pub fn as_slice(&self) -> &[Vec3] {
        &self.normals
    }
}

/// Pick the contact normal for an overlapping pair
///
/// First face within `epsilon` wins; falls back to +Y.
pub fn classify_contact(player: &Aabb, platform: &Aabb, epsilon: f32) -> Vec3 {
    let touches = |a: f32, b: f32| (a - b).abs() < epsilon;

    if touches(platform.min.x, player.max.x) {
        normals::NEG_X
    } else if touches(platform.max.x, player.min.x) {
        normals::POS_X
    } else if touches(platform.min.y, player.max.y) {
        normals::NEG_Y
    } else if touches(platform.max.y, player.min.y) {
        normals::UP
    } else if touches(platform.min.z, player.max.z) {
        normals::NEG_Z
    } else if touches(platform.max.z, player.min.z) {
        normals::POS_Z
    } else {
        normals::UP
    }
}

/// Collect contact normals between the player and every platform
pub fn detect_contacts(
    player: &PlayerState,
    platforms: &[Platform],
    platform_scale: Vec3,
    epsilon: f32,
) -> ContactSet {
    let player_box = player.bounds();
    let mut contacts = ContactSet::new();

    for platform in platforms {
        let platform_box = platform.bounds(platform_scale);
        if player_box.overlaps(&platform_box) {
            contacts.push(classify_contact(&player_box, &platform_box, epsilon));
        }
    }

    contacts
}

/// Remove the velocity component pointing into a surface
#[inline]
pub fn clip_against(velocity: Vec3, normal: Vec3) -> Vec3 {
    let into = -normal;
    let speed_into = velocity.dot(into);
    if speed_into > 0.0 {
        velocity - speed_into * into
    } else {
        velocity
    }
}

/// Single pass of [`clip_against`] over every contact, in detection order
pub fn clip_velocity(velocity: Vec3, contacts: &ContactSet) -> Vec3 {
    contacts
        .iter()
        .fold(velocity, |v, normal| clip_against(v, *normal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{CONTACT_EPSILON, PLATFORM_SCALE, PLAYER_SIZE};

    fn player_at(position: Vec3) -> PlayerState {
        PlayerState::new(position, PLAYER_SIZE)
    }

    fn origin_platform() -> Vec<Platform> {
        vec![Platform::new(Vec3::ZERO)]
    }

    #[test]
    fn test_aabb_touching_counts_as_overlap() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(a.overlaps(&b));

        let c = Aabb::new(Vec3::new(1.01, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_rounding_gap_still_overlaps() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::new(0.0, 1.00001, 0.0), Vec3::new(1.0, 2.0, 1.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        let c = Aabb::new(Vec3::new(0.0, 1.001, 0.0), Vec3::new(1.0, 2.0, 1.0));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_resting_pose_boxes_overlap() {
        let y = PLATFORM_SCALE.y / 2.0 + PLAYER_SIZE.y;
        let player = player_at(Vec3::new(0.0, y, 0.0)).bounds();
        let platform = Platform::new(Vec3::ZERO).bounds(PLATFORM_SCALE);

        // Feet and platform top differ only by rounding
        assert!((player.min.y - platform.max.y).abs() < OVERLAP_SLACK);
        assert!(player.overlaps(&platform));
        assert_eq!(
            classify_contact(&player, &platform, CONTACT_EPSILON),
            normals::UP
        );
    }

    #[test]
    fn test_player_resting_on_platform_is_grounded() {
        let y = PLATFORM_SCALE.y / 2.0 + PLAYER_SIZE.y;
        let player = player_at(Vec3::new(0.0, y, 0.0));

        let contacts =
            detect_contacts(&player, &origin_platform(), PLATFORM_SCALE, CONTACT_EPSILON);
        assert_eq!(contacts.as_slice(), &[normals::UP]);
        assert!(contacts.is_grounded());
    }

    #[test]
    fn test_no_contact_when_apart() {
        let player = player_at(Vec3::new(0.0, 5.0, 0.0));
        let contacts =
            detect_contacts(&player, &origin_platform(), PLATFORM_SCALE, CONTACT_EPSILON);
        assert!(contacts.is_empty());
        assert!(!contacts.is_grounded());
    }

    #[test]
    fn test_x_face_beats_top_face() {
        // Player's +X face 0.01 past the platform's -X face, feet 0.01 below its top
        let x = -PLATFORM_SCALE.x / 2.0 + 0.01 - PLAYER_SIZE.x / 2.0;
        let y = PLATFORM_SCALE.y / 2.0 - 0.01 + PLAYER_SIZE.y;
        let player = player_at(Vec3::new(x, y, 0.0));

        let contacts =
            detect_contacts(&player, &origin_platform(), PLATFORM_SCALE, CONTACT_EPSILON);
        assert_eq!(contacts.as_slice(), &[normals::NEG_X]);
        assert!(!contacts.is_grounded());
    }

    #[test]
    fn test_top_face_beats_z_face() {
        let y = PLATFORM_SCALE.y / 2.0 + PLAYER_SIZE.y;
        let z = PLATFORM_SCALE.z / 2.0 - 0.01 + PLAYER_SIZE.z / 2.0;
        let player = player_at(Vec3::new(0.0, y, z));

        let contacts =
            detect_contacts(&player, &origin_platform(), PLATFORM_SCALE, CONTACT_EPSILON);
        assert_eq!(contacts.as_slice(), &[normals::UP]);
    }

    #[test]
    fn test_each_face_classified() {
        let platform = Aabb::from_center(Vec3::ZERO, Vec3::splat(2.0));
        let unit = Vec3::ONE;
        let cases = [
            (Vec3::new(-1.5, 0.0, 0.0), normals::NEG_X),
            (Vec3::new(1.5, 0.0, 0.0), normals::POS_X),
            (Vec3::new(0.0, -1.5, 0.0), normals::NEG_Y),
            (Vec3::new(0.0, 1.5, 0.0), normals::UP),
            (Vec3::new(0.0, 0.0, -1.5), normals::NEG_Z),
            (Vec3::new(0.0, 0.0, 1.5), normals::POS_Z),
        ];
        for (center, expected) in cases {
            let player = Aabb::from_center(center, unit);
            assert!(player.overlaps(&platform));
            assert_eq!(classify_contact(&player, &platform, 0.05), expected);
        }
    }

    #[test]
    fn test_deep_overlap_defaults_to_up() {
        let platform = Aabb::from_center(Vec3::ZERO, Vec3::splat(2.0));
        let player = Aabb::from_center(Vec3::ZERO, Vec3::ONE);
        assert_eq!(classify_contact(&player, &platform, 0.05), normals::UP);
    }

    #[test]
    fn test_one_normal_per_platform() {
        let y = PLATFORM_SCALE.y / 2.0 + PLAYER_SIZE.y;
        let player = player_at(Vec3::new(0.0, y, 0.0));
        // Two platforms under the player, one far away
        let platforms = vec![
            Platform::new(Vec3::ZERO),
            Platform::new(Vec3::new(0.5, 0.0, 0.0)),
            Platform::new(Vec3::new(50.0, 0.0, 0.0)),
        ];

        let contacts = detect_contacts(&player, &platforms, PLATFORM_SCALE, CONTACT_EPSILON);
        assert_eq!(contacts.len(), 2);
        assert!(contacts.iter().all(|n| *n == normals::UP));
    }

    #[test]
    fn test_clip_removes_inward_component() {
        let velocity = Vec3::new(2.0, -3.0, 1.0);
        let clipped = clip_against(velocity, normals::UP);
        assert!(clipped.dot(-normals::UP).abs() < 1e-6);
        assert_eq!(clipped, Vec3::new(2.0, 0.0, 1.0));

        // Second pass against the same contact changes nothing
        assert_eq!(clip_against(clipped, normals::UP), clipped);
    }

    #[test]
    fn test_clip_keeps_outward_motion() {
        let velocity = Vec3::new(0.0, 1.3, 0.0);
        assert_eq!(clip_against(velocity, normals::UP), velocity);
    }

    #[test]
    fn test_clip_velocity_over_set() {
        let mut contacts = ContactSet::new();
        contacts.push(normals::UP);
        contacts.push(normals::NEG_X);

        let clipped = clip_velocity(Vec3::new(4.0, -2.0, 1.0), &contacts);
        assert_eq!(clipped, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(clip_velocity(clipped, &contacts), clipped);
    }
}

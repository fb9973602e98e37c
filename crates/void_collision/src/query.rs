//! Physics queries consumed by gameplay systems

use crate::aabb::Aabb;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Distance short of a segment's end point ignored by
/// [`PhysicsQuery::segment_clear`]
pub const SEGMENT_END_TOLERANCE: f32 = 0.01;

/// Result of a raycast query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaycastHit {
    /// Hit point in world space
    pub point: Vec3,
    /// Surface normal at hit point
    pub normal: Vec3,
    /// Distance from ray origin
    pub distance: f32,
    /// Body that was hit (`None` = ground plane)
    pub body: Option<usize>,
    /// Voxel cell of the hit body, for destructible geometry
    pub voxel_cell: Option<u32>,
}

/// Result of an AABB penetration test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionHit {
    /// Push-out direction, pointing out of the obstacle
    pub normal: Vec3,
    /// Penetration depth (>= 0)
    pub depth: f32,
    /// Body that was hit (`None` = ground plane)
    pub body: Option<usize>,
    /// Voxel cell of the hit body, for destructible geometry
    pub voxel_cell: Option<u32>,
}

/// Collision queries against static scene geometry.
///
/// Implemented by whatever physics layer the host runs. Both queries are
/// read-only and must be cheap enough to call several times per agent per
/// tick.
pub trait PhysicsQuery {
    /// Nearest hit along `direction` within `max_distance`.
    ///
    /// `direction` need not be normalized; distances are measured in world
    /// units along the normalized direction.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit>;

    /// Deepest penetration of `aabb` into static geometry, ignoring the body
    /// with index `exclude`.
    fn test_aabb(&self, aabb: &Aabb, exclude: Option<usize>) -> Option<CollisionHit>;

    /// Whether the straight segment from `from` to `to` is unobstructed.
    ///
    /// The last [`SEGMENT_END_TOLERANCE`] of the segment is not tested, so
    /// a point lying on a surface (an impact on a wall, a sound on the
    /// ground) is not hidden by that surface.
    fn segment_clear(&self, from: Vec3, to: Vec3) -> bool {
        let delta = to - from;
        let length = delta.length();
        if length <= SEGMENT_END_TOLERANCE {
            return true;
        }
        self.raycast(from, delta / length, length - SEGMENT_END_TOLERANCE).is_none()
    }
}

impl<T: PhysicsQuery + ?Sized> PhysicsQuery for &T {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        (**self).raycast(origin, direction, max_distance)
    }

    fn test_aabb(&self, aabb: &Aabb, exclude: Option<usize>) -> Option<CollisionHit> {
        (**self).test_aabb(aabb, exclude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A single infinite wall at x = 5
    struct WallAtFive;

    impl PhysicsQuery for WallAtFive {
        fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
            let dir = direction.normalize_or_zero();
            if dir.x <= 0.0 || origin.x >= 5.0 {
                return None;
            }
            let distance = (5.0 - origin.x) / dir.x;
            (distance <= max_distance).then(|| RaycastHit {
                point: origin + dir * distance,
                normal: Vec3::NEG_X,
                distance,
                body: Some(0),
                voxel_cell: None,
            })
        }

        fn test_aabb(&self, _aabb: &Aabb, _exclude: Option<usize>) -> Option<CollisionHit> {
            None
        }
    }

    #[test]
    fn test_segment_clear() {
        let wall = WallAtFive;
        assert!(wall.segment_clear(Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)));
        assert!(!wall.segment_clear(Vec3::ZERO, Vec3::new(6.0, 0.0, 0.0)));
        assert!(wall.segment_clear(Vec3::ONE, Vec3::ONE));
    }

    #[test]
    fn test_segment_ending_on_surface_is_clear() {
        let wall = WallAtFive;
        assert!(wall.segment_clear(Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0)));
        assert!(wall.segment_clear(Vec3::new(0.0, 4.0, 0.0), Vec3::new(5.0, 3.0, 0.0)));
        assert!(!wall.segment_clear(Vec3::ZERO, Vec3::new(5.02, 0.0, 0.0)));
    }

    #[test]
    fn test_reference_forwarding() {
        let wall = WallAtFive;
        let by_ref: &dyn PhysicsQuery = &wall;
        assert!(by_ref.raycast(Vec3::ZERO, Vec3::X, 10.0).is_some());
    }
}

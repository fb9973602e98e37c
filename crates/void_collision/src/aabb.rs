//! Axis-aligned bounding boxes

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create from corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create from center and half-extents
    pub fn from_center_half(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Create from the bottom-center point and full width/height/depth
    pub fn from_bottom(bottom_center: Vec3, width: f32, height: f32, depth: f32) -> Self {
        let hw = width * 0.5;
        let hd = depth * 0.5;
        Self {
            min: Vec3::new(bottom_center.x - hw, bottom_center.y, bottom_center.z - hd),
            max: Vec3::new(bottom_center.x + hw, bottom_center.y + height, bottom_center.z + hd),
        }
    }

    /// Smallest box containing every point
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Self { min, max })
    }

    /// Center point
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half-extents
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Full size
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Whether min <= max on every axis
    pub fn is_valid(&self) -> bool {
        self.min.cmple(self.max).all()
    }

    /// Strict overlap test (touching faces do not overlap)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Inclusive point containment
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Translate by an offset
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Slab test. Returns the entry distance and the entry face normal.
    ///
    /// A ray starting inside the box reports distance 0 and a normal facing
    /// against the ray direction.
    pub fn ray_intersection(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<(f32, Vec3)> {
        let mut t_min = 0.0_f32;
        let mut t_max = max_distance;
        let mut normal = -direction.normalize_or_zero();

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let lo = self.min[axis];
            let hi = self.max[axis];

            if d.abs() < 1e-8 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            // Entering through the min face when moving along +axis
            let mut face = -1.0;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
                face = 1.0;
            }

            if t0 > t_min {
                t_min = t0;
                normal = Vec3::ZERO;
                normal[axis] = face;
            }
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some((t_min, normal))
    }

    /// Minimum translation that pushes `self` out of `other`.
    ///
    /// Returns the push direction (pointing out of `other`) and depth along the
    /// axis of least penetration, or `None` when the boxes do not overlap.
    pub fn penetration(&self, other: &Aabb) -> Option<(Vec3, f32)> {
        if !self.overlaps(other) {
            return None;
        }

        let self_center = self.center();
        let other_center = other.center();

        let mut best_depth = f32::MAX;
        let mut best_normal = Vec3::ZERO;

        for axis in 0..3 {
            let depth = (self.max[axis] - other.min[axis]).min(other.max[axis] - self.min[axis]);
            if depth < best_depth {
                best_depth = depth;
                best_normal = Vec3::ZERO;
                best_normal[axis] = if self_center[axis] < other_center[axis] { -1.0 } else { 1.0 };
            }
        }

        Some((best_normal, best_depth))
    }
}

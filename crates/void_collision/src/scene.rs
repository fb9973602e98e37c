//! Scene entities as static geometry

use crate::aabb::Aabb;
use glam::{EulerRot, Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// A placed level entity: a unit cube scaled, rotated and translated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneEntity {
    /// Display name
    pub name: String,
    /// World-space center
    pub position: Vec3,
    /// Euler angles in degrees (pitch X, yaw Y, roll Z)
    pub rotation: Vec3,
    /// Full size along each local axis
    pub scale: Vec3,
    /// Hidden entities are not part of the collision scene
    pub visible: bool,
    /// Decorative entities that never collide
    pub no_collision: bool,
    /// Pickups collide with nothing and do not block navigation
    pub pickup: bool,
}

impl Default for SceneEntity {
    fn default() -> Self {
        Self {
            name: String::from("Entity"),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            visible: true,
            no_collision: false,
            pickup: false,
        }
    }
}

impl SceneEntity {
    /// Create an axis-aligned box entity
    pub fn new_box(name: impl Into<String>, position: Vec3, scale: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            scale,
            ..Default::default()
        }
    }

    /// Set Euler rotation in degrees
    pub fn with_rotation(mut self, rotation_degrees: Vec3) -> Self {
        self.rotation = rotation_degrees;
        self
    }

    /// Mark as a pickup
    pub fn as_pickup(mut self) -> Self {
        self.pickup = true;
        self
    }

    /// Whether this entity takes part in collision and navigation
    pub fn is_solid(&self) -> bool {
        self.visible && !self.no_collision && !self.pickup
    }

    /// Whether any Euler angle is non-zero
    pub fn has_rotation(&self) -> bool {
        self.rotation != Vec3::ZERO
    }

    /// Local half-extents
    pub fn half_extents(&self) -> Vec3 {
        self.scale * 0.5
    }

    /// Local-to-world rotation: roll about Z, then pitch about X, then yaw about Y
    pub fn rotation_matrix(&self) -> Mat3 {
        Mat3::from_euler(
            EulerRot::YXZ,
            self.rotation.y.to_radians(),
            self.rotation.x.to_radians(),
            self.rotation.z.to_radians(),
        )
    }

    /// World-space bounding box, inflated to contain the rotated cube
    pub fn bounding_box(&self) -> Aabb {
        let half = self.half_extents();
        if !self.has_rotation() {
            return Aabb::from_center_half(self.position, half);
        }

        let rot = self.rotation_matrix();
        let world_half = rot.x_axis.abs() * half.x + rot.y_axis.abs() * half.y + rot.z_axis.abs() * half.z;
        Aabb::from_center_half(self.position, world_half)
    }
}

//! Collision world configuration

use serde::{Deserialize, Serialize};

/// Collision world configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionSettings {
    /// Y of the infinite ground plane
    pub ground_y: f32,

    /// Whether raycasts and box tests collide with the ground plane
    pub ground_enabled: bool,

    /// Default maximum distance for raycasts that pass `f32::INFINITY`
    pub max_ray_distance: f32,
}

impl Default for CollisionSettings {
    fn default() -> Self {
        Self {
            ground_y: 0.0,
            ground_enabled: false,
            max_ray_distance: 1000.0,
        }
    }
}

impl CollisionSettings {
    /// Enable the ground plane at the given height
    pub fn with_ground(mut self, ground_y: f32) -> Self {
        self.ground_y = ground_y;
        self.ground_enabled = true;
        self
    }

    /// Set the raycast distance cap
    pub fn with_max_ray_distance(mut self, distance: f32) -> Self {
        self.max_ray_distance = distance;
        self
    }
}

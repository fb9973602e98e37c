//! Collision world - static bodies and the queries over them

use crate::aabb::Aabb;
use crate::config::CollisionSettings;
use crate::error::{CollisionError, Result};
use crate::query::{CollisionHit, PhysicsQuery, RaycastHit};
use crate::scene::SceneEntity;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A static collider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticBody {
    /// World-space box
    pub aabb: Aabb,
    /// Scene entity this body was built from
    pub entity: Option<usize>,
    /// Voxel cell within the entity, for destructible geometry
    pub voxel_cell: Option<u32>,
    /// Disabled bodies are skipped by every query
    pub enabled: bool,
}

impl StaticBody {
    /// Create an enabled body with no entity association
    pub fn new(aabb: Aabb) -> Self {
        Self {
            aabb,
            entity: None,
            voxel_cell: None,
            enabled: true,
        }
    }

    /// Associate with a scene entity
    pub fn with_entity(mut self, entity: usize) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Associate with a voxel cell
    pub fn with_voxel_cell(mut self, cell: u32) -> Self {
        self.voxel_cell = Some(cell);
        self
    }
}

/// Static collision scene answering [`PhysicsQuery`] requests
#[derive(Debug, Clone, Default)]
pub struct CollisionWorld {
    /// Configuration
    settings: CollisionSettings,
    /// Static bodies
    bodies: Vec<StaticBody>,
}

impl CollisionWorld {
    /// Create an empty world
    pub fn new(settings: CollisionSettings) -> Self {
        Self {
            settings,
            bodies: Vec::new(),
        }
    }

    /// Get the configuration
    pub fn settings(&self) -> &CollisionSettings {
        &self.settings
    }

    /// Get mutable configuration
    pub fn settings_mut(&mut self) -> &mut CollisionSettings {
        &mut self.settings
    }

    // ==================== Bodies ====================

    /// Add a body and return its index
    pub fn add_body(&mut self, body: StaticBody) -> usize {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    /// Add an axis-aligned box given center and half-extents
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3) -> Result<usize> {
        let aabb = Aabb::from_center_half(center, half_extents);
        if !aabb.is_valid() {
            return Err(CollisionError::InvalidShape(format!(
                "negative half-extents {half_extents:?}"
            )));
        }
        Ok(self.add_body(StaticBody::new(aabb)))
    }

    /// Remove a body. Indices of later bodies shift down by one.
    pub fn remove_body(&mut self, index: usize) -> Result<StaticBody> {
        if index >= self.bodies.len() {
            return Err(CollisionError::BodyNotFound(index));
        }
        Ok(self.bodies.remove(index))
    }

    /// Get a body
    pub fn body(&self, index: usize) -> Result<&StaticBody> {
        self.bodies.get(index).ok_or(CollisionError::BodyNotFound(index))
    }

    /// Enable or disable a body
    pub fn set_body_enabled(&mut self, index: usize, enabled: bool) -> Result<()> {
        let body = self
            .bodies
            .get_mut(index)
            .ok_or(CollisionError::BodyNotFound(index))?;
        body.enabled = enabled;
        Ok(())
    }

    /// All bodies
    pub fn bodies(&self) -> &[StaticBody] {
        &self.bodies
    }

    /// Number of bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Remove every body
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    /// Replace all bodies with one box per solid scene entity.
    ///
    /// Rotated entities contribute their rotated bounding box.
    pub fn rebuild_static_colliders(&mut self, entities: &[SceneEntity]) {
        self.bodies.clear();
        for (index, entity) in entities.iter().enumerate() {
            if !entity.is_solid() {
                continue;
            }
            self.bodies
                .push(StaticBody::new(entity.bounding_box()).with_entity(index));
        }
        log::debug!(
            "Collision world rebuilt: {} bodies from {} entities",
            self.bodies.len(),
            entities.len()
        );
    }

    // ==================== Queries ====================

    fn ground_raycast(&self, origin: Vec3, dir: Vec3, max_distance: f32) -> Option<RaycastHit> {
        if !self.settings.ground_enabled || dir.y >= 0.0 || origin.y < self.settings.ground_y {
            return None;
        }
        let distance = (self.settings.ground_y - origin.y) / dir.y;
        (distance <= max_distance).then(|| RaycastHit {
            point: origin + dir * distance,
            normal: Vec3::Y,
            distance,
            body: None,
            voxel_cell: None,
        })
    }

    fn ground_test(&self, aabb: &Aabb) -> Option<CollisionHit> {
        if !self.settings.ground_enabled || aabb.min.y >= self.settings.ground_y {
            return None;
        }
        Some(CollisionHit {
            normal: Vec3::Y,
            depth: self.settings.ground_y - aabb.min.y,
            body: None,
            voxel_cell: None,
        })
    }
}

impl PhysicsQuery for CollisionWorld {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }
        let max_distance = max_distance.min(self.settings.max_ray_distance);

        let mut nearest = self.ground_raycast(origin, dir, max_distance);

        for (index, body) in self.bodies.iter().enumerate() {
            if !body.enabled {
                continue;
            }
            let limit = nearest.map_or(max_distance, |hit| hit.distance);
            if let Some((distance, normal)) = body.aabb.ray_intersection(origin, dir, limit) {
                nearest = Some(RaycastHit {
                    point: origin + dir * distance,
                    normal,
                    distance,
                    body: Some(index),
                    voxel_cell: body.voxel_cell,
                });
            }
        }

        nearest
    }

    fn test_aabb(&self, aabb: &Aabb, exclude: Option<usize>) -> Option<CollisionHit> {
        let mut deepest = self.ground_test(aabb);

        for (index, body) in self.bodies.iter().enumerate() {
            if !body.enabled || exclude == Some(index) {
                continue;
            }
            if let Some((normal, depth)) = aabb.penetration(&body.aabb) {
                if deepest.map_or(true, |hit| depth > hit.depth) {
                    deepest = Some(CollisionHit {
                        normal,
                        depth,
                        body: Some(index),
                        voxel_cell: body.voxel_cell,
                    });
                }
            }
        }

        deepest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn wall_world() -> CollisionWorld {
        let mut world = CollisionWorld::new(CollisionSettings::default());
        world
            .add_box(Vec3::new(5.0, 1.0, 0.0), Vec3::new(0.5, 1.0, 5.0))
            .unwrap();
        world
    }

    #[test]
    fn test_raycast_hits_wall() {
        let world = wall_world();
        let hit = world.raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 100.0).unwrap();
        assert_relative_eq!(hit.distance, 4.5);
        assert_eq!(hit.normal, Vec3::NEG_X);
        assert_eq!(hit.body, Some(0));
    }

    #[test]
    fn test_raycast_over_wall_misses() {
        let world = wall_world();
        assert!(world.raycast(Vec3::new(0.0, 3.0, 0.0), Vec3::X, 100.0).is_none());
    }

    #[test]
    fn test_raycast_nearest_of_two() {
        let mut world = wall_world();
        world
            .add_box(Vec3::new(2.0, 1.0, 0.0), Vec3::new(0.5, 1.0, 0.5))
            .unwrap();
        let hit = world.raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 100.0).unwrap();
        assert_eq!(hit.body, Some(1));
        assert_relative_eq!(hit.distance, 1.5);
    }

    #[test]
    fn test_ground_plane() {
        let world = CollisionWorld::new(CollisionSettings::default().with_ground(0.0));
        let hit = world.raycast(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y, 10.0).unwrap();
        assert_relative_eq!(hit.distance, 2.0);
        assert!(hit.body.is_none());

        let sunk = Aabb::from_center_half(Vec3::new(0.0, 0.25, 0.0), Vec3::splat(0.5));
        let hit = world.test_aabb(&sunk, None).unwrap();
        assert_eq!(hit.normal, Vec3::Y);
        assert_relative_eq!(hit.depth, 0.25);
    }

    #[test]
    fn test_aabb_push_out_and_exclude() {
        let world = wall_world();
        let agent = Aabb::from_center_half(Vec3::new(4.4, 1.0, 0.0), Vec3::splat(0.4));
        let hit = world.test_aabb(&agent, None).unwrap();
        assert_eq!(hit.normal, Vec3::NEG_X);
        assert_relative_eq!(hit.depth, 0.3, epsilon = 1e-5);

        assert!(world.test_aabb(&agent, Some(0)).is_none());
    }

    #[test]
    fn test_disabled_body_ignored() {
        let mut world = wall_world();
        world.set_body_enabled(0, false).unwrap();
        assert!(world.raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 100.0).is_none());
    }

    #[test]
    fn test_remove_missing_body() {
        let mut world = wall_world();
        assert!(matches!(world.remove_body(3), Err(CollisionError::BodyNotFound(3))));
        assert!(world.remove_body(0).is_ok());
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_rebuild_skips_non_solid() {
        let mut world = CollisionWorld::new(CollisionSettings::default());
        let entities = vec![
            SceneEntity::new_box("wall", Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 2.0, 8.0)),
            SceneEntity::new_box("ammo", Vec3::new(3.0, 0.5, 0.0), Vec3::ONE).as_pickup(),
            SceneEntity {
                no_collision: true,
                ..SceneEntity::new_box("decal", Vec3::ZERO, Vec3::ONE)
            },
        ];
        world.rebuild_static_colliders(&entities);
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.body(0).unwrap().entity, Some(0));
    }
}

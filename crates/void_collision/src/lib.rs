//! Void Collision - Static Collision Queries
//!
//! This crate provides the collision queries gameplay systems (AI, pickups,
//! character controllers) consume from the physics layer.
//!
//! # Features
//!
//! - `PhysicsQuery` trait: raycasts and AABB penetration tests
//! - Axis-aligned boxes with center/bottom constructors
//! - Scene entities as the static-geometry description
//! - `CollisionWorld`: a reference implementation over static AABB bodies
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │              CollisionWorld               │
//! │  ┌──────────────┐  ┌──────────────────┐  │
//! │  │ StaticBody[] │  │ ground plane (Y) │  │
//! │  └──────────────┘  └──────────────────┘  │
//! └──────────────────────────────────────────┘
//!                     │ impl
//!                     ▼
//!              ┌─────────────┐
//!              │ PhysicsQuery│ ◄── void_tactics
//!              └─────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use void_collision::prelude::*;
//!
//! let mut world = CollisionWorld::new(CollisionSettings::default());
//! world.add_body(StaticBody::new(Aabb::from_center_half(
//!     Vec3::new(5.0, 1.0, 0.0),
//!     Vec3::new(0.5, 1.0, 4.0),
//! )));
//!
//! let hit = world.raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 100.0);
//! assert!(hit.is_some());
//! ```

pub mod aabb;
pub mod config;
pub mod error;
pub mod query;
pub mod scene;
pub mod world;

pub use glam::Vec3;

pub mod prelude {
    //! Common imports for collision functionality
    pub use crate::aabb::Aabb;
    pub use crate::config::CollisionSettings;
    pub use crate::error::{CollisionError, Result};
    pub use crate::query::{CollisionHit, PhysicsQuery, RaycastHit, SEGMENT_END_TOLERANCE};
    pub use crate::scene::SceneEntity;
    pub use crate::world::{CollisionWorld, StaticBody};
    pub use glam::Vec3;
}

pub use prelude::*;

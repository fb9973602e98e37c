//! Void Tactics - Combatant AI and Grid Navigation
//!
//! This crate drives non-player combatants for the Void Engine: walking
//! soldiers that patrol, hunt, investigate noises and hide behind cover,
//! and quad-rotor drones that orbit, chase and fall out of the sky when
//! shot apart.
//!
//! # Features
//!
//! - 2D navigation grid with A*, path smoothing and grid line-of-sight
//! - Seven-state behaviour machine shared by soldiers and drones
//! - Cover search scored on the grid and confirmed with physics rays
//! - Prioritized sound events with occlusion
//! - Soft separation and AABB push-out against static geometry
//! - Drone altitude spring, banking, rotor damage and crashes
//! - Debug line output for any renderer
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                     AiSystem                      │
//! │  ┌──────────┐  ┌──────────┐  ┌─────────────────┐  │
//! │  │ Agent[]  │  │ SoundBus │  │ StdRng (seeded) │  │
//! │  └──────────┘  └──────────┘  └─────────────────┘  │
//! └──────────────────────────────────────────────────┘
//!        │ per tick
//!        ▼
//!  perception ──► state machine / drone ──► steering
//!        │               │                     │
//!        ▼               ▼                     ▼
//!     NavGrid      CoverFinder        PhysicsQuery (void_collision)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use void_tactics::prelude::*;
//!
//! let grid = NavGrid::new(64, 64, 1.0, -32.0, -32.0, 0.0)?;
//! let mut ai = AiSystem::with_seed(7);
//!
//! let guard = ai.add_agent("Guard", Vec3::new(0.5, 0.0, 0.5));
//! ai.add_patrol_point(guard, Vec3::new(10.5, 0.0, 0.5));
//! ai.add_patrol_point(guard, Vec3::new(10.5, 0.0, 10.5));
//!
//! // Each frame
//! ai.post_gunshot(player_pos, SoundSource::Player);
//! for event in ai.update(1.0 / 60.0, &grid, player_pos, Some(&world)) {
//!     if let AiEvent::DroneExploded { position, .. } = event {
//!         spawn_explosion(position);
//!     }
//! }
//! ```

pub mod agent;
pub mod config;
pub mod cover;
pub mod debug;
pub mod drone;
pub mod error;
pub mod navigation;
pub mod perception;
pub mod sound;
pub mod state_machine;
pub mod steering;
pub mod system;

pub use glam::Vec3;

pub mod prelude {
    //! Common imports for tactics AI
    pub use crate::agent::{Agent, AgentId, AgentKind, AgentState, CoverRecord, DroneState, Rotor};
    pub use crate::config::{AgentSettings, AiConfig, GridConfig, PatrolMode};
    pub use crate::cover::{CoverCandidate, CoverFinder};
    pub use crate::debug::{Color, DebugLine, DebugSink, LineBuffer};
    pub use crate::error::{AiError, Result};
    pub use crate::navigation::{NavCell, NavCoord, NavGrid};
    pub use crate::sound::{SoundBus, SoundEvent, SoundKind, SoundSource};
    pub use crate::system::{AiEvent, AiSystem};
    pub use glam::Vec3;
}

pub use prelude::*;

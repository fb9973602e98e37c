//! Per-tick sound event queue
//!
//! Weapons and footsteps post events between ticks; every agent observes the
//! whole queue during `AiSystem::update`, which empties it on return.

use crate::agent::AgentId;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Default propagation radius of a gunshot
pub const GUNSHOT_RADIUS: f32 = 50.0;
/// Default propagation radius of a footstep
pub const FOOTSTEP_RADIUS: f32 = 10.0;
/// Default propagation radius of a bullet impact
pub const IMPACT_RADIUS: f32 = 20.0;

/// What made the noise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundKind {
    Footstep,
    Gunshot,
    BulletImpact,
}

impl SoundKind {
    /// Base priority when several sounds compete for attention
    pub fn priority(self) -> f32 {
        match self {
            Self::Gunshot => 3.0,
            Self::BulletImpact => 2.0,
            Self::Footstep => 1.0,
        }
    }
}

/// Who made the noise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SoundSource {
    #[default]
    Player,
    Agent(AgentId),
}

/// A noise heard for exactly one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundEvent {
    pub position: Vec3,
    /// Propagation radius; caps every listener's hearing range
    pub radius: f32,
    pub kind: SoundKind,
    pub source: SoundSource,
}

impl SoundEvent {
    pub fn new(position: Vec3, radius: f32, kind: SoundKind, source: SoundSource) -> Self {
        Self {
            position,
            radius,
            kind,
            source,
        }
    }
}

/// Append-only queue drained once per tick
#[derive(Debug, Clone, Default)]
pub struct SoundBus {
    events: Vec<SoundEvent>,
}

impl SoundBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an arbitrary event
    pub fn post_sound_event(&mut self, event: SoundEvent) {
        self.events.push(event);
    }

    /// Queue a gunshot
    pub fn post_gunshot(&mut self, position: Vec3, source: SoundSource) {
        self.post_sound_event(SoundEvent::new(position, GUNSHOT_RADIUS, SoundKind::Gunshot, source));
    }

    /// Queue a footstep
    pub fn post_footstep(&mut self, position: Vec3, source: SoundSource) {
        self.post_sound_event(SoundEvent::new(position, FOOTSTEP_RADIUS, SoundKind::Footstep, source));
    }

    /// Queue a bullet impact; impacts have no meaningful source
    pub fn post_bullet_impact(&mut self, position: Vec3) {
        self.post_sound_event(SoundEvent::new(
            position,
            IMPACT_RADIUS,
            SoundKind::BulletImpact,
            SoundSource::Player,
        ));
    }

    /// Events posted since the last clear, in posting order
    pub fn events(&self) -> &[SoundEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop every event, keeping the allocation
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

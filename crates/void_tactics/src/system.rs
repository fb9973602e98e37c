//! AI system
//!
//! [`AiSystem`] owns every agent, the sound bus and the random generator.
//! The host calls [`AiSystem::update`] once per tick with the navigation
//! grid, the player position and an optional physics world:
//!
//! 1. Sounds posted since the last tick are taken off the bus.
//! 2. Each active agent runs its behaviour tick (ground or drone).
//! 3. Agents are separated, then pushed out of static geometry.
//! 4. Walkers are pinned to the grid floor.
//!
//! Everything is single threaded and completes synchronously.

use crate::agent::{Agent, AgentId, AgentKind, AgentState};
use crate::config::{AgentSettings, AiConfig};
use crate::debug::{Color, DebugSink};
use crate::drone::update_drone;
use crate::error::{AiError, Result};
use crate::navigation::NavGrid;
use crate::perception::{flat_distance, EYE_HEIGHT};
use crate::sound::{SoundBus, SoundEvent, SoundSource};
use crate::state_machine::{update_ground, TickContext};
use crate::steering;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use void_collision::PhysicsQuery;

/// Something that happened during a tick and may interest the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AiEvent {
    /// An agent changed behaviour state
    StateChanged {
        agent: AgentId,
        from: AgentState,
        to: AgentState,
    },
    /// A crashing drone hit the ground; the host spawns the explosion
    DroneExploded { agent: AgentId, position: Vec3 },
}

/// Owner of all agents and the per-tick pipeline
pub struct AiSystem {
    agents: Vec<Agent>,
    next_id: u32,
    name_counter: u32,
    rng: StdRng,
    sounds: SoundBus,
    ground_defaults: AgentSettings,
    drone_defaults: AgentSettings,
    /// Draw agent debug primitives
    pub show_debug: bool,
}

impl Default for AiSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl AiSystem {
    /// Create a system with default settings and seed
    pub fn new() -> Self {
        Self::from_config(&AiConfig::default())
    }

    /// Create a system with default settings and a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self::from_config(&AiConfig {
            seed,
            ..AiConfig::default()
        })
    }

    /// Create a system whose new agents use the configured defaults
    pub fn from_config(config: &AiConfig) -> Self {
        Self {
            agents: Vec::new(),
            next_id: 1,
            name_counter: 0,
            rng: StdRng::seed_from_u64(config.seed),
            sounds: SoundBus::new(),
            ground_defaults: config.ground.clone(),
            drone_defaults: config.drone.clone(),
            show_debug: config.show_debug,
        }
    }

    /// Reset to an empty system, keeping settings and generator
    pub fn init(&mut self) {
        self.agents.clear();
        self.sounds.clear();
        self.name_counter = 0;
        log::info!("AI system initialized");
    }

    /// Drop every agent and pending sound
    pub fn shutdown(&mut self) {
        log::info!("AI system shutdown ({} agents)", self.agents.len());
        self.agents.clear();
        self.sounds.clear();
    }

    // ==================== Agents ====================

    /// Add a ground agent with the default ground settings
    pub fn add_agent(&mut self, name: &str, position: Vec3) -> AgentId {
        let settings = self.ground_defaults.clone();
        self.insert_agent(name, AgentKind::Ground, position, settings)
    }

    /// Add a drone with the default drone settings
    pub fn add_drone(&mut self, name: &str, position: Vec3) -> AgentId {
        let settings = self.drone_defaults.clone();
        self.insert_agent(name, AgentKind::Drone, position, settings)
    }

    /// Add an agent with explicit settings, rejecting unusable tunables.
    ///
    /// An empty name becomes `Agent_<n>`.
    pub fn add_agent_with(
        &mut self,
        name: &str,
        kind: AgentKind,
        position: Vec3,
        settings: AgentSettings,
    ) -> Result<AgentId> {
        settings.validate()?;
        Ok(self.insert_agent(name, kind, position, settings))
    }

    fn insert_agent(&mut self, name: &str, kind: AgentKind, position: Vec3, settings: AgentSettings) -> AgentId {
        let name = if name.is_empty() {
            let generated = format!("Agent_{}", self.name_counter);
            self.name_counter += 1;
            generated
        } else {
            name.to_string()
        };

        let id = AgentId(self.next_id);
        self.next_id += 1;
        log::info!("Added {:?} agent {} {} at {:?}", kind, name, id, position);
        self.agents.push(Agent::new(id, name, kind, position, settings));
        id
    }

    /// Remove an agent; unknown ids are ignored
    pub fn remove_agent(&mut self, id: AgentId) {
        if let Some(index) = self.index_of(id) {
            let agent = self.agents.remove(index);
            log::info!("Removed agent {} {}", agent.name, id);
        }
    }

    pub fn add_patrol_point(&mut self, id: AgentId, point: Vec3) {
        match self.agent_mut(id) {
            Some(agent) => agent.patrol_points.push(point),
            None => log::warn!("add_patrol_point: no agent {}", id),
        }
    }

    pub fn clear_patrol_points(&mut self, id: AgentId) {
        match self.agent_mut(id) {
            Some(agent) => {
                agent.patrol_points.clear();
                agent.patrol_index = 0;
                agent.patrol_direction = 1;
            }
            None => log::warn!("clear_patrol_points: no agent {}", id),
        }
    }

    fn index_of(&self, id: AgentId) -> Option<usize> {
        self.agents.iter().position(|a| a.id == id)
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id == id)
    }

    /// Checked lookup
    pub fn try_agent(&self, id: AgentId) -> Result<&Agent> {
        self.agent(id).ok_or(AiError::AgentNotFound(id))
    }

    /// Checked mutable lookup
    pub fn try_agent_mut(&mut self, id: AgentId) -> Result<&mut Agent> {
        self.agent_mut(id).ok_or(AiError::AgentNotFound(id))
    }

    /// All agents in registration order
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    // ==================== Sounds ====================

    pub fn post_sound_event(&mut self, event: SoundEvent) {
        self.sounds.post_sound_event(event);
    }

    pub fn post_gunshot(&mut self, position: Vec3, source: SoundSource) {
        self.sounds.post_gunshot(position, source);
    }

    pub fn post_footstep(&mut self, position: Vec3, source: SoundSource) {
        self.sounds.post_footstep(position, source);
    }

    pub fn post_bullet_impact(&mut self, position: Vec3) {
        self.sounds.post_bullet_impact(position);
    }

    /// Sounds waiting for the next tick
    pub fn sound_bus(&self) -> &SoundBus {
        &self.sounds
    }

    // ==================== Damage ====================

    /// Damage an agent; returns `true` if the hit killed it
    pub fn take_damage(&mut self, id: AgentId, amount: f32) -> bool {
        let Some(agent) = self.agent_mut(id) else {
            return false;
        };
        let killed = agent.take_damage(amount);
        if killed {
            log::info!("Agent {} {} killed", agent.name, id);
        }
        killed
    }

    /// Damage one drone rotor; returns `true` if the rotor was destroyed
    pub fn damage_rotor(&mut self, id: AgentId, rotor: usize, amount: f32) -> bool {
        self.agent_mut(id)
            .is_some_and(|agent| agent.damage_rotor(rotor, amount))
    }

    // ==================== Tick ====================

    /// Advance every active agent by `dt` seconds.
    ///
    /// Returns the events raised during the tick. The sound bus is empty
    /// afterwards.
    pub fn update(
        &mut self,
        dt: f32,
        grid: &NavGrid,
        player: Vec3,
        physics: Option<&dyn PhysicsQuery>,
    ) -> Vec<AiEvent> {
        let dt = dt.max(0.0);
        let sounds = std::mem::take(&mut self.sounds);
        let mut events = Vec::new();

        for agent in self.agents.iter_mut().filter(|a| a.active) {
            let mut ctx = TickContext {
                dt,
                grid,
                player,
                physics,
                sounds: sounds.events(),
                rng: &mut self.rng,
                events: &mut events,
            };
            match agent.kind {
                AgentKind::Ground => update_ground(&mut ctx, agent),
                AgentKind::Drone => update_drone(&mut ctx, agent),
            }
        }

        steering::apply_separation(&mut self.agents, dt);

        let ground_y = grid.ground_y();
        for agent in self.agents.iter_mut().filter(|a| a.active) {
            if let Some(physics) = physics {
                steering::resolve_collisions(agent, physics, ground_y);
            }
            if agent.kind == AgentKind::Ground {
                agent.position.y = ground_y;
                // Knocked out of the cover cell: walk back before holding again
                if agent.cover.in_cover && flat_distance(agent.position, agent.cover.position) >= grid.cell_size() {
                    agent.cover.in_cover = false;
                }
            }
        }

        self.sounds.clear();
        events
    }

    // ==================== Debug ====================

    /// Draw every visible agent, when `show_debug` is set
    pub fn debug_draw(&self, sink: &mut dyn DebugSink) {
        if !self.show_debug {
            return;
        }
        for agent in self.agents.iter().filter(|a| a.visible && a.alive) {
            draw_agent(sink, agent);
        }
    }
}

/// Marker color per state
pub fn state_color(state: AgentState) -> Color {
    match state {
        AgentState::Idle => Color::GRAY,
        AgentState::Patrol => Color::GREEN,
        AgentState::WaitAtWaypoint => Color::CYAN,
        AgentState::Investigate => Color::YELLOW,
        AgentState::Chase => Color::RED,
        AgentState::TakeCover => Color::BLUE,
        AgentState::Return => Color::ORANGE,
    }
}

fn draw_agent(sink: &mut dyn DebugSink, agent: &Agent) {
    let s = agent.settings.body_scale;
    let pos = agent.position;
    let base = Vec3::new(pos.x, pos.y + 0.05, pos.z);
    let body_color = if agent.damage_flash_timer > 0.0 {
        Color::WHITE
    } else {
        Color::rgba(0.7, 0.7, 0.7, 1.0)
    };

    // Body
    let body_center = match agent.kind {
        AgentKind::Ground => pos + Vec3::Y * (s * 0.5),
        AgentKind::Drone => pos,
    };
    let body_half = match agent.kind {
        AgentKind::Ground => Vec3::splat(s * 0.5),
        AgentKind::Drone => Vec3::new(s * 0.5, s * 0.25, s * 0.5),
    };
    sink.draw_box(body_center, body_half, body_color);

    // Facing
    let yaw = agent.yaw.to_radians();
    let forward = Vec3::new(yaw.sin(), 0.0, yaw.cos());
    let eye = match agent.kind {
        AgentKind::Ground => pos + Vec3::Y * EYE_HEIGHT,
        AgentKind::Drone => pos,
    };
    sink.draw_line(eye, eye + forward * 1.5, Color::WHITE);

    // State marker above the head
    let marker = body_center + Vec3::Y * (body_half.y + 0.4);
    sink.draw_sphere(marker, 0.15, state_color(agent.state), 6);

    sink.draw_circle(base, agent.settings.detect_range, Color::YELLOW.with_alpha(0.25), 32);

    // Remaining path
    let remaining = agent.remaining_path();
    if let Some(&first) = remaining.first() {
        let path_color = state_color(agent.state).with_alpha(0.6);
        let lift = |p: Vec3| Vec3::new(p.x, base.y, p.z);
        sink.draw_line(lift(pos), lift(first), path_color);
        for pair in remaining.windows(2) {
            sink.draw_line(lift(pair[0]), lift(pair[1]), path_color);
        }
    }

    // Patrol loop
    let points = &agent.patrol_points;
    if points.len() > 1 {
        let patrol_color = Color::GREEN.with_alpha(0.3);
        for pair in points.windows(2) {
            sink.draw_line(pair[0], pair[1], patrol_color);
        }
        if let (Some(&last), Some(&first)) = (points.last(), points.first()) {
            sink.draw_line(last, first, patrol_color);
        }
    }

    // Cover target and threat line
    if agent.state == AgentState::TakeCover {
        let cover = agent.cover.position;
        let color = if agent.cover.in_cover { Color::BLUE } else { Color::CYAN };
        sink.draw_box(cover + Vec3::Y * 0.1, Vec3::new(0.3, 0.1, 0.3), color);
        sink.draw_line(cover + Vec3::Y * EYE_HEIGHT, agent.cover.threat + Vec3::Y, Color::RED.with_alpha(0.5));
    }

    // Rotors: front-left, front-right, rear-left, rear-right
    if agent.kind == AgentKind::Drone {
        let right = Vec3::new(forward.z, 0.0, -forward.x);
        let offsets = [(-1.0, 1.0), (1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)];
        for (rotor, (side, front)) in agent.drone.rotors.iter().zip(offsets) {
            let at = pos + (right * side + forward * front) * (s * 0.5);
            let color = if rotor.alive {
                Color::GREEN.with_alpha(0.3 + 0.7 * rotor.spin)
            } else {
                Color::RED
            };
            sink.draw_circle(at, s * 0.25, color, 8);
        }
    }
}

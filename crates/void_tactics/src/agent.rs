//! Agent data model
//!
//! An [`Agent`] is a plain record: identity, pose, perception, per-state
//! timers, cover bookkeeping, combat status and drone flight state. Behaviour
//! lives in the state machine and drone controller modules, which dispatch on
//! [`AgentKind`] and [`AgentState`].

use crate::config::{AgentSettings, PatrolMode};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How long the damage flash lasts after a hit
pub const DAMAGE_FLASH_TIME: f32 = 0.15;
/// How long an agent counts as recently shot
pub const RECENTLY_SHOT_TIME: f32 = 1.0;
/// Health of a fresh rotor
pub const ROTOR_MAX_HEALTH: f32 = 50.0;

/// Stable agent handle; never reused within one `AiSystem`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which update routine and perception model apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AgentKind {
    #[default]
    Ground,
    Drone,
}

/// Behaviour state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AgentState {
    #[default]
    Idle,
    Patrol,
    WaitAtWaypoint,
    Investigate,
    Chase,
    TakeCover,
    Return,
}

impl AgentState {
    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Patrol => "Patrol",
            Self::WaitAtWaypoint => "WaitAtWaypoint",
            Self::Investigate => "Investigate",
            Self::Chase => "Chase",
            Self::TakeCover => "TakeCover",
            Self::Return => "Return",
        }
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cover bookkeeping, meaningful while in [`AgentState::TakeCover`]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CoverRecord {
    /// Cover cell center
    pub position: Vec3,
    /// Where the threat was when cover was chosen (updated by peeking)
    pub threat: Vec3,
    /// Yaw toward the threat when cover was reached
    pub threat_yaw: f32,
    /// Rises under fire, inhibits peeking
    pub suppression: f32,
    /// Reached the cover position
    pub in_cover: bool,
    /// Remaining stay time
    pub timer: f32,
    /// Accumulated time under fire while in cover
    pub damage_time: f32,
    /// Countdown to the next peek
    pub peek_timer: f32,
}

/// One drone rotor. Index layout: 0 front-left, 1 front-right,
/// 2 rear-left, 3 rear-right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotor {
    pub health: f32,
    pub alive: bool,
    /// Visual spin speed, 0..1
    pub spin: f32,
}

impl Default for Rotor {
    fn default() -> Self {
        Self {
            health: ROTOR_MAX_HEALTH,
            alive: true,
            spin: 1.0,
        }
    }
}

/// Flight state, meaningful only for [`AgentKind::Drone`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroneState {
    /// Degrees, positive nose down
    pub pitch: f32,
    /// Degrees, positive right wing down
    pub roll: f32,
    pub vertical_velocity: f32,
    /// Altitude above ground the spring tracks (without bob)
    pub target_altitude: f32,
    pub orbit_center: Vec3,
    /// Radians
    pub orbit_angle: f32,
    /// Smoothed horizontal speed
    pub speed_current: f32,
    pub bob_phase: f32,
    pub bob_offset: f32,
    pub rotors: [Rotor; 4],
    pub crashing: bool,
    pub crash_timer: f32,
    pub exploded: bool,
    /// Countdown to the next downwash burst
    pub downwash_timer: f32,
    /// Set on ticks where the downwash timer wrapped
    pub downwash_ready: bool,
}

impl DroneState {
    fn new(hover_height: f32) -> Self {
        Self {
            pitch: 0.0,
            roll: 0.0,
            vertical_velocity: 0.0,
            target_altitude: hover_height,
            orbit_center: Vec3::ZERO,
            orbit_angle: 0.0,
            speed_current: 0.0,
            bob_phase: 0.0,
            bob_offset: 0.0,
            rotors: [Rotor::default(); 4],
            crashing: false,
            crash_timer: 0.0,
            exploded: false,
            downwash_timer: 0.0,
            downwash_ready: false,
        }
    }

    /// Number of destroyed rotors
    pub fn dead_rotors(&self) -> usize {
        self.rotors.iter().filter(|r| !r.alive).count()
    }
}

/// A single combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    // ---- Identity ----
    pub id: AgentId,
    pub name: String,
    pub kind: AgentKind,
    pub home: Vec3,
    pub patrol_points: Vec<Vec3>,
    pub patrol_index: usize,
    /// +1 or -1, for ping-pong patrols
    pub patrol_direction: i32,

    // ---- Pose ----
    pub position: Vec3,
    /// Degrees; 0 faces +Z, 90 faces +X
    pub yaw: f32,

    // ---- Perception ----
    pub can_see_player: bool,
    pub los_timer: f32,
    /// XZ (ground) or 3D (drone) distance to the player this tick
    pub player_distance: f32,
    pub last_seen_player: Vec3,
    pub last_heard: Option<Vec3>,
    pub sound_alert_timer: f32,

    // ---- State ----
    pub state: AgentState,
    pub wait_timer: f32,
    pub look_timer: f32,
    pub look_target_yaw: f32,
    pub investigate_pos: Vec3,
    pub investigate_timer: f32,
    pub repath_timer: f32,
    pub path: Vec<Vec3>,
    pub path_index: usize,
    pub cover: CoverRecord,

    // ---- Combat ----
    pub health: f32,
    pub alive: bool,
    pub active: bool,
    pub visible: bool,
    pub recently_shot: bool,
    pub recently_shot_timer: f32,
    pub damage_flash_timer: f32,

    pub drone: DroneState,
    pub settings: AgentSettings,
}

impl Agent {
    /// Fresh agent in Idle at `position`
    pub fn new(id: AgentId, name: impl Into<String>, kind: AgentKind, position: Vec3, settings: AgentSettings) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            home: position,
            patrol_points: Vec::new(),
            patrol_index: 0,
            patrol_direction: 1,

            position,
            yaw: 0.0,

            can_see_player: false,
            los_timer: 0.0,
            player_distance: f32::MAX,
            last_seen_player: position,
            last_heard: None,
            sound_alert_timer: 0.0,

            state: AgentState::Idle,
            wait_timer: 0.0,
            look_timer: 0.0,
            look_target_yaw: 0.0,
            investigate_pos: position,
            investigate_timer: 0.0,
            repath_timer: 0.0,
            path: Vec::new(),
            path_index: 0,
            cover: CoverRecord::default(),

            health: settings.max_health,
            alive: true,
            active: true,
            visible: true,
            recently_shot: false,
            recently_shot_timer: 0.0,
            damage_flash_timer: 0.0,

            drone: DroneState::new(settings.drone_hover_height),
            settings,
        }
    }

    pub fn is_drone(&self) -> bool {
        self.kind == AgentKind::Drone
    }

    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }

    /// Patrol points to walk, or area roaming enabled
    pub fn has_patrol_data(&self) -> bool {
        !self.patrol_points.is_empty() || self.settings.patrol_mode == PatrolMode::AreaRoam
    }

    /// Player is close enough and seen
    pub fn can_detect_player(&self) -> bool {
        self.player_distance < self.settings.detect_range && self.can_see_player
    }

    // ==================== Path ====================

    /// Replace the current path and restart at its first point
    pub fn set_path(&mut self, path: Vec<Vec3>) {
        self.path = path;
        self.path_index = 0;
    }

    pub fn clear_path(&mut self) {
        self.path.clear();
        self.path_index = 0;
    }

    /// No waypoints left (also true for an empty path)
    pub fn path_exhausted(&self) -> bool {
        self.path_index >= self.path.len()
    }

    pub fn current_waypoint(&self) -> Option<Vec3> {
        self.path.get(self.path_index).copied()
    }

    /// Waypoints not yet reached
    pub fn remaining_path(&self) -> &[Vec3] {
        self.path.get(self.path_index..).unwrap_or(&[])
    }

    // ==================== Combat ====================

    /// Apply damage; returns `true` if this hit killed the agent.
    ///
    /// Dead agents ignore further damage.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.health -= amount;
        self.damage_flash_timer = DAMAGE_FLASH_TIME;
        self.recently_shot = true;
        self.recently_shot_timer = RECENTLY_SHOT_TIME;

        if self.health <= 0.0 {
            self.health = 0.0;
            self.alive = false;
            self.active = false;
            return true;
        }
        false
    }

    /// Damage one rotor; returns `true` if this hit destroyed it.
    ///
    /// Out-of-range indices and ground agents are ignored.
    pub fn damage_rotor(&mut self, rotor: usize, amount: f32) -> bool {
        if !self.alive || !self.is_drone() {
            return false;
        }
        let Some(r) = self.drone.rotors.get_mut(rotor) else {
            log::warn!("{}: rotor index {} out of range", self.name, rotor);
            return false;
        };
        if !r.alive {
            return false;
        }

        r.health -= amount;
        self.damage_flash_timer = DAMAGE_FLASH_TIME;
        self.recently_shot = true;
        self.recently_shot_timer = RECENTLY_SHOT_TIME;

        if r.health <= 0.0 {
            r.health = 0.0;
            r.alive = false;
            return true;
        }
        false
    }
}

//! Sight and hearing
//!
//! Sight is refreshed on a fixed cadence rather than every tick; hearing
//! picks at most one sound per tick by priority.

use crate::agent::{Agent, AgentKind, AgentState};
use crate::navigation::NavGrid;
use crate::sound::{SoundEvent, SoundKind, SoundSource};
use glam::Vec3;
use void_collision::PhysicsQuery;

/// Seconds between sight refreshes
pub const LOS_CHECK_INTERVAL: f32 = 0.15;
/// Eye height of a ground agent above its feet
pub const EYE_HEIGHT: f32 = 1.5;
/// Height of the player's torso above its feet
pub const TORSO_HEIGHT: f32 = 1.0;
/// Hearing cooldown after reacting to a sound
pub const SOUND_ALERT_COOLDOWN: f32 = 1.5;

/// Where the agent looks from
pub fn eye_position(agent: &Agent) -> Vec3 {
    match agent.kind {
        AgentKind::Ground => agent.position + Vec3::Y * EYE_HEIGHT,
        AgentKind::Drone => agent.position,
    }
}

/// Where agents aim at the player
pub fn torso_position(player: Vec3) -> Vec3 {
    player + Vec3::Y * TORSO_HEIGHT
}

/// Distance as the agent's kind measures it: XZ for ground, 3D for drones
pub fn perceived_distance(kind: AgentKind, from: Vec3, to: Vec3) -> f32 {
    match kind {
        AgentKind::Ground => flat_distance(from, to),
        AgentKind::Drone => from.distance(to),
    }
}

/// Distance ignoring Y
pub fn flat_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    (dx * dx + dz * dz).sqrt()
}

/// Yaw in degrees from `from` toward `to` (0 = +Z, 90 = +X)
pub fn yaw_toward(from: Vec3, to: Vec3) -> f32 {
    (to.x - from.x).atan2(to.z - from.z).to_degrees()
}

/// Wrap an angle in degrees into `[-180, 180]`
pub fn wrap_degrees(mut angle: f32) -> f32 {
    angle %= 360.0;
    if angle > 180.0 {
        angle -= 360.0;
    } else if angle < -180.0 {
        angle += 360.0;
    }
    angle
}

/// Count down the per-tick perception and combat timers
pub fn tick_timers(agent: &mut Agent, dt: f32) {
    agent.damage_flash_timer = (agent.damage_flash_timer - dt).max(0.0);
    agent.sound_alert_timer = (agent.sound_alert_timer - dt).max(0.0);
    agent.los_timer -= dt;
    if agent.recently_shot {
        agent.recently_shot_timer -= dt;
        if agent.recently_shot_timer <= 0.0 {
            agent.recently_shot = false;
            agent.recently_shot_timer = 0.0;
        }
    }
}

/// Update `player_distance` every tick and `can_see_player` when the LOS
/// timer has run out.
pub fn refresh_sight(agent: &mut Agent, player: Vec3, physics: Option<&dyn PhysicsQuery>) {
    agent.player_distance = perceived_distance(agent.kind, agent.position, player);

    if agent.los_timer <= 0.0 {
        agent.los_timer = LOS_CHECK_INTERVAL;
        agent.can_see_player = compute_visibility(agent, player, physics);
    }
    if agent.can_see_player {
        agent.last_seen_player = player;
    }
}

fn compute_visibility(agent: &Agent, player: Vec3, physics: Option<&dyn PhysicsQuery>) -> bool {
    let settings = &agent.settings;
    if agent.player_distance >= settings.lose_range {
        return false;
    }
    if agent.kind == AgentKind::Ground && !in_fov(agent.position, agent.yaw, player, settings.fov_angle) {
        return false;
    }
    if !settings.require_los {
        return true;
    }
    match physics {
        Some(physics) => physics.segment_clear(eye_position(agent), torso_position(player)),
        None => true,
    }
}

/// Whether `target` lies inside the horizontal view cone
pub fn in_fov(position: Vec3, yaw: f32, target: Vec3, fov_angle: f32) -> bool {
    if fov_angle >= 360.0 || flat_distance(position, target) < 1e-3 {
        return true;
    }
    let diff = wrap_degrees(yaw_toward(position, target) - yaw);
    diff.abs() <= fov_angle * 0.5
}

/// Hearing range for a kind of sound
pub fn hearing_range(agent: &Agent, kind: SoundKind) -> f32 {
    match kind {
        SoundKind::Footstep => agent.settings.hear_footstep_range,
        SoundKind::Gunshot => agent.settings.hear_gunshot_range,
        SoundKind::BulletImpact => agent.settings.hear_impact_range,
    }
}

/// Whether the agent is listening this tick
pub fn is_listening(agent: &Agent) -> bool {
    !matches!(agent.state, AgentState::Chase | AgentState::TakeCover) && agent.sound_alert_timer <= 0.0
}

/// Pick the loudest audible sound.
///
/// A sound is audible when it is not the agent's own, lies within
/// `min(hearing range, event radius)` and is not occluded: grid LOS for
/// ground agents, a clear physics segment for drones. Priority is the
/// kind's base priority plus `1 - dist / range`.
pub fn select_sound(
    agent: &Agent,
    events: &[SoundEvent],
    grid: &NavGrid,
    physics: Option<&dyn PhysicsQuery>,
) -> Option<SoundEvent> {
    let mut best: Option<(f32, SoundEvent)> = None;

    for event in events {
        if event.source == SoundSource::Agent(agent.id) {
            continue;
        }
        let range = hearing_range(agent, event.kind).min(event.radius);
        if range <= 0.0 {
            continue;
        }
        let dist = perceived_distance(agent.kind, agent.position, event.position);
        if dist > range {
            continue;
        }

        let audible = match agent.kind {
            AgentKind::Ground => grid.has_grid_los_world(agent.position, event.position),
            AgentKind::Drone => physics.map_or(true, |p| p.segment_clear(agent.position, event.position)),
        };
        if !audible {
            continue;
        }

        let priority = event.kind.priority() + (1.0 - dist / range);
        if best.map_or(true, |(p, _)| priority > p) {
            best = Some((priority, *event));
        }
    }

    if let Some((priority, event)) = best {
        log::trace!("{} heard {:?} at {:?} (priority {:.2})", agent.name, event.kind, event.position, priority);
    }
    best.map(|(_, event)| event)
}

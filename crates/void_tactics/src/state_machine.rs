//! Ground agent behaviour
//!
//! One call to [`update_ground`] runs a full tick for a walking agent:
//! perception, then at most one state transition, then movement. Every
//! "wait until" is a float timer counted down by `dt`.
//!
//! ```text
//!  Idle ──► Patrol ◄──► WaitAtWaypoint
//!   │         │               │
//!   └────┬────┴───────┬───────┘
//!        ▼            ▼
//!      Chase ◄──► Investigate ──► Return ──► Patrol / Idle
//!        ▲            ▲
//!        └─ TakeCover ┘
//! ```

use crate::agent::{Agent, AgentKind, AgentState};
use crate::config::PatrolMode;
use crate::cover::CoverFinder;
use crate::navigation::NavGrid;
use crate::perception::{self, flat_distance, wrap_degrees, yaw_toward, SOUND_ALERT_COOLDOWN};
use crate::sound::{SoundEvent, SoundKind};
use crate::system::AiEvent;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::Rng;
use std::f32::consts::TAU;
use void_collision::PhysicsQuery;

/// Turn rate while following a path
pub const MOVE_TURN_RATE: f32 = 360.0;
/// Turn rate while looking around at a waypoint
pub const WAIT_LOOK_RATE: f32 = 120.0;
/// Turn rate while searching an investigated spot
pub const INVESTIGATE_LOOK_RATE: f32 = 150.0;
/// Investigation time after a gunshot
pub const GUNSHOT_INVESTIGATE_TIME: f32 = 5.0;
/// Investigation time after any other lead
pub const INVESTIGATE_TIME: f32 = 3.0;

/// Everything a tick needs besides the agent itself
pub struct TickContext<'a> {
    pub dt: f32,
    pub grid: &'a NavGrid,
    pub player: Vec3,
    pub physics: Option<&'a dyn PhysicsQuery>,
    pub sounds: &'a [SoundEvent],
    pub rng: &'a mut StdRng,
    pub events: &'a mut Vec<AiEvent>,
}

// ==================== Transitions ====================

/// Switch state, recording the change
pub fn change_state(agent: &mut Agent, to: AgentState, events: &mut Vec<AiEvent>) {
    if agent.state == to {
        return;
    }
    let from = agent.state;
    log::debug!("{} {}: {} -> {}", agent.name, agent.id, from, to);
    agent.state = to;
    events.push(AiEvent::StateChanged {
        agent: agent.id,
        from,
        to,
    });
}

/// Straight-line path for drones, grid path for walkers
fn request_path(agent: &mut Agent, grid: &NavGrid, target: Vec3) {
    match agent.kind {
        AgentKind::Ground => agent.set_path(grid.find_path_world(agent.position, target, true)),
        AgentKind::Drone => agent.set_path(vec![target]),
    }
}

/// Random point within `radius` of `center` on the XZ plane
fn random_offset(rng: &mut StdRng, center: Vec3, radius: f32) -> Vec3 {
    let angle = rng.gen_range(0.0..TAU);
    let dist = radius * rng.gen::<f32>().sqrt();
    Vec3::new(center.x + angle.cos() * dist, center.y, center.z + angle.sin() * dist)
}

fn random_in(rng: &mut StdRng, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}

pub fn enter_chase(ctx: &mut TickContext, agent: &mut Agent) {
    change_state(agent, AgentState::Chase, ctx.events);
    agent.cover.in_cover = false;
    request_path(agent, ctx.grid, ctx.player);
    agent.repath_timer = agent.settings.chase_repath_interval;
}

/// Walk toward the current patrol point, or a fresh roam target
pub fn enter_patrol(ctx: &mut TickContext, agent: &mut Agent) {
    change_state(agent, AgentState::Patrol, ctx.events);
    if agent.settings.patrol_mode == PatrolMode::AreaRoam {
        let target = random_offset(ctx.rng, agent.home, agent.settings.area_roam_radius);
        request_path(agent, ctx.grid, target);
    } else if let Some(&point) = agent.patrol_points.get(agent.patrol_index) {
        request_path(agent, ctx.grid, point);
    } else {
        agent.clear_path();
    }
}

pub fn enter_wait(ctx: &mut TickContext, agent: &mut Agent) {
    change_state(agent, AgentState::WaitAtWaypoint, ctx.events);
    agent.wait_timer = random_in(ctx.rng, agent.settings.waypoint_wait_min, agent.settings.waypoint_wait_max);
    agent.look_timer = 0.0;
    agent.look_target_yaw = agent.yaw;
}

pub fn enter_investigate(ctx: &mut TickContext, agent: &mut Agent, target: Vec3, time: f32) {
    change_state(agent, AgentState::Investigate, ctx.events);
    agent.cover.in_cover = false;
    agent.investigate_pos = target;
    agent.investigate_timer = time;
    agent.look_timer = 0.0;
    agent.look_target_yaw = agent.yaw;
    request_path(agent, ctx.grid, target);
}

pub fn enter_return(ctx: &mut TickContext, agent: &mut Agent) {
    change_state(agent, AgentState::Return, ctx.events);
    agent.cover.in_cover = false;
    let home = agent.home;
    request_path(agent, ctx.grid, home);
}

/// Start (or restart) travelling to a cover position
pub fn enter_take_cover(ctx: &mut TickContext, agent: &mut Agent, cover: Vec3, threat: Vec3) {
    change_state(agent, AgentState::TakeCover, ctx.events);
    agent.cover.position = cover;
    agent.cover.threat = threat;
    agent.cover.in_cover = false;
    request_path(agent, ctx.grid, cover);
}

/// Patrol or roam when there is anything to walk, otherwise stand
pub fn enter_patrol_or_idle(ctx: &mut TickContext, agent: &mut Agent) {
    if agent.has_patrol_data() {
        enter_patrol(ctx, agent);
    } else {
        change_state(agent, AgentState::Idle, ctx.events);
        agent.clear_path();
    }
}

fn cover_finder(agent: &Agent) -> CoverFinder {
    CoverFinder::new(agent.settings.cover_search_radius, agent.settings.cover_min_dist)
}

/// Search for cover against `threat` and head there on success
fn try_take_cover(ctx: &mut TickContext, agent: &mut Agent, threat: Vec3) -> bool {
    match cover_finder(agent).find_cover(ctx.grid, ctx.physics, agent.position, threat) {
        Some(cover) => {
            enter_take_cover(ctx, agent, cover, threat);
            true
        }
        None => false,
    }
}

// ==================== Patrol ====================

/// Step the patrol index per the agent's patrol mode
pub fn advance_patrol_index(agent: &mut Agent, rng: &mut StdRng) {
    let n = agent.patrol_points.len();
    if n == 0 {
        agent.patrol_index = 0;
        return;
    }

    agent.patrol_index = match agent.settings.patrol_mode {
        PatrolMode::Loop => (agent.patrol_index + 1) % n,
        PatrolMode::PingPong => {
            if n == 1 {
                0
            } else {
                let next = agent.patrol_index as i32 + agent.patrol_direction;
                if next < 0 || next >= n as i32 {
                    agent.patrol_direction = -agent.patrol_direction;
                    (agent.patrol_index as i32 + agent.patrol_direction) as usize
                } else {
                    next as usize
                }
            }
        }
        PatrolMode::Random => rng.gen_range(0..n),
        // Roam targets are drawn on entering Patrol
        PatrolMode::AreaRoam => agent.patrol_index.min(n - 1),
    };
}

// ==================== Movement ====================

/// Turn toward `target_yaw` by at most `rate * dt` degrees
pub fn turn_toward_yaw(agent: &mut Agent, target_yaw: f32, rate: f32, dt: f32) {
    let diff = wrap_degrees(target_yaw - agent.yaw);
    let max_turn = rate * dt;
    if diff.abs() <= max_turn {
        agent.yaw = wrap_degrees(target_yaw);
    } else {
        agent.yaw = wrap_degrees(agent.yaw + max_turn.copysign(diff));
    }
}

/// Smoothly face a world point
pub fn face_toward(agent: &mut Agent, target: Vec3, dt: f32) {
    let dx = target.x - agent.position.x;
    let dz = target.z - agent.position.z;
    if dx.abs() < 1e-3 && dz.abs() < 1e-3 {
        return;
    }
    turn_toward_yaw(agent, yaw_toward(agent.position, target), MOVE_TURN_RATE, dt);
}

/// Step toward the current waypoint on the XZ plane.
///
/// Reaching a waypoint (within `waypoint_dist`) only advances the index;
/// the step never overshoots. With `face` the agent turns toward the
/// waypoint.
pub fn move_along_path(agent: &mut Agent, speed: f32, dt: f32, face: bool) {
    let Some(target) = agent.current_waypoint() else {
        return;
    };
    let dist = flat_distance(agent.position, target);
    if dist < agent.settings.waypoint_dist || dist <= f32::EPSILON {
        agent.path_index += 1;
        return;
    }

    if face {
        face_toward(agent, target, dt);
    }
    step_toward(agent, target, dist, speed * dt);
}

/// Move `step` along XZ toward `target`, `dist` away, without overshooting
fn step_toward(agent: &mut Agent, target: Vec3, dist: f32, step: f32) {
    let step = step.min(dist);
    agent.position.x += (target.x - agent.position.x) / dist * step;
    agent.position.z += (target.z - agent.position.z) / dist * step;
}

/// Random glances within `spread` degrees, a new one every 1-3 s
fn look_around(agent: &mut Agent, rng: &mut StdRng, spread: f32, rate: f32, dt: f32) {
    agent.look_timer -= dt;
    if agent.look_timer <= 0.0 {
        agent.look_target_yaw = agent.yaw + rng.gen_range(-spread..=spread);
        agent.look_timer = rng.gen_range(1.0..=3.0);
    }
    let target = agent.look_target_yaw;
    turn_toward_yaw(agent, target, rate, dt);
}

// ==================== Tick ====================

/// Full tick for a ground agent
pub fn update_ground(ctx: &mut TickContext, agent: &mut Agent) {
    perception::tick_timers(agent, ctx.dt);
    perception::refresh_sight(agent, ctx.player, ctx.physics);

    if hear(ctx, agent) {
        return;
    }

    if agent.recently_shot && agent.settings.seek_cover_on_damage && agent.state != AgentState::TakeCover {
        let threat = ctx.player;
        if try_take_cover(ctx, agent, threat) {
            agent.recently_shot = false;
            agent.recently_shot_timer = 0.0;
            return;
        }
    }

    match agent.state {
        AgentState::Idle => update_idle(ctx, agent),
        AgentState::Patrol => update_patrol(ctx, agent),
        AgentState::WaitAtWaypoint => update_wait(ctx, agent),
        AgentState::Investigate => update_investigate(ctx, agent),
        AgentState::Chase => update_chase(ctx, agent),
        AgentState::TakeCover => update_take_cover(ctx, agent),
        AgentState::Return => update_return(ctx, agent),
    }
}

/// React to the loudest audible sound; returns whether the state changed
pub fn hear(ctx: &mut TickContext, agent: &mut Agent) -> bool {
    if !perception::is_listening(agent) {
        return false;
    }
    let Some(sound) = perception::select_sound(agent, ctx.sounds, ctx.grid, ctx.physics) else {
        return false;
    };

    agent.last_heard = Some(sound.position);
    agent.sound_alert_timer = SOUND_ALERT_COOLDOWN;

    if sound.kind == SoundKind::Gunshot
        && agent.kind == AgentKind::Ground
        && agent.settings.seek_cover_on_gunfire
        && try_take_cover(ctx, agent, sound.position)
    {
        return true;
    }

    let time = if sound.kind == SoundKind::Gunshot {
        GUNSHOT_INVESTIGATE_TIME
    } else {
        INVESTIGATE_TIME
    };
    enter_investigate(ctx, agent, sound.position, time);
    true
}

fn update_idle(ctx: &mut TickContext, agent: &mut Agent) {
    if agent.can_detect_player() {
        enter_chase(ctx, agent);
    } else if agent.has_patrol_data() {
        enter_patrol(ctx, agent);
    }
}

fn update_patrol(ctx: &mut TickContext, agent: &mut Agent) {
    if agent.can_detect_player() {
        enter_chase(ctx, agent);
    } else if agent.path_exhausted() {
        enter_wait(ctx, agent);
    } else {
        let speed = agent.settings.move_speed;
        move_along_path(agent, speed, ctx.dt, true);
    }
}

fn update_wait(ctx: &mut TickContext, agent: &mut Agent) {
    if agent.can_detect_player() {
        enter_chase(ctx, agent);
        return;
    }

    if agent.settings.look_around_at_wait {
        look_around(agent, ctx.rng, 90.0, WAIT_LOOK_RATE, ctx.dt);
    }

    agent.wait_timer -= ctx.dt;
    if agent.wait_timer <= 0.0 {
        advance_patrol_index(agent, ctx.rng);
        enter_patrol_or_idle(ctx, agent);
    }
}

fn update_investigate(ctx: &mut TickContext, agent: &mut Agent) {
    if agent.can_detect_player() {
        enter_chase(ctx, agent);
        return;
    }

    if agent.path_exhausted() {
        look_around(agent, ctx.rng, 120.0, INVESTIGATE_LOOK_RATE, ctx.dt);
        agent.investigate_timer -= ctx.dt;
        if agent.investigate_timer <= 0.0 {
            if agent.has_patrol_data() {
                enter_patrol(ctx, agent);
            } else {
                enter_return(ctx, agent);
            }
        }
    } else {
        let speed = agent.settings.move_speed;
        move_along_path(agent, speed, ctx.dt, true);
    }
}

fn update_chase(ctx: &mut TickContext, agent: &mut Agent) {
    if agent.player_distance > agent.settings.lose_range {
        enter_return(ctx, agent);
        return;
    }
    if !agent.can_see_player {
        let last_seen = agent.last_seen_player;
        enter_investigate(ctx, agent, last_seen, INVESTIGATE_TIME);
        return;
    }

    agent.repath_timer -= ctx.dt;
    if agent.repath_timer <= 0.0 {
        request_path(agent, ctx.grid, ctx.player);
        agent.repath_timer = agent.settings.chase_repath_interval;
    }
    let speed = agent.settings.chase_speed;
    move_along_path(agent, speed, ctx.dt, false);
    face_toward(agent, ctx.player, ctx.dt);
}

fn update_take_cover(ctx: &mut TickContext, agent: &mut Agent) {
    if agent.cover.in_cover {
        update_in_cover(ctx, agent);
    } else {
        update_cover_travel(ctx, agent);
    }
}

fn update_cover_travel(ctx: &mut TickContext, agent: &mut Agent) {
    if !agent.path_exhausted() {
        let speed = agent.settings.chase_speed;
        move_along_path(agent, speed, ctx.dt, true);
        return;
    }

    let cover = agent.cover.position;
    let dist = flat_distance(agent.position, cover);
    let cell_size = ctx.grid.cell_size();
    if dist < cell_size {
        let settings = &agent.settings;
        agent.cover.in_cover = true;
        agent.cover.timer = settings.cover_stay_time;
        agent.cover.peek_timer = settings.cover_peek_interval;
        agent.cover.damage_time = 0.0;
        agent.cover.suppression = 0.0;
        agent.cover.threat_yaw = yaw_toward(agent.position, agent.cover.threat);
        log::debug!("{} reached cover at {:?}", agent.name, agent.cover.position);
        return;
    }

    // Path ended short of the cover cell: close the gap directly
    if dist < agent.settings.waypoint_dist + cell_size {
        let step = agent.settings.chase_speed * ctx.dt;
        face_toward(agent, cover, ctx.dt);
        step_toward(agent, cover, dist, step);
        return;
    }

    // Pushed off course: re-path, or give up and search where the threat was
    request_path(agent, ctx.grid, cover);
    if agent.path.is_empty() {
        let threat = agent.cover.threat;
        enter_investigate(ctx, agent, threat, INVESTIGATE_TIME);
    }
}

fn update_in_cover(ctx: &mut TickContext, agent: &mut Agent) {
    let dt = ctx.dt;
    agent.cover.timer -= dt;
    let threat = agent.cover.threat;
    face_toward(agent, threat, dt);

    let player = ctx.player;
    let max = agent.settings.cover_suppression_max;
    if agent.recently_shot {
        agent.cover.suppression = (agent.cover.suppression + 3.0 * dt).min(max);
        agent.cover.damage_time += dt;
        if agent.cover.damage_time >= agent.settings.cover_relocate_time && try_take_cover(ctx, agent, player) {
            return;
        }
    } else {
        agent.cover.suppression = (agent.cover.suppression - 1.5 * dt).max(0.0);
        agent.cover.damage_time = (agent.cover.damage_time - dt).max(0.0);
    }

    let bearing = yaw_toward(agent.position, player);
    if wrap_degrees(bearing - agent.cover.threat_yaw).abs() > agent.settings.cover_flank_angle {
        log::debug!("{} flanked in cover", agent.name);
        if !try_take_cover(ctx, agent, player) {
            enter_chase(ctx, agent);
        }
        return;
    }

    if agent.cover.suppression < 0.5 {
        agent.cover.peek_timer -= dt;
        if agent.cover.peek_timer <= 0.0 {
            agent.cover.peek_timer = agent.settings.cover_peek_interval;
            if agent.can_detect_player() {
                enter_chase(ctx, agent);
                return;
            }
            agent.cover.threat = player;
        }
    }

    if agent.cover.timer <= 0.0 {
        if agent.can_detect_player() {
            enter_chase(ctx, agent);
        } else {
            let threat = agent.cover.threat;
            enter_investigate(ctx, agent, threat, INVESTIGATE_TIME);
        }
    }
}

fn update_return(ctx: &mut TickContext, agent: &mut Agent) {
    if agent.can_detect_player() {
        enter_chase(ctx, agent);
    } else if agent.path_exhausted() {
        enter_patrol_or_idle(ctx, agent);
    } else {
        let speed = agent.settings.move_speed;
        move_along_path(agent, speed, ctx.dt, true);
    }
}

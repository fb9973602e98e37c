//! Drone flight controller
//!
//! Drones share the behaviour states of ground agents but steer straight
//! through the air instead of along grid paths. Altitude follows a
//! spring-damper toward a target that lookahead rays push up or down.
//! Losing two rotors on the same side starts an unrecoverable crash.

use crate::agent::{Agent, AgentState, DroneState, ROTOR_MAX_HEALTH};
use crate::config::PatrolMode;
use crate::perception::{self, flat_distance, wrap_degrees, yaw_toward};
use crate::state_machine::{
    advance_patrol_index, change_state, enter_chase, enter_investigate, enter_patrol, enter_patrol_or_idle,
    enter_return, enter_wait, face_toward, hear, turn_toward_yaw, TickContext, INVESTIGATE_TIME,
};
use crate::system::AiEvent;
use glam::Vec3;
use std::f32::consts::TAU;

/// Downward acceleration while crashing
pub const CRASH_GRAVITY: f32 = 15.0;
/// Roll rate while crashing, degrees per second
pub const CRASH_ROLL_RATE: f32 = 180.0;
/// Pitch rate while crashing, degrees per second
pub const CRASH_PITCH_RATE: f32 = 60.0;
/// Horizontal drift while crashing
pub const CRASH_DRIFT_SPEED: f32 = 1.5;
/// Height above ground at which a crashing drone explodes
pub const CRASH_IMPACT_HEIGHT: f32 = 0.2;
/// Distance within which drones slow down on approach
pub const DECEL_DISTANCE: f32 = 2.0;
/// Horizontal distance at which a drone counts as arrived
pub const ARRIVE_DISTANCE: f32 = 0.5;
/// Altitude kick when hit
pub const DAMAGE_CLIMB: f32 = 2.0;
/// Upward velocity imparted when hit
pub const DAMAGE_LIFT_SPEED: f32 = 3.0;

/// Rotor pairs that share a side: left, right, front, rear
const SAME_SIDE_PAIRS: [(usize, usize); 4] = [(0, 2), (1, 3), (0, 1), (2, 3)];

/// Two or more rotors down with a whole side gone.
///
/// Losing only a diagonal pair leaves the drone flyable.
pub fn should_crash(drone: &DroneState) -> bool {
    if drone.dead_rotors() < 2 {
        return false;
    }
    SAME_SIDE_PAIRS
        .iter()
        .any(|&(a, b)| !drone.rotors[a].alive && !drone.rotors[b].alive)
}

/// Full tick for a drone
pub fn update_drone(ctx: &mut TickContext, agent: &mut Agent) {
    let dt = ctx.dt;
    if agent.drone.crashing {
        update_crash(ctx, agent);
        return;
    }

    perception::tick_timers(agent, dt);
    update_rotors(&mut agent.drone, dt);
    update_downwash(agent, dt);

    if should_crash(&agent.drone) {
        agent.drone.crashing = true;
        agent.drone.crash_timer = 0.0;
        agent.clear_path();
        log::debug!("{} lost a side of rotors, crashing", agent.name);
        return;
    }

    let before = agent.position;
    perception::refresh_sight(agent, ctx.player, ctx.physics);

    if !hear(ctx, agent) {
        if agent.recently_shot && agent.state != AgentState::Chase {
            react_to_damage(ctx, agent);
        } else {
            update_state(ctx, agent);
        }
    }

    update_bob(agent, dt);
    update_target_altitude(ctx, agent);
    update_altitude(agent, ctx.grid.ground_y(), dt);
    update_tilt(agent, before, dt);
}

// ==================== Behaviour ====================

fn react_to_damage(ctx: &mut TickContext, agent: &mut Agent) {
    let last_seen = agent.last_seen_player;
    enter_investigate(ctx, agent, last_seen, INVESTIGATE_TIME);
    let drone = &mut agent.drone;
    drone.target_altitude = (drone.target_altitude + DAMAGE_CLIMB).min(agent.settings.drone_max_altitude);
    drone.vertical_velocity += DAMAGE_LIFT_SPEED;
    agent.recently_shot = false;
    agent.recently_shot_timer = 0.0;
}

fn update_state(ctx: &mut TickContext, agent: &mut Agent) {
    let dt = ctx.dt;
    let move_speed = agent.settings.move_speed;

    match agent.state {
        AgentState::Idle => {
            if agent.can_detect_player() {
                enter_chase(ctx, agent);
            } else if agent.has_patrol_data() {
                start_patrol(ctx, agent);
            }
        }
        AgentState::Patrol => {
            if agent.can_detect_player() {
                enter_chase(ctx, agent);
            } else if agent.settings.patrol_mode == PatrolMode::AreaRoam {
                let (center, radius) = (agent.home, agent.settings.drone_orbit_radius);
                orbit(agent, center, radius, move_speed, dt);
            } else if let Some(&point) = agent.patrol_points.get(agent.patrol_index) {
                if move_drone_toward(agent, point, move_speed, dt) < ARRIVE_DISTANCE.max(agent.settings.waypoint_dist) {
                    enter_wait(ctx, agent);
                    agent.drone.orbit_center = point;
                    agent.drone.orbit_angle = 0.0;
                }
            } else {
                enter_patrol_or_idle(ctx, agent);
            }
        }
        AgentState::WaitAtWaypoint => {
            if agent.can_detect_player() {
                enter_chase(ctx, agent);
                return;
            }
            let (center, radius) = (agent.drone.orbit_center, agent.settings.drone_orbit_radius * 0.5);
            orbit(agent, center, radius, move_speed, dt);

            agent.wait_timer -= dt;
            if agent.wait_timer <= 0.0 {
                advance_patrol_index(agent, ctx.rng);
                if agent.has_patrol_data() {
                    start_patrol(ctx, agent);
                } else {
                    enter_patrol_or_idle(ctx, agent);
                }
            }
        }
        AgentState::Investigate => {
            if agent.can_detect_player() {
                enter_chase(ctx, agent);
                return;
            }
            let target = agent.investigate_pos;
            if move_drone_toward(agent, target, move_speed, dt) < 1.0 {
                // Slow scan while hovering over the spot
                let yaw = agent.yaw + 90.0;
                turn_toward_yaw(agent, yaw, 60.0, dt);
                agent.investigate_timer -= dt;
                if agent.investigate_timer <= 0.0 {
                    if agent.has_patrol_data() {
                        start_patrol(ctx, agent);
                    } else {
                        enter_return(ctx, agent);
                    }
                }
            }
        }
        AgentState::Chase => {
            if agent.player_distance > agent.settings.lose_range {
                enter_return(ctx, agent);
            } else if !agent.can_see_player {
                let last_seen = agent.last_seen_player;
                enter_investigate(ctx, agent, last_seen, INVESTIGATE_TIME);
            } else {
                let (player, speed) = (ctx.player, agent.settings.drone_chase_speed);
                move_drone_toward(agent, player, speed, dt);
                face_toward(agent, player, dt);
            }
        }
        AgentState::TakeCover => {
            // Drones hold no cover; search where the threat was instead
            let threat = agent.cover.threat;
            enter_investigate(ctx, agent, threat, INVESTIGATE_TIME);
        }
        AgentState::Return => {
            if agent.can_detect_player() {
                enter_chase(ctx, agent);
                return;
            }
            let home = agent.home;
            if move_drone_toward(agent, home, move_speed, dt) < 1.0 {
                if agent.has_patrol_data() {
                    start_patrol(ctx, agent);
                } else {
                    change_state(agent, AgentState::Idle, ctx.events);
                    agent.clear_path();
                }
            }
        }
    }
}

/// Enter Patrol, orbiting home from the current bearing when roaming
fn start_patrol(ctx: &mut TickContext, agent: &mut Agent) {
    enter_patrol(ctx, agent);
    if agent.settings.patrol_mode == PatrolMode::AreaRoam {
        let offset = agent.position - agent.home;
        agent.drone.orbit_center = agent.home;
        agent.drone.orbit_angle = offset.z.atan2(offset.x);
    }
}

/// Chase a point circling `center`
fn orbit(agent: &mut Agent, center: Vec3, radius: f32, speed: f32, dt: f32) {
    let drone = &mut agent.drone;
    drone.orbit_angle = (drone.orbit_angle + agent.settings.drone_orbit_speed * dt) % TAU;
    let angle = drone.orbit_angle;
    let target = Vec3::new(center.x + angle.cos() * radius, center.y, center.z + angle.sin() * radius);
    move_drone_toward(agent, target, speed, dt);
}

/// Fly horizontally toward `target`, slowing inside [`DECEL_DISTANCE`].
///
/// Returns the remaining horizontal distance.
pub fn move_drone_toward(agent: &mut Agent, target: Vec3, speed: f32, dt: f32) -> f32 {
    let dist = flat_distance(agent.position, target);
    if dist < 1e-3 {
        return dist;
    }

    face_toward(agent, target, dt);
    let speed = if dist < DECEL_DISTANCE { speed * dist / DECEL_DISTANCE } else { speed };
    let step = (speed * dt).min(dist);
    agent.position.x += (target.x - agent.position.x) / dist * step;
    agent.position.z += (target.z - agent.position.z) / dist * step;
    dist - step
}

// ==================== Flight ====================

fn update_rotors(drone: &mut DroneState, dt: f32) {
    let k = (3.0 * dt).min(1.0);
    for rotor in &mut drone.rotors {
        let target = if rotor.alive {
            0.3 + 0.7 * (rotor.health / ROTOR_MAX_HEALTH)
        } else {
            0.0
        };
        rotor.spin += (target - rotor.spin) * k;
    }
}

fn update_downwash(agent: &mut Agent, dt: f32) {
    let drone = &mut agent.drone;
    drone.downwash_timer -= dt;
    drone.downwash_ready = drone.downwash_timer <= 0.0;
    if drone.downwash_ready {
        drone.downwash_timer = agent.settings.drone_downwash_rate;
    }
}

fn update_bob(agent: &mut Agent, dt: f32) {
    let drone = &mut agent.drone;
    drone.bob_phase = (drone.bob_phase + agent.settings.drone_bob_speed * dt) % TAU;
    drone.bob_offset = drone.bob_phase.sin() * agent.settings.drone_bob_amplitude;
}

/// Look ahead; climb or dive around obstacles, otherwise settle at hover height
fn update_target_altitude(ctx: &TickContext, agent: &mut Agent) {
    let dt = ctx.dt;
    let s = &agent.settings;
    let ground = ctx.grid.ground_y();
    let pos = agent.position;
    let yaw = agent.yaw.to_radians();
    let forward = Vec3::new(yaw.sin(), 0.0, yaw.cos());

    let blocked_at = |origin: Vec3| {
        ctx.physics
            .is_some_and(|p| p.raycast(origin, forward, s.drone_obstacle_dist).is_some())
    };

    let drone = &mut agent.drone;
    if blocked_at(pos) {
        let above = pos + Vec3::Y * 2.0;
        let below_y = (ground + s.drone_min_altitude).max(pos.y - 2.0);
        let below = Vec3::new(pos.x, below_y, pos.z);
        let can_dive = below_y < pos.y - 1e-3 && !blocked_at(below);

        if !blocked_at(above) || !can_dive {
            drone.target_altitude = (drone.target_altitude + s.drone_climb_speed * dt).min(s.drone_max_altitude);
        } else {
            drone.target_altitude = (drone.target_altitude - s.drone_dive_speed * dt).max(s.drone_min_altitude);
        }
    } else {
        let k = (2.0 * dt).min(1.0);
        drone.target_altitude += (s.drone_hover_height - drone.target_altitude) * k;
    }
}

/// Spring-damper toward target altitude plus bob, clamped to the flight band
fn update_altitude(agent: &mut Agent, ground_y: f32, dt: f32) {
    let drone = &mut agent.drone;
    let desired = ground_y + drone.target_altitude + drone.bob_offset;
    let error = desired - agent.position.y;

    drone.vertical_velocity += error * 8.0 * dt;
    drone.vertical_velocity *= (1.0 - 3.0 * dt).max(0.0);
    agent.position.y += drone.vertical_velocity * dt;

    clamp_altitude(agent, ground_y);
}

/// Keep a flying drone inside `[ground + min, ground + max + bob]`
pub fn clamp_altitude(agent: &mut Agent, ground_y: f32) {
    let s = &agent.settings;
    let low = ground_y + s.drone_min_altitude;
    let high = ground_y + s.drone_max_altitude + s.drone_bob_amplitude;
    let clamped = agent.position.y.clamp(low, high);
    if clamped != agent.position.y {
        agent.position.y = clamped;
        agent.drone.vertical_velocity = 0.0;
    }
}

/// Pitch from forward speed, roll from sideways motion
fn update_tilt(agent: &mut Agent, before: Vec3, dt: f32) {
    if dt <= 0.0 {
        return;
    }
    let s = &agent.settings;
    let moved = flat_distance(before, agent.position);
    let drone = &mut agent.drone;

    drone.speed_current += (moved / dt - drone.speed_current) * (5.0 * dt).min(1.0);
    let ratio = drone.speed_current / s.drone_chase_speed;
    let k = (4.0 * dt).min(1.0);

    let target_pitch = (ratio * s.drone_max_pitch).min(s.drone_max_pitch);
    drone.pitch += (target_pitch - drone.pitch) * k;

    let target_roll = if moved > 1e-4 {
        let side = wrap_degrees(yaw_toward(before, agent.position) - agent.yaw);
        (side / 90.0 * ratio * s.drone_max_roll).clamp(-s.drone_max_roll, s.drone_max_roll)
    } else {
        0.0
    };
    drone.roll += (target_roll - drone.roll) * k;
}

// ==================== Crash ====================

fn update_crash(ctx: &mut TickContext, agent: &mut Agent) {
    let dt = ctx.dt;
    let yaw = agent.yaw.to_radians();
    let drone = &mut agent.drone;

    drone.crash_timer += dt;
    drone.vertical_velocity -= CRASH_GRAVITY * dt;
    drone.roll += CRASH_ROLL_RATE * dt;
    drone.pitch += CRASH_PITCH_RATE * dt;
    for rotor in &mut drone.rotors {
        rotor.spin *= (1.0 - 2.0 * dt).max(0.0);
    }

    agent.position.y += drone.vertical_velocity * dt;
    agent.position.x += yaw.sin() * CRASH_DRIFT_SPEED * dt;
    agent.position.z += yaw.cos() * CRASH_DRIFT_SPEED * dt;

    let impact_y = ctx.grid.ground_y() + CRASH_IMPACT_HEIGHT;
    if agent.position.y <= impact_y {
        agent.position.y = impact_y;
        drone.exploded = true;
        drone.vertical_velocity = 0.0;
        agent.alive = false;
        agent.active = false;
        log::debug!(
            "{} exploded at {:?} after {:.2}s",
            agent.name,
            agent.position,
            agent.drone.crash_timer
        );
        ctx.events.push(AiEvent::DroneExploded {
            agent: agent.id,
            position: agent.position,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentId, AgentKind};
    use crate::config::AgentSettings;
    use crate::navigation::NavGrid;
    use crate::sound::{SoundEvent, SoundKind, SoundSource};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use void_collision::{CollisionSettings, CollisionWorld, PhysicsQuery};

    const FAR: Vec3 = Vec3::new(500.0, 0.0, 500.0);

    struct Harness {
        grid: NavGrid,
        rng: StdRng,
        events: Vec<AiEvent>,
        sounds: Vec<SoundEvent>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                grid: NavGrid::new(40, 40, 1.0, -20.0, -20.0, 0.0).unwrap(),
                rng: StdRng::seed_from_u64(5),
                events: Vec::new(),
                sounds: Vec::new(),
            }
        }

        fn tick(&mut self, agent: &mut Agent, player: Vec3, physics: Option<&dyn PhysicsQuery>, dt: f32) {
            let mut ctx = TickContext {
                dt,
                grid: &self.grid,
                player,
                physics,
                sounds: &self.sounds,
                rng: &mut self.rng,
                events: &mut self.events,
            };
            update_drone(&mut ctx, agent);
            self.sounds.clear();
        }
    }

    fn drone_at(position: Vec3) -> Agent {
        let settings = AgentSettings::drone().with_require_los(false);
        Agent::new(AgentId(7), "drone", AgentKind::Drone, position, settings)
    }

    fn kill_rotor(agent: &mut Agent, index: usize) {
        agent.drone.rotors[index].alive = false;
        agent.drone.rotors[index].health = 0.0;
    }

    #[test]
    fn test_crash_policy() {
        let mut drone = drone_at(Vec3::ZERO);
        assert!(!should_crash(&drone.drone));
        kill_rotor(&mut drone, 0);
        assert!(!should_crash(&drone.drone));
        // Diagonal pair
        kill_rotor(&mut drone, 3);
        assert!(!should_crash(&drone.drone));
        kill_rotor(&mut drone, 1);
        assert!(should_crash(&drone.drone));

        for (a, b) in SAME_SIDE_PAIRS {
            let mut d = drone_at(Vec3::ZERO);
            kill_rotor(&mut d, a);
            kill_rotor(&mut d, b);
            assert!(should_crash(&d.drone), "pair {a},{b}");
        }
    }

    #[test]
    fn test_rises_to_hover_and_stays_in_band() {
        let mut h = Harness::new();
        let mut drone = drone_at(Vec3::ZERO);
        let s = drone.settings.clone();
        for _ in 0..600 {
            h.tick(&mut drone, FAR, None, 1.0 / 60.0);
            assert!(drone.position.y >= s.drone_min_altitude - 1e-4);
            assert!(drone.position.y <= s.drone_max_altitude + s.drone_bob_amplitude + 1e-4);
        }
        assert!((drone.position.y - s.drone_hover_height).abs() < s.drone_bob_amplitude + 0.2);
    }

    #[test]
    fn test_area_roam_orbits_home() {
        let mut h = Harness::new();
        let mut drone = drone_at(Vec3::new(0.0, 4.0, 0.0));
        for _ in 0..600 {
            h.tick(&mut drone, FAR, None, 1.0 / 60.0);
        }
        assert_eq!(drone.state, AgentState::Patrol);
        let r = flat_distance(drone.position, drone.home);
        assert!(r > 1.0 && r < drone.settings.drone_orbit_radius + 1.0, "radius {r}");
    }

    #[test]
    fn test_chase_tilts_forward() {
        let mut h = Harness::new();
        let mut drone = drone_at(Vec3::new(0.0, 4.0, 0.0));
        let player = Vec3::new(0.0, 0.0, 12.0);
        for _ in 0..60 {
            h.tick(&mut drone, player, None, 1.0 / 60.0);
        }
        assert_eq!(drone.state, AgentState::Chase);
        assert!(drone.position.z > 2.0);
        assert!(drone.drone.pitch > 1.0);
        assert!(drone.drone.pitch <= drone.settings.drone_max_pitch);
        assert!(drone.drone.roll.abs() < 1.0);
    }

    #[test]
    fn test_damage_jolts_upward() {
        let mut h = Harness::new();
        let mut drone = drone_at(Vec3::new(0.0, 4.0, 0.0));
        drone.settings.patrol_mode = PatrolMode::Loop;
        let seen_at = Vec3::new(6.0, 0.0, -3.0);
        drone.last_seen_player = seen_at;
        let before = drone.drone.target_altitude;
        drone.take_damage(5.0);
        h.tick(&mut drone, FAR, None, 1.0 / 60.0);

        assert_eq!(drone.state, AgentState::Investigate);
        assert_eq!(drone.investigate_pos, seen_at);
        assert!(drone.drone.target_altitude > before + 1.5);
        assert!(!drone.recently_shot);
    }

    #[test]
    fn test_climbs_over_obstacle() {
        let mut h = Harness::new();
        let mut world = CollisionWorld::new(CollisionSettings::default());
        // Low wall ahead (+Z), clear above
        world
            .add_box(Vec3::new(0.0, 2.0, 3.0), Vec3::new(5.0, 3.0, 0.5))
            .unwrap();
        let mut drone = drone_at(Vec3::new(0.0, 4.0, 0.0));
        drone.settings.patrol_mode = PatrolMode::Loop;
        let start = drone.drone.target_altitude;
        for _ in 0..30 {
            h.tick(&mut drone, FAR, Some(&world), 1.0 / 60.0);
        }
        assert!(drone.drone.target_altitude > start);
    }

    #[test]
    fn test_dives_under_overhang() {
        let mut h = Harness::new();
        let mut world = CollisionWorld::new(CollisionSettings::default());
        // Slab from y = 3 to y = 10 ahead, open underneath
        world
            .add_box(Vec3::new(0.0, 6.5, 3.0), Vec3::new(5.0, 3.5, 0.5))
            .unwrap();
        let mut drone = drone_at(Vec3::new(0.0, 4.0, 0.0));
        drone.settings.patrol_mode = PatrolMode::Loop;
        let start = drone.drone.target_altitude;
        for _ in 0..30 {
            h.tick(&mut drone, FAR, Some(&world), 1.0 / 60.0);
        }
        assert!(drone.drone.target_altitude < start, "target {}", drone.drone.target_altitude);
        assert!(drone.drone.target_altitude >= drone.settings.drone_min_altitude);
    }

    #[test]
    fn test_climbs_when_above_and_below_blocked() {
        let mut h = Harness::new();
        let mut world = CollisionWorld::new(CollisionSettings::default());
        // Wall from the ground to y = 10 ahead
        world
            .add_box(Vec3::new(0.0, 5.0, 3.0), Vec3::new(5.0, 5.0, 0.5))
            .unwrap();
        let mut drone = drone_at(Vec3::new(0.0, 4.0, 0.0));
        drone.settings.patrol_mode = PatrolMode::Loop;
        let start = drone.drone.target_altitude;
        for _ in 0..30 {
            h.tick(&mut drone, FAR, Some(&world), 1.0 / 60.0);
        }
        assert!(drone.drone.target_altitude > start);
        assert!(drone.drone.target_altitude <= drone.settings.drone_max_altitude);
    }

    #[test]
    fn test_hears_impact_on_wall_face() {
        let mut h = Harness::new();
        let mut world = CollisionWorld::new(CollisionSettings::default().with_ground(0.0));
        world
            .add_box(Vec3::new(6.0, 1.5, 0.0), Vec3::new(0.5, 1.5, 3.0))
            .unwrap();
        let mut drone = drone_at(Vec3::new(0.0, 4.0, 0.0));
        drone.settings.patrol_mode = PatrolMode::Loop;

        let impact = Vec3::new(5.5, 3.0, 0.0);
        h.sounds.push(SoundEvent::new(impact, 20.0, SoundKind::BulletImpact, SoundSource::Player));
        h.tick(&mut drone, FAR, Some(&world), 1.0 / 60.0);
        assert_eq!(drone.state, AgentState::Investigate);
        assert_eq!(drone.last_heard, Some(impact));

        // Footstep on the ground plane
        let mut drone = drone_at(Vec3::new(0.0, 4.0, 0.0));
        drone.settings.patrol_mode = PatrolMode::Loop;
        let step = Vec3::new(-4.0, 0.0, 2.0);
        h.sounds.push(SoundEvent::new(step, 10.0, SoundKind::Footstep, SoundSource::Player));
        h.tick(&mut drone, FAR, Some(&world), 1.0 / 60.0);
        assert_eq!(drone.last_heard, Some(step));
    }

    #[test]
    fn test_crash_and_explode() {
        let mut h = Harness::new();
        let mut drone = drone_at(Vec3::new(0.0, 4.0, 0.0));
        drone.settings.patrol_mode = PatrolMode::Loop;
        kill_rotor(&mut drone, 0);
        kill_rotor(&mut drone, 2);

        h.tick(&mut drone, FAR, None, 1.0 / 60.0);
        assert!(drone.drone.crashing);

        let mut elapsed = 0.0;
        while drone.alive && elapsed < 2.0 {
            h.tick(&mut drone, FAR, None, 1.0 / 60.0);
            elapsed += 1.0 / 60.0;
        }
        assert!(elapsed < 1.0, "took {elapsed}s");
        assert!(!drone.alive && !drone.active && drone.drone.exploded);
        assert_relative_eq!(drone.position.y, CRASH_IMPACT_HEIGHT);
        assert!(h
            .events
            .iter()
            .any(|e| matches!(e, AiEvent::DroneExploded { agent, .. } if *agent == drone.id)));
    }

    #[test]
    fn test_rotor_spin_follows_health() {
        let mut drone = drone_at(Vec3::ZERO);
        drone.drone.rotors[1].health = 0.0;
        drone.drone.rotors[2].alive = false;
        for _ in 0..300 {
            update_rotors(&mut drone.drone, 1.0 / 60.0);
        }
        assert_relative_eq!(drone.drone.rotors[0].spin, 1.0, epsilon = 1e-3);
        assert_relative_eq!(drone.drone.rotors[1].spin, 0.3, epsilon = 1e-3);
        assert_relative_eq!(drone.drone.rotors[2].spin, 0.0, epsilon = 1e-3);
    }
}

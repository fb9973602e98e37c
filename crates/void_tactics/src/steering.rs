//! Post-movement position fixes
//!
//! Runs after every agent has moved: soft separation between agents, then
//! push-out against static geometry through [`PhysicsQuery::test_aabb`].

use crate::agent::{Agent, AgentKind};
use crate::drone::clamp_altitude;
use glam::{Vec2, Vec3};
use void_collision::{Aabb, PhysicsQuery};

/// Resolution passes for walkers
pub const GROUND_PASSES: usize = 4;
/// Resolution passes for drones
pub const DRONE_PASSES: usize = 3;
/// Extra push past the contact
pub const SKIN: f32 = 0.001;
/// Lift of a walker's box off the floor so the ground never registers
pub const FOOT_CLEARANCE: f32 = 0.02;

fn separates(agent: &Agent) -> bool {
    agent.active && agent.visible && !agent.drone.crashing
}

/// Push overlapping agents apart on the XZ plane.
///
/// Pushes are computed from positions at the start of the pass and applied
/// afterwards, so the result does not depend on agent order.
pub fn apply_separation(agents: &mut [Agent], dt: f32) {
    let mut pushes = vec![Vec2::ZERO; agents.len()];

    for (i, agent) in agents.iter().enumerate() {
        if !separates(agent) {
            continue;
        }
        let radius = agent.settings.avoid_radius;
        if radius <= 0.0 {
            continue;
        }
        let me = Vec2::new(agent.position.x, agent.position.z);

        for (j, other) in agents.iter().enumerate() {
            if i == j || !separates(other) {
                continue;
            }
            let offset = me - Vec2::new(other.position.x, other.position.z);
            let dist = offset.length();
            // Coincident agents have no separation axis
            if dist >= radius || dist <= f32::EPSILON {
                continue;
            }
            pushes[i] += offset / dist * ((radius - dist) / radius) * agent.settings.avoid_force * dt;
        }
    }

    for (agent, push) in agents.iter_mut().zip(pushes) {
        agent.position.x += push.x;
        agent.position.z += push.y;
    }
}

/// Resolve one agent against static geometry
pub fn resolve_collisions(agent: &mut Agent, physics: &dyn PhysicsQuery, ground_y: f32) {
    match agent.kind {
        AgentKind::Ground => resolve_ground(agent, physics),
        AgentKind::Drone => {
            if agent.drone.crashing {
                return;
            }
            resolve_drone(agent, physics);
            clamp_altitude(agent, ground_y);
        }
    }
}

fn ground_box(agent: &Agent) -> Aabb {
    let s = agent.settings.body_scale;
    Aabb::from_bottom(agent.position + Vec3::Y * FOOT_CLEARANCE, s, s, s)
}

fn drone_box(agent: &Agent) -> Aabb {
    let s = agent.settings.body_scale;
    Aabb::from_center_half(agent.position, Vec3::new(s * 0.5, s * 0.25, s * 0.5))
}

fn resolve_ground(agent: &mut Agent, physics: &dyn PhysicsQuery) {
    for _ in 0..GROUND_PASSES {
        let Some(hit) = physics.test_aabb(&ground_box(agent), None) else {
            break;
        };
        let push = Vec2::new(hit.normal.x, hit.normal.z);
        if push.length_squared() <= f32::EPSILON {
            break;
        }
        let push = push.normalize() * (hit.depth + SKIN);
        agent.position.x += push.x;
        agent.position.z += push.y;
    }
}

fn resolve_drone(agent: &mut Agent, physics: &dyn PhysicsQuery) {
    for _ in 0..DRONE_PASSES {
        let Some(hit) = physics.test_aabb(&drone_box(agent), None) else {
            break;
        };
        agent.position += hit.normal * (hit.depth + SKIN);
        if hit.normal.y > 0.5 {
            agent.drone.vertical_velocity = agent.drone.vertical_velocity.max(0.0);
        }
    }
}

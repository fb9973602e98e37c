//! End-to-end behaviour scenarios for void_tactics

use approx::assert_relative_eq;
use void_collision::{CollisionSettings, CollisionWorld};
use void_tactics::perception::flat_distance;
use void_tactics::prelude::*;

const DT: f32 = 1.0 / 60.0;
const FAR: Vec3 = Vec3::new(500.0, 0.0, 500.0);

fn empty_world() -> CollisionWorld {
    CollisionWorld::new(CollisionSettings::default())
}

/// 40x40 grid centered on the origin
fn open_field() -> NavGrid {
    NavGrid::new(40, 40, 1.0, -20.0, -20.0, 0.0).unwrap()
}

#[test]
fn test_patrol_cycle() {
    let grid = NavGrid::new(10, 10, 1.0, 0.0, 0.0, 0.0).unwrap();
    let world = empty_world();
    let mut ai = AiSystem::with_seed(1);

    let settings = AgentSettings::default()
        .with_speeds(5.0, 5.0)
        .with_patrol_mode(PatrolMode::Loop);
    let guard = ai.add_agent_with("guard", AgentKind::Ground, Vec3::new(0.5, 0.0, 0.5), settings).unwrap();
    let points = [Vec3::new(9.5, 0.0, 0.5), Vec3::new(9.5, 0.0, 9.5)];
    for p in points {
        ai.add_patrol_point(guard, p);
    }

    // Sequence of patrol points reached, without repeats
    let mut visits: Vec<usize> = Vec::new();
    for _ in 0..(20.0 / DT) as usize {
        ai.update(DT, &grid, FAR, Some(&world));
        let agent = ai.agent(guard).unwrap();
        assert!(
            matches!(agent.state, AgentState::Patrol | AgentState::WaitAtWaypoint),
            "unexpected state {}",
            agent.state
        );
        for (i, p) in points.iter().enumerate() {
            if flat_distance(agent.position, *p) < 0.4 && visits.last() != Some(&i) {
                visits.push(i);
            }
        }
    }

    assert!(visits.len() >= 3, "visits: {visits:?}");
    assert_eq!(&visits[..3], &[0, 1, 0]);
}

#[test]
fn test_detection_and_chase() {
    let grid = open_field();
    let world = empty_world();
    let mut ai = AiSystem::with_seed(2);
    let settings = AgentSettings::default().with_ranges(10.0, 15.0).with_require_los(false);
    let id = ai.add_agent_with("hunter", AgentKind::Ground, Vec3::ZERO, settings).unwrap();

    let mut player = Vec3::new(0.0, 0.0, 5.0);
    let mut elapsed = 0.0;
    while ai.agent(id).unwrap().state != AgentState::Chase {
        assert!(elapsed <= 0.15, "no detection within one LOS cycle");
        ai.update(DT, &grid, player, Some(&world));
        elapsed += DT;
    }
    assert!(ai.agent(id).unwrap().can_see_player);

    // The player sidesteps; the chase path follows within a repath interval
    player = Vec3::new(3.0, 0.0, 5.0);
    let interval = ai.agent(id).unwrap().settings.chase_repath_interval;
    for _ in 0..((interval + 0.1) / DT) as usize {
        ai.update(DT, &grid, player, Some(&world));
    }
    let agent = ai.agent(id).unwrap();
    assert_eq!(agent.state, AgentState::Chase);
    let goal = *agent.path.last().unwrap();
    assert!(flat_distance(goal, player) < 1.0, "path ends at {goal:?}");
}

#[test]
fn test_lost_beyond_range_returns() {
    let grid = open_field();
    let world = empty_world();
    let mut ai = AiSystem::with_seed(3);
    let settings = AgentSettings::default().with_ranges(10.0, 15.0).with_require_los(false);
    let id = ai.add_agent_with("hunter", AgentKind::Ground, Vec3::ZERO, settings).unwrap();

    ai.update(DT, &grid, Vec3::new(0.0, 0.0, 5.0), Some(&world));
    assert_eq!(ai.agent(id).unwrap().state, AgentState::Chase);

    ai.update(DT, &grid, Vec3::new(0.0, 0.0, 20.0), Some(&world));
    assert_eq!(ai.agent(id).unwrap().state, AgentState::Return);
}

#[test]
fn test_wall_breaks_sight_and_agent_investigates() {
    let grid = open_field();
    let mut world = empty_world();
    let mut ai = AiSystem::with_seed(4);
    let settings = AgentSettings::default().with_ranges(10.0, 15.0);
    let id = ai.add_agent_with("hunter", AgentKind::Ground, Vec3::ZERO, settings).unwrap();

    let player = Vec3::new(0.0, 0.0, 5.0);
    ai.update(DT, &grid, player, Some(&world));
    assert_eq!(ai.agent(id).unwrap().state, AgentState::Chase);

    // A wall drops between them
    world
        .add_box(Vec3::new(0.0, 1.5, 2.5), Vec3::new(3.0, 1.5, 0.2))
        .unwrap();

    for _ in 0..30 {
        ai.update(DT, &grid, player, Some(&world));
        if ai.agent(id).unwrap().state != AgentState::Chase {
            break;
        }
    }

    let agent = ai.agent(id).unwrap();
    assert_eq!(agent.state, AgentState::Investigate);
    assert_eq!(agent.investigate_pos, player);
    assert_relative_eq!(agent.investigate_timer, 3.0);
}

/// 30x30 grid whose column x = 5 is blocked, with a matching physical wall.
/// World z runs from -10 to 20 so the agent at z = 5.5 is far from the edges.
fn strip_arena() -> (NavGrid, CollisionWorld) {
    let mut grid = NavGrid::new(30, 30, 1.0, 0.0, -10.0, 0.0).unwrap();
    for z in 0..30 {
        grid.set_cell(5, z, NavCell::Blocked);
    }
    let mut world = empty_world();
    world
        .add_box(Vec3::new(5.5, 1.5, 5.0), Vec3::new(0.5, 1.5, 15.0))
        .unwrap();
    (grid, world)
}

/// Damage a soldier at (6.5, 5.5) with the threat west of the strip and
/// run until it settles into cover.
fn soldier_in_cover(ai: &mut AiSystem, grid: &NavGrid, world: &CollisionWorld, threat: Vec3) -> AgentId {
    let id = ai.add_agent("rifleman", Vec3::new(6.5, 0.0, 5.5));
    assert!(ai.agent(id).unwrap().settings.seek_cover_on_damage);
    ai.take_damage(id, 10.0);

    for _ in 0..120 {
        ai.update(DT, grid, threat, Some(world));
        if ai.agent(id).unwrap().cover.in_cover {
            break;
        }
    }
    id
}

#[test]
fn test_cover_seeking() {
    let (grid, world) = strip_arena();
    let mut ai = AiSystem::with_seed(5);
    let threat = Vec3::new(0.0, 0.0, 5.5);
    let id = soldier_in_cover(&mut ai, &grid, &world, threat);

    let agent = ai.agent(id).unwrap();
    assert_eq!(agent.state, AgentState::TakeCover);
    assert!(agent.cover.in_cover);
    assert!(agent.cover.position.x > 6.0, "cover at {:?}", agent.cover.position);

    let cell = grid.cell_of(agent.cover.position);
    assert!(grid.is_walkable(cell.x, cell.z));
    assert!(!grid.has_grid_los(cell, grid.cell_of(threat)));
    assert!(flat_distance(agent.position, agent.cover.position) < grid.cell_size());
}

#[test]
fn test_flank_invalidates_cover() {
    let (grid, world) = strip_arena();
    let mut ai = AiSystem::with_seed(6);
    let id = soldier_in_cover(&mut ai, &grid, &world, Vec3::new(0.0, 0.0, 5.5));
    assert!(ai.agent(id).unwrap().cover.in_cover);

    // Player swings round to the east, 180 degrees off the snapshot
    ai.update(DT, &grid, Vec3::new(14.0, 0.0, 5.5), Some(&world));

    let agent = ai.agent(id).unwrap();
    let relocated = agent.state == AgentState::TakeCover && !agent.cover.in_cover;
    assert!(
        relocated || agent.state == AgentState::Chase,
        "still holding: {} in_cover={}",
        agent.state,
        agent.cover.in_cover
    );
}

#[test]
fn test_drone_crash() {
    let grid = open_field();
    let world = empty_world();
    let mut ai = AiSystem::with_seed(7);
    let id = ai.add_drone("hornet", Vec3::new(0.0, 4.0, 0.0));
    assert_eq!(ai.agent(id).unwrap().settings.drone_hover_height, 4.0);

    assert!(ai.damage_rotor(id, 0, 100.0));
    assert!(ai.damage_rotor(id, 2, 100.0));

    ai.update(DT, &grid, FAR, Some(&world));
    assert!(ai.agent(id).unwrap().drone.crashing);

    let mut elapsed = 0.0;
    let mut exploded_at = None;
    while elapsed < 2.0 && exploded_at.is_none() {
        for event in ai.update(DT, &grid, FAR, Some(&world)) {
            if let AiEvent::DroneExploded { agent, position } = event {
                assert_eq!(agent, id);
                exploded_at = Some(position);
            }
        }
        elapsed += DT;
    }

    let position = exploded_at.expect("drone never hit the ground");
    assert!(elapsed <= 1.0, "crash took {elapsed}s");
    assert_relative_eq!(position.y, grid.ground_y() + 0.2);

    let drone = ai.agent(id).unwrap();
    assert!(!drone.alive && !drone.active && drone.drone.exploded);

    // Wreck stays put
    let resting = drone.position;
    ai.update(DT, &grid, FAR, Some(&world));
    assert_eq!(ai.agent(id).unwrap().position, resting);
}

#[test]
fn test_diagonal_rotor_loss_keeps_flying() {
    let grid = open_field();
    let world = empty_world();
    let mut ai = AiSystem::with_seed(8);
    let id = ai.add_drone("hornet", Vec3::new(0.0, 4.0, 0.0));
    ai.damage_rotor(id, 0, 100.0);
    ai.damage_rotor(id, 3, 100.0);

    for _ in 0..120 {
        ai.update(DT, &grid, FAR, Some(&world));
    }
    let drone = ai.agent(id).unwrap();
    assert!(!drone.drone.crashing);
    assert!(drone.alive && drone.active);
    assert_eq!(drone.drone.dead_rotors(), 2);
}

//! Tactics Sandbox
//!
//! Headless run of the AI against a small walled arena. A patrol squad and
//! a drone share the map with a player who walks a circle and fires every
//! few seconds. Halfway through, the drone loses two rotors on one side.
//!
//! Run with: cargo run -p void_tactics --bin tactics-sandbox [config.toml]
//!
//! Set `RUST_LOG=debug` to see every state transition.

use void_collision::{CollisionSettings, CollisionWorld, SceneEntity};
use void_tactics::prelude::*;

const DT: f32 = 1.0 / 60.0;
const TICKS: u32 = 60 * 40;
const GUNSHOT_INTERVAL: u32 = 60 * 4;
const ROTOR_HIT_TICK: u32 = 60 * 20;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match AiConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => {
            let mut config = AiConfig::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = run(&config) {
        log::error!("Sandbox failed: {}", e);
        std::process::exit(1);
    }
}

/// Perimeter walls plus a few crates inside the grid bounds
fn arena(grid: &GridConfig) -> Vec<SceneEntity> {
    let w = grid.width as f32 * grid.cell_size;
    let h = grid.height as f32 * grid.cell_size;
    let (x0, z0, y) = (grid.origin_x, grid.origin_z, grid.ground_y);
    let (cx, cz) = (x0 + w * 0.5, z0 + h * 0.5);
    let wall = 3.0;

    vec![
        SceneEntity::new_box("wall_south", Vec3::new(cx, y + wall * 0.5, z0 + 0.5), Vec3::new(w, wall, 1.0)),
        SceneEntity::new_box("wall_north", Vec3::new(cx, y + wall * 0.5, z0 + h - 0.5), Vec3::new(w, wall, 1.0)),
        SceneEntity::new_box("wall_west", Vec3::new(x0 + 0.5, y + wall * 0.5, cz), Vec3::new(1.0, wall, h)),
        SceneEntity::new_box("wall_east", Vec3::new(x0 + w - 0.5, y + wall * 0.5, cz), Vec3::new(1.0, wall, h)),
        SceneEntity::new_box("crate_a", Vec3::new(cx - 6.0, y + 1.0, cz), Vec3::new(2.0, 2.0, 6.0)),
        SceneEntity::new_box("crate_b", Vec3::new(cx + 6.0, y + 1.0, cz + 4.0), Vec3::new(4.0, 2.0, 2.0))
            .with_rotation(Vec3::new(0.0, 30.0, 0.0)),
        SceneEntity::new_box("ammo", Vec3::new(cx, y + 0.25, cz - 8.0), Vec3::splat(0.5)).as_pickup(),
    ]
}

fn run(config: &AiConfig) -> Result<()> {
    let mut grid = NavGrid::from_config(&config.grid)?;
    grid.show_debug = config.show_debug;
    let scene = arena(&config.grid);
    grid.rebuild_from_entities(&scene);

    let mut world = CollisionWorld::new(CollisionSettings::default().with_ground(config.grid.ground_y));
    world.rebuild_static_colliders(&scene);

    let center = grid.grid_to_world(NavCoord::new(config.grid.width / 2, config.grid.height / 2));
    let mut ai = AiSystem::from_config(config);
    ai.init();

    // Squad walking a square around the middle
    let corners = [
        center + Vec3::new(-10.0, 0.0, -10.0),
        center + Vec3::new(10.0, 0.0, -10.0),
        center + Vec3::new(10.0, 0.0, 10.0),
        center + Vec3::new(-10.0, 0.0, 10.0),
    ];
    let mut squad = Vec::new();
    for (i, &start) in corners.iter().enumerate() {
        let id = ai.add_agent("", start);
        for k in 1..=corners.len() {
            ai.add_patrol_point(id, corners[(i + k) % corners.len()]);
        }
        squad.push(id);
    }
    let drone = ai.add_drone("Hornet", center + Vec3::new(0.0, config.drone.drone_hover_height, 0.0));
    log::info!("Spawned {} soldiers and drone {} in a {}x{} arena", squad.len(), drone, grid.width(), grid.height());

    let mut lines = LineBuffer::new();
    let mut transitions = 0usize;

    for tick in 0..TICKS {
        let t = tick as f32 * DT;
        let player = center + Vec3::new((t * 0.2).cos() * 14.0, 0.0, (t * 0.2).sin() * 14.0);

        if tick > 0 && tick % GUNSHOT_INTERVAL == 0 {
            ai.post_gunshot(player, SoundSource::Player);
            log::info!("t={:.1}s player fires at {:?}", t, player);
        }
        if tick % 30 == 0 {
            ai.post_footstep(player, SoundSource::Player);
        }
        if tick == ROTOR_HIT_TICK {
            ai.damage_rotor(drone, 0, 100.0);
            ai.damage_rotor(drone, 2, 100.0);
            log::info!("t={:.1}s drone loses its left rotors", t);
        }

        for event in ai.update(DT, &grid, player, Some(&world)) {
            match event {
                AiEvent::StateChanged { agent, from, to } => {
                    transitions += 1;
                    log::debug!("t={:.2}s {} {} -> {}", t, agent, from, to);
                }
                AiEvent::DroneExploded { agent, position } => {
                    log::info!("t={:.2}s drone {} exploded at {:?}", t, agent, position);
                }
            }
        }

        if config.show_debug {
            lines.clear();
            grid.debug_draw(&mut lines);
            ai.debug_draw(&mut lines);
        }
    }

    log::info!("{} state transitions over {} ticks", transitions, TICKS);
    for agent in ai.agents() {
        log::info!(
            "{} {}: {} at ({:.1}, {:.1}, {:.1}) health {:.0}{}",
            agent.name,
            agent.id,
            agent.state_name(),
            agent.position.x,
            agent.position.y,
            agent.position.z,
            agent.health,
            if agent.alive { "" } else { " (dead)" }
        );
    }
    if config.show_debug {
        log::info!("Last frame produced {} debug lines", lines.len());
    }

    ai.shutdown();
    grid.shutdown();
    Ok(())
}

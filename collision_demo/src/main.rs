//! Collision demo application
//!
//! Moves a circular ship across a row of obstacles and logs the Enter/Stay/Exit
//! events it produces. Halfway through, one obstacle is destroyed while the
//! ship is touching it, which shows up as a detached exit.
//!
//! Pass a `.toml` or `.ron` engine config as the first argument to override
//! the defaults.

use slot_engine::prelude::*;

const STEPS: usize = 24;
const SHIP_SPEED: f32 = 0.5;

struct Obstacle {
    name: &'static str,
    handle: Handle,
}

fn describe(contact: &CollisionContact, obstacles: &[Obstacle]) -> String {
    let name = obstacles
        .iter()
        .find(|o| o.handle == contact.handle)
        .map_or("unknown", |o| o.name);
    match contact.collider() {
        Some(_) => format!("{name} ({})", contact.handle),
        None => format!("{name} ({}, destroyed)", contact.handle),
    }
}

fn spawn_obstacles(physics: &mut PhysicsSystem) -> Result<Vec<Obstacle>, Box<dyn std::error::Error>> {
    let crate_box = physics.create_box_collider()?;
    physics.set_collider_position(crate_box, Vec2::new(3.0, 0.0))?;

    let rock = physics.create_circle_collider()?;
    physics.set_collider_position(rock, Vec2::new(6.0, 0.5))?;
    physics.set_collider_radius(rock, 0.75)?;

    let wall = physics.create_box_collider()?;
    physics.set_collider_position(wall, Vec2::new(9.5, 0.0))?;
    physics.set_collider_width(wall, 0.5)?;
    physics.set_collider_height(wall, 6.0)?;

    Ok(vec![
        Obstacle { name: "crate", handle: crate_box },
        Obstacle { name: "rock", handle: rock },
        Obstacle { name: "wall", handle: wall },
    ])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting collision demo");

    let backend = Box::new(ImageTextureBackend::new());
    let mut engine = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading engine config from {path}");
            Engine::from_config_file(path, backend)?
        }
        None => Engine::new(EngineConfig::default(), backend)?,
    };

    let ship = engine.physics_mut().create_circle_collider()?;
    engine.physics_mut().set_collider_radius(ship, 0.5)?;
    let obstacles = spawn_obstacles(engine.physics_mut())?;
    let mut history = CollisionHistory::new();

    for step in 0..STEPS {
        let x = step as f32 * SHIP_SPEED;
        engine.physics_mut().set_collider_position(ship, Vec2::new(x, 0.0))?;

        // Pull the rock out from under the ship while they overlap
        if step == 12 {
            let rock = obstacles[1].handle;
            if engine.physics().has_collider(rock) {
                engine.physics_mut().destroy_collider(rock)?;
                log::info!("Step {step}: rock destroyed");
            }
        }

        engine.step()?;

        let events = engine.physics().process_collisions(ship, &mut history);
        for contact in &events.entered {
            log::info!("Step {step} (x = {x:.1}): entered {}", describe(contact, &obstacles));
        }
        for contact in &events.stayed {
            log::debug!("Step {step} (x = {x:.1}): touching {}", describe(contact, &obstacles));
        }
        for contact in &events.exited {
            log::info!("Step {step} (x = {x:.1}): exited {}", describe(contact, &obstacles));
        }
    }

    log::info!(
        "Finished {} steps with {} colliders alive",
        engine.physics().step_count(),
        engine.physics().collider_count()
    );

    engine.shutdown();
    Ok(())
}

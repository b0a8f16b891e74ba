//! Core engine implementation

use crate::{
    config::{Config, ConfigError},
    core::config::EngineConfig,
    foundation::logging,
    physics::{PhysicsError, PhysicsSystem},
    render::{Camera, DrawCommand, RenderError, RenderSystem, TextureBackend},
};
use std::path::Path;
use thiserror::Error;

/// Main engine struct
///
/// Owns the physics and render systems and drives them one step at a time.
/// Callers move colliders and renderers between steps, then call
/// [`Engine::step`] and read collision results back from [`Engine::physics`].
pub struct Engine {
    physics: PhysicsSystem,
    render: RenderSystem,
    config: EngineConfig,
    running: bool,
}

impl Engine {
    /// Create a new engine instance
    ///
    /// Validates the configuration, installs the logger at
    /// `config.log_level` (unless one is already installed), then creates
    /// every pool.
    pub fn new(config: EngineConfig, backend: Box<dyn TextureBackend>) -> Result<Self, EngineError> {
        config.validate()?;
        logging::init_with_level(&config.log_level);
        log::info!("Initializing engine...");

        let physics = PhysicsSystem::new(&config.physics);
        let render = RenderSystem::new(&config.render, backend);

        Ok(Self {
            physics,
            render,
            config,
            running: true,
        })
    }

    /// Create an engine from a `.toml` or `.ron` configuration file
    pub fn from_config_file(path: impl AsRef<Path>, backend: Box<dyn TextureBackend>) -> Result<Self, EngineError> {
        let config = EngineConfig::load_from_file(path)?;
        Self::new(config, backend)
    }

    /// Run one collision detection step
    pub fn step(&mut self) -> Result<(), EngineError> {
        if !self.running {
            return Err(EngineError::ShutDown);
        }
        self.physics.simulate_step();
        Ok(())
    }

    /// Draw commands for the current renderer state
    pub fn draw_list(&self, camera: &Camera, screen_width: u32, screen_height: u32) -> Vec<DrawCommand> {
        self.render.build_draw_list(camera, screen_width, screen_height)
    }

    /// Get the physics system
    pub const fn physics(&self) -> &PhysicsSystem {
        &self.physics
    }

    /// Get mutable access to the physics system
    pub fn physics_mut(&mut self) -> &mut PhysicsSystem {
        &mut self.physics
    }

    /// Get the render system
    pub const fn render(&self) -> &RenderSystem {
        &self.render
    }

    /// Get mutable access to the render system
    pub fn render_mut(&mut self) -> &mut RenderSystem {
        &mut self.render
    }

    /// Configuration the engine was created with
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether the engine has not been shut down
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Tear down every pool and release all backend textures
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.physics.shutdown();
        self.render.shutdown();
        log::info!("Engine shutdown complete");
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Physics error
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    /// Render error
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// The engine was already shut down
    #[error("Engine has been shut down")]
    ShutDown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{PhysicsConfig, RenderConfig};
    use crate::foundation::math::Vec2;
    use crate::physics::CollisionHistory;
    use crate::render::image_backend::tests::solid_png;
    use crate::render::ImageTextureBackend;
    use approx::assert_relative_eq;

    fn engine(config: EngineConfig) -> Engine {
        Engine::new(config, Box::new(ImageTextureBackend::new())).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = EngineConfig::new().with_physics(PhysicsConfig::new().with_collider_capacity(0));
        let result = Engine::new(config, Box::new(ImageTextureBackend::new()));
        assert!(matches!(result, Err(EngineError::Config(ConfigError::Invalid { .. }))));
    }

    #[test]
    fn test_step_drives_collision_detection() {
        let mut engine = engine(EngineConfig::default());
        let a = engine.physics_mut().create_circle_collider().unwrap();
        let b = engine.physics_mut().create_box_collider().unwrap();
        engine.physics_mut().set_collider_position(b, Vec2::new(1.2, 0.0)).unwrap();

        engine.step().unwrap();
        assert_eq!(engine.physics().collisions_for(a), &[b]);

        let mut history = CollisionHistory::new();
        let events = engine.physics().process_collisions(a, &mut history);
        assert_eq!(events.entered.len(), 1);
    }

    #[test]
    fn test_draw_list_through_engine() {
        let mut engine = engine(EngineConfig::new().with_render(RenderConfig::new().with_pixels_per_unit(10.0)));
        let render = engine.render_mut();
        let texture = render
            .textures_mut()
            .load_texture_from_bytes(&solid_png(10, 10, [0, 0, 255, 255]))
            .unwrap();
        let sprite = render.create_sprite_from_texture(texture).unwrap();
        render.create_sprite_renderer(sprite).unwrap();

        let commands = engine.draw_list(&Camera::default(), 100, 100);
        assert_eq!(commands.len(), 1);
        // 10 px per unit on screen, 10 px texture at 10 ppu is one unit
        assert_relative_eq!(commands[0].dst.w, 10.0);
    }

    #[test]
    fn test_shutdown_stops_stepping() {
        let mut engine = engine(EngineConfig::default());
        engine.physics_mut().create_box_collider().unwrap();
        engine.shutdown();
        assert!(!engine.is_running());
        assert!(matches!(engine.step(), Err(EngineError::ShutDown)));
        engine.shutdown();
    }
}

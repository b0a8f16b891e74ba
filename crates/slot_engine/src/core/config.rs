//! # Engine Configuration
//!
//! All tunables for the pools live here, grouped per subsystem. Every struct
//! has sensible defaults and builder-style `with_*` setters, and the whole
//! tree round-trips through TOML or RON via [`Config`].
//!
//! ```toml
//! log_level = "info"
//!
//! [physics]
//! collider_capacity = 64
//! auto_grow = true
//!
//! [render]
//! texture_capacity = 256
//! sprite_capacity = 512
//! renderer_capacity = 512
//! auto_grow = true
//! pixels_per_unit = 100.0
//! ```

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};

/// Initial collider pool capacity
pub const DEFAULT_COLLIDER_CAPACITY: usize = 64;
/// Initial texture pool capacity
pub const DEFAULT_TEXTURE_CAPACITY: usize = 256;
/// Initial sprite pool capacity
pub const DEFAULT_SPRITE_CAPACITY: usize = 512;
/// Initial renderer pool capacity
pub const DEFAULT_RENDERER_CAPACITY: usize = 512;
/// Texture pixels covering one world unit
pub const DEFAULT_PIXELS_PER_UNIT: f32 = 100.0;

/// # Physics Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Colliders the pool holds before growing
    pub collider_capacity: usize,
    /// Grow the pool when full instead of rejecting new colliders
    pub auto_grow: bool,
}

impl PhysicsConfig {
    /// Default physics configuration
    pub const fn new() -> Self {
        Self {
            collider_capacity: DEFAULT_COLLIDER_CAPACITY,
            auto_grow: true,
        }
    }

    /// Set initial collider capacity
    #[must_use]
    pub const fn with_collider_capacity(mut self, capacity: usize) -> Self {
        self.collider_capacity = capacity;
        self
    }

    /// Enable or disable pool growth
    #[must_use]
    pub const fn with_auto_grow(mut self, enabled: bool) -> Self {
        self.auto_grow = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collider_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "physics.collider_capacity",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Render Configuration
///
/// Capacities for the three render-side pools and the default sprite
/// pixel density.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Textures the pool holds before growing
    pub texture_capacity: usize,
    /// Sprites the pool holds before growing
    pub sprite_capacity: usize,
    /// Renderers the pool holds before growing
    pub renderer_capacity: usize,
    /// Grow pools when full instead of rejecting inserts
    pub auto_grow: bool,
    /// Pixels-per-unit given to new sprites
    pub pixels_per_unit: f32,
}

impl RenderConfig {
    /// Default render configuration
    pub const fn new() -> Self {
        Self {
            texture_capacity: DEFAULT_TEXTURE_CAPACITY,
            sprite_capacity: DEFAULT_SPRITE_CAPACITY,
            renderer_capacity: DEFAULT_RENDERER_CAPACITY,
            auto_grow: true,
            pixels_per_unit: DEFAULT_PIXELS_PER_UNIT,
        }
    }

    /// Set initial texture capacity
    #[must_use]
    pub const fn with_texture_capacity(mut self, capacity: usize) -> Self {
        self.texture_capacity = capacity;
        self
    }

    /// Set initial sprite capacity
    #[must_use]
    pub const fn with_sprite_capacity(mut self, capacity: usize) -> Self {
        self.sprite_capacity = capacity;
        self
    }

    /// Set initial renderer capacity
    #[must_use]
    pub const fn with_renderer_capacity(mut self, capacity: usize) -> Self {
        self.renderer_capacity = capacity;
        self
    }

    /// Enable or disable pool growth
    #[must_use]
    pub const fn with_auto_grow(mut self, enabled: bool) -> Self {
        self.auto_grow = enabled;
        self
    }

    /// Set default pixels-per-unit for new sprites
    #[must_use]
    pub const fn with_pixels_per_unit(mut self, pixels_per_unit: f32) -> Self {
        self.pixels_per_unit = pixels_per_unit;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let capacities = [
            ("render.texture_capacity", self.texture_capacity),
            ("render.sprite_capacity", self.sprite_capacity),
            ("render.renderer_capacity", self.renderer_capacity),
        ];
        for (field, capacity) in capacities {
            if capacity == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be at least 1",
                });
            }
        }

        if !(self.pixels_per_unit.is_finite() && self.pixels_per_unit > 0.0) {
            return Err(ConfigError::Invalid {
                field: "render.pixels_per_unit",
                reason: "must be a positive number",
            });
        }

        Ok(())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Engine Configuration
///
/// Top-level configuration handed to [`crate::Engine::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log filter used when the engine installs the logger
    pub log_level: String,
    /// Physics configuration
    pub physics: PhysicsConfig,
    /// Render configuration
    pub render: RenderConfig,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            physics: PhysicsConfig::default(),
            render: RenderConfig::default(),
        }
    }

    /// Set log level
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set physics configuration
    #[must_use]
    pub fn with_physics(mut self, physics: PhysicsConfig) -> Self {
        self.physics = physics;
        self
    }

    /// Set render configuration
    #[must_use]
    pub fn with_render(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for EngineConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "log_level",
                reason: "cannot be empty",
            });
        }
        self.physics.validate()?;
        self.render.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("slot_engine_{}_{name}", std::process::id()))
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.physics.collider_capacity, 64);
        assert!(config.physics.auto_grow);
        assert_eq!(config.render.texture_capacity, 256);
        assert_eq!(config.render.sprite_capacity, 512);
        assert_eq!(config.render.renderer_capacity, 512);
        assert_relative_eq!(config.render.pixels_per_unit, 100.0);
        assert!(Config::validate(&config).is_ok());
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::new()
            .with_log_level("debug")
            .with_physics(PhysicsConfig::new().with_collider_capacity(8).with_auto_grow(false))
            .with_render(RenderConfig::new().with_pixels_per_unit(32.0));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.physics.collider_capacity, 8);
        assert!(!config.physics.auto_grow);
        assert_relative_eq!(config.render.pixels_per_unit, 32.0);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = EngineConfig::new().with_render(RenderConfig::new().with_sprite_capacity(0));
        let err = Config::validate(&config).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "render.sprite_capacity", .. }));

        let config = EngineConfig::new().with_physics(PhysicsConfig::new().with_collider_capacity(0));
        assert!(Config::validate(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_pixels_per_unit() {
        assert!(RenderConfig::new().with_pixels_per_unit(0.0).validate().is_err());
        assert!(RenderConfig::new().with_pixels_per_unit(f32::NAN).validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: EngineConfig = toml::from_str("[physics]\ncollider_capacity = 10\n").unwrap();
        assert_eq!(config.physics.collider_capacity, 10);
        assert!(config.physics.auto_grow);
        assert_eq!(config.render, RenderConfig::default());
    }

    #[test]
    fn test_toml_file_round_trip() {
        let path = temp_path("config.toml");
        let config = EngineConfig::new().with_log_level("warn");
        config.save_to_file(&path).unwrap();
        let loaded = EngineConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_file_round_trip() {
        let path = temp_path("config.ron");
        let config = EngineConfig::new().with_physics(PhysicsConfig::new().with_collider_capacity(3));
        config.save_to_file(&path).unwrap();
        let loaded = EngineConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let path = temp_path("invalid.toml");
        std::fs::write(&path, "[render]\ntexture_capacity = 0\n").unwrap();
        let result = EngineConfig::load_from_file(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = EngineConfig::new().save_to_file("engine.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}

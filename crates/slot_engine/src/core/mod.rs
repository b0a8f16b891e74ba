//! # Core Engine Module
//!
//! Shared configuration used to set up every subsystem.

pub mod config;

pub use config::{Config, ConfigError, EngineConfig, PhysicsConfig, RenderConfig};

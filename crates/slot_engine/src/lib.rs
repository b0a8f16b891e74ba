//! # Slot Engine
//!
//! Handle-addressed storage and 2D collision detection for small games.
//!
//! ## Features
//!
//! - **Dense Slot Pools**: contiguous record storage behind stable handles
//! - **2D Collision Detection**: box and circle colliders, tested pairwise
//! - **Collision Events**: Enter/Stay/Exit classification per collider
//! - **Texture Deduplication**: identical image bytes share one texture
//! - **Draw Lists**: layered sprite renderers projected through a 2D camera
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use slot_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut engine = Engine::new(EngineConfig::default(), Box::new(ImageTextureBackend::new()))?;
//!
//!     let player = engine.physics_mut().create_box_collider()?;
//!     let coin = engine.physics_mut().create_circle_collider()?;
//!     engine.physics_mut().set_collider_position(coin, Vec2::new(0.8, 0.0))?;
//!
//!     let mut history = CollisionHistory::new();
//!     engine.step()?;
//!     for contact in &engine.physics().process_collisions(player, &mut history).entered {
//!         println!("player touched {}", contact.handle);
//!     }
//!
//!     engine.shutdown();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;

pub mod foundation;
pub mod physics;
pub mod render;

mod engine;

pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{Config, EngineConfig, PhysicsConfig, RenderConfig},
        foundation::{
            collections::Handle,
            math::{Color, Rect, Vec2},
            pool::{DenseSlotPool, GrowthPolicy},
        },
        physics::{CollisionContact, CollisionEvents, CollisionHistory, PhysicsSystem},
        render::{Camera, DrawCommand, ImageTextureBackend, RenderSystem, TextureBackend},
        Engine, EngineError,
    };
}

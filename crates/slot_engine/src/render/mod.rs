//! # 2D Rendering Core
//!
//! Three slot pools feed the draw list:
//!
//! - **Textures**: backend-owned images, deduplicated by content hash
//! - **Sprites**: a texture plus its pixels-per-unit density
//! - **Renderers**: positioned, tinted, layered draw entries that reference a
//!   sprite or carry a text string
//!
//! [`RenderSystem::build_draw_list`] projects sprite renderers through a
//! [`Camera`] into screen-space [`DrawCommand`]s. Rasterization is left to
//! whoever consumes the commands; the core only ever holds the opaque
//! [`NativeTexture`] ids a [`TextureBackend`] hands out.

pub mod camera;
pub mod image_backend;
pub mod renderer;
pub mod sprite;
pub mod system;
pub mod texture;

pub use camera::Camera;
pub use image_backend::ImageTextureBackend;
pub use renderer::{RendererKind, RendererPool, RendererRecord, RendererType};
pub use sprite::{SpritePool, SpriteRecord};
pub use system::{DrawCommand, RenderSystem};
pub use texture::{ContentHash, NativeTexture, TextureBackend, TexturePool, TextureRecord, TextureUpload};

use crate::foundation::collections::Handle;
use crate::foundation::pool::PoolError;
use thiserror::Error;

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// Slot pool failure
    #[error("Render pool: {0}")]
    Pool(#[from] PoolError),

    /// Texture file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Texture bytes could not be decoded
    #[error("Texture decode failed: {0}")]
    Decode(String),

    /// Sprite- or text-only operation used on the other kind of renderer
    #[error("Renderer {handle} is a {found} renderer, expected a {expected} renderer")]
    WrongRendererKind {
        /// Renderer that was accessed
        handle: Handle,
        /// Kind the operation works on
        expected: RendererType,
        /// Kind the renderer actually has
        found: RendererType,
    },

    /// Pixels-per-unit must be positive and finite
    #[error("Invalid pixels-per-unit: {0}")]
    InvalidPixelsPerUnit(f32),
}

impl RenderError {
    /// Whether the error reports an unknown handle
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Pool(PoolError::NotFound(_)))
    }
}

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;

//! Sprite pool
//!
//! A sprite is a texture reference plus the pixel density used to size it
//! in world space. Its pixel dimensions always come from the texture.

use super::texture::TexturePool;
use super::{RenderError, RenderResult};
use crate::foundation::collections::Handle;
use crate::foundation::math::Vec2;
use crate::foundation::pool::{DenseSlotPool, GrowthPolicy};
use std::path::Path;

/// One sprite as stored in the pool
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteRecord {
    /// Texture the sprite draws
    pub texture: Handle,
    /// Texture pixels covering one world unit
    pub pixels_per_unit: f32,
}

/// Handle-addressed sprites
#[derive(Debug)]
pub struct SpritePool {
    sprites: DenseSlotPool<SpriteRecord>,
    default_pixels_per_unit: f32,
}

impl SpritePool {
    /// Create a sprite pool; new sprites get `default_pixels_per_unit`
    pub fn new(capacity: usize, policy: GrowthPolicy, default_pixels_per_unit: f32) -> Self {
        Self {
            sprites: DenseSlotPool::with_capacity(capacity, policy),
            default_pixels_per_unit,
        }
    }

    /// Create a sprite over a loaded texture
    pub fn create_from_texture(&mut self, texture: Handle, textures: &TexturePool) -> RenderResult<Handle> {
        textures.get(texture)?;
        let handle = self.sprites.insert(SpriteRecord {
            texture,
            pixels_per_unit: self.default_pixels_per_unit,
        })?;
        log::trace!("Created sprite {handle} over texture {texture}");
        Ok(handle)
    }

    /// Load (or reuse) the texture at `path` and create a sprite over it
    pub fn create_from_file(&mut self, path: impl AsRef<Path>, textures: &mut TexturePool) -> RenderResult<Handle> {
        let texture = textures.load_texture(path)?;
        self.create_from_texture(texture, textures)
    }

    /// Destroy a sprite; its texture stays loaded
    pub fn destroy(&mut self, handle: Handle) -> RenderResult<()> {
        self.sprites.remove(handle)?;
        Ok(())
    }

    /// Sprite record
    pub fn get(&self, handle: Handle) -> RenderResult<&SpriteRecord> {
        Ok(self.sprites.get_ref(handle)?)
    }

    /// Whether `handle` names a live sprite
    pub fn contains(&self, handle: Handle) -> bool {
        self.sprites.contains(handle)
    }

    /// Change a sprite's pixel density
    pub fn set_pixels_per_unit(&mut self, handle: Handle, pixels_per_unit: f32) -> RenderResult<()> {
        if !(pixels_per_unit.is_finite() && pixels_per_unit > 0.0) {
            return Err(RenderError::InvalidPixelsPerUnit(pixels_per_unit));
        }
        self.sprites.get(handle)?.pixels_per_unit = pixels_per_unit;
        Ok(())
    }

    /// Pixel dimensions of the sprite's texture
    pub fn texture_size(&self, handle: Handle, textures: &TexturePool) -> RenderResult<(u32, u32)> {
        textures.size(self.get(handle)?.texture)
    }

    /// Size of the sprite in world units at scale 1
    pub fn world_size(&self, handle: Handle, textures: &TexturePool) -> RenderResult<Vec2> {
        let sprite = self.get(handle)?;
        let (width, height) = textures.size(sprite.texture)?;
        Ok(Vec2::new(width as f32, height as f32) / sprite.pixels_per_unit)
    }

    /// Number of live sprites
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// Whether no sprite exists
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Release every sprite
    pub fn teardown(&mut self) {
        self.sprites.teardown();
    }
}

//! Render system
//!
//! Owns the texture, sprite and renderer pools and turns the renderer pool
//! into a list of screen-space draw commands once per frame.

use super::camera::Camera;
use super::renderer::{RendererKind, RendererPool, RendererRecord};
use super::sprite::SpritePool;
use super::texture::{NativeTexture, TextureBackend, TexturePool};
use super::RenderResult;
use crate::core::config::RenderConfig;
use crate::foundation::collections::Handle;
use crate::foundation::math::{Color, Rect};
use crate::foundation::pool::GrowthPolicy;
use std::path::Path;

/// One textured quad, ready for a rasterizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    /// Texture to sample
    pub native: NativeTexture,
    /// Source region in texture pixels
    pub src: Rect,
    /// Destination region in screen pixels
    pub dst: Rect,
    /// Tint and alpha modulation
    pub color: Color,
}

/// Texture, sprite and renderer pools plus draw-list generation
pub struct RenderSystem {
    textures: TexturePool,
    sprites: SpritePool,
    renderers: RendererPool,
}

impl RenderSystem {
    /// Create the render pools from configuration
    pub fn new(config: &RenderConfig, backend: Box<dyn TextureBackend>) -> Self {
        let policy = GrowthPolicy::from_auto_grow(config.auto_grow);
        log::info!(
            "Render system initialized (textures {}, sprites {}, renderers {}, {:?})",
            config.texture_capacity,
            config.sprite_capacity,
            config.renderer_capacity,
            policy
        );
        Self {
            textures: TexturePool::new(backend, config.texture_capacity, policy),
            sprites: SpritePool::new(config.sprite_capacity, policy, config.pixels_per_unit),
            renderers: RendererPool::new(config.renderer_capacity, policy),
        }
    }

    /// Texture pool
    pub const fn textures(&self) -> &TexturePool {
        &self.textures
    }

    /// Mutable texture pool
    pub fn textures_mut(&mut self) -> &mut TexturePool {
        &mut self.textures
    }

    /// Sprite pool
    pub const fn sprites(&self) -> &SpritePool {
        &self.sprites
    }

    /// Mutable sprite pool
    pub fn sprites_mut(&mut self) -> &mut SpritePool {
        &mut self.sprites
    }

    /// Renderer pool
    pub const fn renderers(&self) -> &RendererPool {
        &self.renderers
    }

    /// Mutable renderer pool
    pub fn renderers_mut(&mut self) -> &mut RendererPool {
        &mut self.renderers
    }

    /// Load an image file and create a sprite over it
    pub fn create_sprite(&mut self, path: impl AsRef<Path>) -> RenderResult<Handle> {
        self.sprites.create_from_file(path, &mut self.textures)
    }

    /// Create a sprite over an already loaded texture
    pub fn create_sprite_from_texture(&mut self, texture: Handle) -> RenderResult<Handle> {
        self.sprites.create_from_texture(texture, &self.textures)
    }

    /// Create a sprite renderer showing `sprite`
    pub fn create_sprite_renderer(&mut self, sprite: Handle) -> RenderResult<Handle> {
        self.sprites.get(sprite)?;
        self.renderers.create_sprite(Some(sprite))
    }

    /// Project every sprite renderer through `camera`, lowest layer first
    ///
    /// Text renderers, renderers without a sprite and renderers whose sprite
    /// or texture is gone produce no command.
    pub fn build_draw_list(&self, camera: &Camera, screen_width: u32, screen_height: u32) -> Vec<DrawCommand> {
        let width = screen_width as f32;
        let height = screen_height as f32;
        let scale = camera.pixels_per_world_unit(height);

        let mut commands = Vec::with_capacity(self.renderers.len());
        for (handle, record) in self.renderers.draw_order() {
            let RendererKind::Sprite { sprite: Some(sprite) } = record.kind() else {
                continue;
            };
            match self.sprite_command(record, sprite, camera, width, height, scale) {
                Ok(command) => commands.push(command),
                Err(err) => log::warn!("Skipping renderer {handle}: {err}"),
            }
        }

        log::trace!("Built draw list with {} commands", commands.len());
        commands
    }

    fn sprite_command(
        &self,
        record: &RendererRecord,
        sprite: Handle,
        camera: &Camera,
        width: f32,
        height: f32,
        scale: f32,
    ) -> RenderResult<DrawCommand> {
        let sprite = self.sprites.get(sprite)?;
        let texture = self.textures.get(sprite.texture)?;
        let (texture_width, texture_height) = (texture.width as f32, texture.height as f32);

        let center = camera.world_to_screen(record.position, width, height);
        let dst_width = texture_width * record.scale.x * scale / sprite.pixels_per_unit;
        let dst_height = texture_height * record.scale.y * scale / sprite.pixels_per_unit;

        Ok(DrawCommand {
            native: texture.native,
            src: Rect::new(0.0, 0.0, texture_width, texture_height),
            dst: Rect::centered(center, dst_width, dst_height),
            color: record.color,
        })
    }

    /// Release every renderer, sprite and texture
    pub fn shutdown(&mut self) {
        self.renderers.teardown();
        self.sprites.teardown();
        self.textures.unload_all();
        log::info!("Render system shut down");
    }
}

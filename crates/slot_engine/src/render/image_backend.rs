//! CPU texture backend built on the `image` crate
//!
//! Decodes PNG bytes into RGBA8 and keeps the pixels in memory until the
//! texture is destroyed. Useful headless, and as the reference for what a
//! GPU backend has to provide.

use super::texture::{NativeTexture, TextureBackend, TextureUpload};
use super::{RenderError, RenderResult};
use image::RgbaImage;
use std::collections::HashMap;

/// Texture backend holding decoded RGBA8 images in memory
#[derive(Debug, Default)]
pub struct ImageTextureBackend {
    images: HashMap<NativeTexture, RgbaImage>,
    next_id: u64,
}

impl ImageTextureBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoded RGBA8 pixels of a live texture
    pub fn pixels(&self, native: NativeTexture) -> Option<&[u8]> {
        self.images.get(&native).map(|image| image.as_raw().as_slice())
    }

    /// Number of live textures
    pub fn texture_count(&self) -> usize {
        self.images.len()
    }
}

impl TextureBackend for ImageTextureBackend {
    fn create_texture(&mut self, bytes: &[u8]) -> RenderResult<TextureUpload> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| RenderError::Decode(e.to_string()))?
            .to_rgba8();
        let (width, height) = image.dimensions();

        self.next_id += 1;
        let native = NativeTexture(self.next_id);
        self.images.insert(native, image);

        log::trace!("Decoded {width}x{height} image as native texture {}", native.0);
        Ok(TextureUpload { native, width, height })
    }

    fn destroy_texture(&mut self, native: NativeTexture) {
        if self.images.remove(&native).is_none() {
            log::warn!("Destroy requested for unknown native texture {}", native.0);
        }
    }
}

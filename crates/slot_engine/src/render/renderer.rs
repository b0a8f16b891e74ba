//! Renderer pool
//!
//! A renderer is one entry in the draw list: where to draw, how big, what
//! tint, on which layer, and whether it shows a sprite or a text string.
//!
//! Text strings are not stored inline. Each text renderer gets a text id from
//! its own small handle allocator and the string lives in a side table keyed
//! by that id, so renderer records stay `Copy`.

use super::{RenderError, RenderResult};
use crate::foundation::collections::{Handle, HandleAllocator};
use crate::foundation::math::{Color, Vec2};
use crate::foundation::pool::{DenseSlotPool, GrowthPolicy};
use std::collections::HashMap;
use std::fmt;

/// Text ids are minted this many at a time
const TEXT_ID_BATCH: u32 = 16;

/// Renderer kind tag, used when reporting kind mismatches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RendererType {
    /// Draws a sprite
    Sprite,
    /// Draws a text string
    Text,
}

impl fmt::Display for RendererType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sprite => f.write_str("sprite"),
            Self::Text => f.write_str("text"),
        }
    }
}

/// What a renderer draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererKind {
    /// A sprite, or nothing yet
    Sprite {
        /// Sprite to draw
        sprite: Option<Handle>,
    },
    /// A string from the pool's text table
    Text {
        /// Key into the text table
        text: Handle,
    },
}

impl RendererKind {
    /// Kind tag
    pub const fn renderer_type(&self) -> RendererType {
        match self {
            Self::Sprite { .. } => RendererType::Sprite,
            Self::Text { .. } => RendererType::Text,
        }
    }
}

/// One renderer as stored in the pool
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RendererRecord {
    /// World position of the centre
    pub position: Vec2,
    /// Per-axis scale
    pub scale: Vec2,
    /// Tint
    pub color: Color,
    /// Draw layer; lower layers draw first
    pub layer: u8,
    // Owned by the pool; text ids index its side table
    kind: RendererKind,
}

impl RendererRecord {
    fn new(kind: RendererKind) -> Self {
        Self {
            position: Vec2::zeros(),
            scale: Vec2::new(1.0, 1.0),
            color: Color::WHITE,
            layer: 0,
            kind,
        }
    }

    /// Payload; change it through [`RendererPool::set_sprite`] or
    /// [`RendererPool::set_text`]
    pub const fn kind(&self) -> RendererKind {
        self.kind
    }
}

/// Handle-addressed renderers plus their text table
#[derive(Debug)]
pub struct RendererPool {
    renderers: DenseSlotPool<RendererRecord>,
    text_ids: HandleAllocator,
    texts: HashMap<Handle, String>,
}

impl RendererPool {
    /// Create a renderer pool
    pub fn new(capacity: usize, policy: GrowthPolicy) -> Self {
        Self {
            renderers: DenseSlotPool::with_capacity(capacity, policy),
            text_ids: HandleAllocator::new(TEXT_ID_BATCH),
            texts: HashMap::new(),
        }
    }

    /// Create a sprite renderer
    pub fn create_sprite(&mut self, sprite: Option<Handle>) -> RenderResult<Handle> {
        let handle = self
            .renderers
            .insert(RendererRecord::new(RendererKind::Sprite { sprite }))?;
        log::trace!("Created sprite renderer {handle}");
        Ok(handle)
    }

    /// Create a text renderer
    pub fn create_text(&mut self, text: impl Into<String>) -> RenderResult<Handle> {
        let text_id = self.text_ids.next_handle();
        match self.renderers.insert(RendererRecord::new(RendererKind::Text { text: text_id })) {
            Ok(handle) => {
                self.texts.insert(text_id, text.into());
                log::trace!("Created text renderer {handle}");
                Ok(handle)
            }
            Err(err) => {
                self.text_ids.free_handle(text_id);
                Err(err.into())
            }
        }
    }

    /// Destroy a renderer, releasing its text if it has one
    pub fn destroy(&mut self, handle: Handle) -> RenderResult<()> {
        let record = self.renderers.remove(handle)?;
        if let RendererKind::Text { text } = record.kind {
            self.texts.remove(&text);
            self.text_ids.free_handle(text);
        }
        Ok(())
    }

    /// Mutable access to a renderer's transform, tint and layer
    pub fn get(&mut self, handle: Handle) -> RenderResult<&mut RendererRecord> {
        Ok(self.renderers.get(handle)?)
    }

    /// Shared access to a renderer
    pub fn get_ref(&self, handle: Handle) -> RenderResult<&RendererRecord> {
        Ok(self.renderers.get_ref(handle)?)
    }

    /// Whether `handle` names a live renderer
    pub fn contains(&self, handle: Handle) -> bool {
        self.renderers.contains(handle)
    }

    /// Point a sprite renderer at another sprite, or at nothing
    pub fn set_sprite(&mut self, handle: Handle, sprite: Option<Handle>) -> RenderResult<()> {
        let record = self.renderers.get(handle)?;
        match &mut record.kind {
            RendererKind::Sprite { sprite: current } => {
                *current = sprite;
                Ok(())
            }
            RendererKind::Text { .. } => Err(wrong_kind(handle, RendererType::Sprite, RendererType::Text)),
        }
    }

    /// Replace the string of a text renderer
    pub fn set_text(&mut self, handle: Handle, value: impl Into<String>) -> RenderResult<()> {
        match self.renderers.get_ref(handle)?.kind {
            RendererKind::Text { text } => {
                self.texts.insert(text, value.into());
                Ok(())
            }
            RendererKind::Sprite { .. } => Err(wrong_kind(handle, RendererType::Text, RendererType::Sprite)),
        }
    }

    /// String of a text renderer
    pub fn text(&self, handle: Handle) -> RenderResult<&str> {
        match self.renderers.get_ref(handle)?.kind {
            RendererKind::Text { text } => Ok(self.texts.get(&text).map_or("", String::as_str)),
            RendererKind::Sprite { .. } => Err(wrong_kind(handle, RendererType::Text, RendererType::Sprite)),
        }
    }

    /// Live renderers sorted by layer
    ///
    /// Renderers on the same layer keep their storage order.
    pub fn draw_order(&self) -> Vec<(Handle, &RendererRecord)> {
        let mut ordered: Vec<_> = self.renderers.iter().collect();
        ordered.sort_by_key(|(_, record)| record.layer);
        ordered
    }

    /// Number of live renderers
    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    /// Whether no renderer exists
    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Release every renderer and its text
    pub fn teardown(&mut self) {
        self.renderers.teardown();
        self.texts.clear();
        self.text_ids = HandleAllocator::new(TEXT_ID_BATCH);
    }
}

const fn wrong_kind(handle: Handle, expected: RendererType, found: RendererType) -> RenderError {
    RenderError::WrongRendererKind { handle, expected, found }
}

//! Collider records stored in the collider slot pool

use crate::foundation::collections::Handle;
use crate::foundation::math::Vec2;
use std::fmt;

/// Default box width and height
pub const DEFAULT_BOX_SIZE: f32 = 1.0;

/// Default circle radius
pub const DEFAULT_CIRCLE_RADIUS: f32 = 1.0;

/// Shape tag, used when reporting shape mismatches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Axis-aligned box
    Box,
    /// Circle
    Circle,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Box => f.write_str("box"),
            Self::Circle => f.write_str("circle"),
        }
    }
}

/// Collider geometry, centred on the record's position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// Axis-aligned box; `width` and `height` are full extents
    Box {
        /// Full width
        width: f32,
        /// Full height
        height: f32,
    },
    /// Circle
    Circle {
        /// Radius
        radius: f32,
    },
}

impl ColliderShape {
    /// A 1×1 box
    pub const fn default_box() -> Self {
        Self::Box {
            width: DEFAULT_BOX_SIZE,
            height: DEFAULT_BOX_SIZE,
        }
    }

    /// A circle of radius 1
    pub const fn default_circle() -> Self {
        Self::Circle {
            radius: DEFAULT_CIRCLE_RADIUS,
        }
    }

    /// Shape tag
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Box { .. } => ShapeKind::Box,
            Self::Circle { .. } => ShapeKind::Circle,
        }
    }
}

/// One collider as stored in the pool
///
/// The handle is stored inline so the detection pass can iterate the dense
/// slice without going back through the pool's index maps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderRecord {
    /// Handle this record is registered under
    pub handle: Handle,
    /// Centre position in world space
    pub position: Vec2,
    /// Geometry
    pub shape: ColliderShape,
}

impl ColliderRecord {
    /// Create a collider at the origin
    pub fn new(handle: Handle, shape: ColliderShape) -> Self {
        Self {
            handle,
            position: Vec2::zeros(),
            shape,
        }
    }

    /// Move the collider to `position`
    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Shape tag
    pub const fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }
}

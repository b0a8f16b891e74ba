//! Physics module for 2D collision detection
//!
//! Colliders are boxes or circles stored in a dense slot pool. Each step
//! tests every pair once and records, per collider, which handles it touches.
//! Owners turn those lists into Enter/Stay/Exit events with a
//! [`CollisionHistory`].

pub mod collider;
pub mod collision;
pub mod collision_events;
pub mod physics_system;

pub use collider::{ColliderRecord, ColliderShape, ShapeKind};
pub use collision::{detect_collisions, Aabb, CollisionPair};
pub use collision_events::{CollisionContact, CollisionEvents, CollisionHistory};
pub use physics_system::PhysicsSystem;

use crate::foundation::collections::Handle;
use crate::foundation::pool::PoolError;
use thiserror::Error;

/// Physics errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Collider pool failure
    #[error("Collider pool: {0}")]
    Pool(#[from] PoolError),

    /// Shape-specific accessor used on the wrong kind of collider
    #[error("Collider {handle} is a {found}, expected a {expected}")]
    WrongShapeKind {
        /// Collider that was accessed
        handle: Handle,
        /// Kind the accessor works on
        expected: ShapeKind,
        /// Kind the collider actually has
        found: ShapeKind,
    },

    /// Negative or non-finite size, or non-finite position
    #[error("Invalid collider {field}: {value}")]
    InvalidGeometry {
        /// Rejected quantity
        field: &'static str,
        /// Rejected value
        value: f32,
    },
}

impl PhysicsError {
    /// Whether the error reports an unknown collider handle
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Pool(PoolError::NotFound(_)))
    }
}

/// Result type for physics operations
pub type PhysicsResult<T> = Result<T, PhysicsError>;

//! Collision detection
//!
//! Every pair of live colliders is tested once per step. There is no
//! broad phase: the scan is a full `n * (n - 1) / 2` sweep over the dense
//! collider slice, followed by a shape-dispatched narrow-phase test.
//!
//! Touching shapes count as overlapping in every predicate.

use super::collider::{ColliderRecord, ColliderShape};
use crate::foundation::collections::Handle;
use crate::foundation::math::{utils, Vec2};

/// Two colliders that overlap during the current step
///
/// The pair is unordered; the smaller handle is always stored first so equal
/// pairs compare equal regardless of scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    /// Smaller handle
    pub a: Handle,
    /// Larger handle
    pub b: Handle,
}

impl CollisionPair {
    /// Create a normalized pair
    pub fn new(a: Handle, b: Handle) -> Self {
        if a <= b {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }

    /// The other member of the pair, if `handle` is one of them
    pub fn other(&self, handle: Handle) -> Option<Handle> {
        if handle == self.a {
            Some(self.b)
        } else if handle == self.b {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Axis-aligned bounds of a box collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Lower-left corner
    pub min: Vec2,
    /// Upper-right corner
    pub max: Vec2,
}

impl Aabb {
    /// Bounds of a box centred on `center` with full extents `width` × `height`
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        let half = Vec2::new(width * 0.5, height * 0.5);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Whether the two boxes overlap or touch
    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y)
    }

    /// Closest point inside the box to `point`
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        utils::clamp_to_box(point, self.min, self.max)
    }
}

/// Box–box overlap
pub fn box_box(a_center: Vec2, a_width: f32, a_height: f32, b_center: Vec2, b_width: f32, b_height: f32) -> bool {
    Aabb::from_center(a_center, a_width, a_height)
        .overlaps(&Aabb::from_center(b_center, b_width, b_height))
}

/// Box–circle overlap
pub fn box_circle(box_center: Vec2, width: f32, height: f32, circle_center: Vec2, radius: f32) -> bool {
    let closest = Aabb::from_center(box_center, width, height).closest_point(circle_center);
    (circle_center - closest).norm_squared() <= radius * radius
}

/// Circle–circle overlap
pub fn circle_circle(a_center: Vec2, a_radius: f32, b_center: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    (b_center - a_center).norm_squared() <= reach * reach
}

/// Narrow-phase test between two colliders
pub fn overlaps(a: &ColliderRecord, b: &ColliderRecord) -> bool {
    match (a.shape, b.shape) {
        (
            ColliderShape::Box { width: aw, height: ah },
            ColliderShape::Box { width: bw, height: bh },
        ) => box_box(a.position, aw, ah, b.position, bw, bh),

        (ColliderShape::Box { width, height }, ColliderShape::Circle { radius }) => {
            box_circle(a.position, width, height, b.position, radius)
        }

        (ColliderShape::Circle { radius }, ColliderShape::Box { width, height }) => {
            box_circle(b.position, width, height, a.position, radius)
        }

        (ColliderShape::Circle { radius: ar }, ColliderShape::Circle { radius: br }) => {
            circle_circle(a.position, ar, b.position, br)
        }
    }
}

/// Find every overlapping pair among `colliders`
///
/// Pairs carry handles, not slot indices, so they stay meaningful after the
/// pool reorders its storage.
pub fn detect_collisions(colliders: &[ColliderRecord]) -> Vec<CollisionPair> {
    let mut pairs = Vec::new();

    for (i, a) in colliders.iter().enumerate() {
        for b in &colliders[i + 1..] {
            if overlaps(a, b) {
                pairs.push(CollisionPair::new(a.handle, b.handle));
            }
        }
    }

    pairs
}

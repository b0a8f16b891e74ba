//! Physics system
//!
//! Owns the collider pool and the per-step collision map. This is the
//! surface the scene layer talks to: create and destroy colliders, move
//! them, run one detection step, then ask which handles touch a collider.
//!
//! A step runs in three phases, each to completion before the next:
//!
//! 1. detection over the dense collider slice ([`detect_collisions`])
//! 2. fan-out of the pair list into handle → neighbours
//! 3. per-collider classification, driven by the owner through
//!    [`PhysicsSystem::process_collisions`]

use super::collider::{ColliderRecord, ColliderShape, ShapeKind};
use super::collision::{detect_collisions, CollisionPair};
use super::collision_events::{CollisionEvents, CollisionHistory};
use super::{PhysicsError, PhysicsResult};
use crate::core::config::PhysicsConfig;
use crate::foundation::collections::Handle;
use crate::foundation::math::Vec2;
use crate::foundation::pool::{DenseSlotPool, GrowthPolicy};
use std::collections::HashMap;

/// Neighbour lists start with room for this many handles
const NEIGHBOUR_LIST_CAPACITY: usize = 8;

/// Collider storage plus the results of the latest step
pub struct PhysicsSystem {
    colliders: DenseSlotPool<ColliderRecord>,
    collisions: HashMap<Handle, Vec<Handle>>,
    pairs: Vec<CollisionPair>,
    step_count: u64,
}

impl PhysicsSystem {
    /// Create a physics system from configuration
    pub fn new(config: &PhysicsConfig) -> Self {
        let policy = GrowthPolicy::from_auto_grow(config.auto_grow);
        log::info!(
            "Physics system initialized (collider capacity {}, {:?})",
            config.collider_capacity,
            policy
        );
        Self {
            colliders: DenseSlotPool::with_capacity(config.collider_capacity, policy),
            collisions: HashMap::with_capacity(config.collider_capacity),
            pairs: Vec::new(),
            step_count: 0,
        }
    }

    /// Create a 1×1 box collider at the origin
    pub fn create_box_collider(&mut self) -> PhysicsResult<Handle> {
        self.create_collider(ColliderShape::default_box())
    }

    /// Create a radius-1 circle collider at the origin
    pub fn create_circle_collider(&mut self) -> PhysicsResult<Handle> {
        self.create_collider(ColliderShape::default_circle())
    }

    /// Create a collider with an explicit shape
    pub fn create_collider(&mut self, shape: ColliderShape) -> PhysicsResult<Handle> {
        match shape {
            ColliderShape::Box { width, height } => {
                check_extent("width", width)?;
                check_extent("height", height)?;
            }
            ColliderShape::Circle { radius } => {
                check_extent("radius", radius)?;
            }
        }
        let handle = self
            .colliders
            .insert_with(|handle| ColliderRecord::new(handle, shape))?;
        log::trace!("Created {} collider {handle}", shape.kind());
        Ok(handle)
    }

    /// Destroy a collider
    ///
    /// Neighbour lists from the current step keep the handle until the next
    /// step; classification reports it as detached.
    ///
    /// The handle is the first one reused by the next create. A collider
    /// created before its neighbours run classification takes over the
    /// destroyed one's contacts, so they read as attached stays.
    pub fn destroy_collider(&mut self, handle: Handle) -> PhysicsResult<()> {
        self.colliders.remove(handle)?;
        log::trace!("Destroyed collider {handle}");
        Ok(())
    }

    /// Whether `handle` names a live collider
    pub fn has_collider(&self, handle: Handle) -> bool {
        self.colliders.contains(handle)
    }

    /// Number of live colliders
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Read-only view of a collider record
    pub fn collider(&self, handle: Handle) -> PhysicsResult<&ColliderRecord> {
        Ok(self.colliders.get_ref(handle)?)
    }

    /// Live collider records in storage order
    pub fn colliders(&self) -> &[ColliderRecord] {
        self.colliders.as_slice()
    }

    /// Centre position of a collider
    pub fn collider_position(&self, handle: Handle) -> PhysicsResult<Vec2> {
        Ok(self.colliders.get_ref(handle)?.position)
    }

    /// Move a collider
    pub fn set_collider_position(&mut self, handle: Handle, position: Vec2) -> PhysicsResult<()> {
        if !position.x.is_finite() {
            return Err(invalid("position.x", position.x));
        }
        if !position.y.is_finite() {
            return Err(invalid("position.y", position.y));
        }
        self.colliders.get(handle)?.position = position;
        Ok(())
    }

    /// Width of a box collider
    pub fn collider_width(&self, handle: Handle) -> PhysicsResult<f32> {
        match self.colliders.get_ref(handle)?.shape {
            ColliderShape::Box { width, .. } => Ok(width),
            ColliderShape::Circle { .. } => Err(wrong_shape(handle, ShapeKind::Box, ShapeKind::Circle)),
        }
    }

    /// Resize a box collider horizontally
    pub fn set_collider_width(&mut self, handle: Handle, value: f32) -> PhysicsResult<()> {
        check_extent("width", value)?;
        match &mut self.colliders.get(handle)?.shape {
            ColliderShape::Box { width, .. } => {
                *width = value;
                Ok(())
            }
            ColliderShape::Circle { .. } => Err(wrong_shape(handle, ShapeKind::Box, ShapeKind::Circle)),
        }
    }

    /// Height of a box collider
    pub fn collider_height(&self, handle: Handle) -> PhysicsResult<f32> {
        match self.colliders.get_ref(handle)?.shape {
            ColliderShape::Box { height, .. } => Ok(height),
            ColliderShape::Circle { .. } => Err(wrong_shape(handle, ShapeKind::Box, ShapeKind::Circle)),
        }
    }

    /// Resize a box collider vertically
    pub fn set_collider_height(&mut self, handle: Handle, value: f32) -> PhysicsResult<()> {
        check_extent("height", value)?;
        match &mut self.colliders.get(handle)?.shape {
            ColliderShape::Box { height, .. } => {
                *height = value;
                Ok(())
            }
            ColliderShape::Circle { .. } => Err(wrong_shape(handle, ShapeKind::Box, ShapeKind::Circle)),
        }
    }

    /// Radius of a circle collider
    pub fn collider_radius(&self, handle: Handle) -> PhysicsResult<f32> {
        match self.colliders.get_ref(handle)?.shape {
            ColliderShape::Circle { radius } => Ok(radius),
            ColliderShape::Box { .. } => Err(wrong_shape(handle, ShapeKind::Circle, ShapeKind::Box)),
        }
    }

    /// Resize a circle collider
    pub fn set_collider_radius(&mut self, handle: Handle, value: f32) -> PhysicsResult<()> {
        check_extent("radius", value)?;
        match &mut self.colliders.get(handle)?.shape {
            ColliderShape::Circle { radius } => {
                *radius = value;
                Ok(())
            }
            ColliderShape::Box { .. } => Err(wrong_shape(handle, ShapeKind::Circle, ShapeKind::Box)),
        }
    }

    /// Run collision detection for every live collider
    ///
    /// All positions must be up to date before calling. Replaces the
    /// results of the previous step.
    pub fn simulate_step(&mut self) {
        for neighbours in self.collisions.values_mut() {
            neighbours.clear();
        }
        self.collisions.retain(|handle, _| self.colliders.contains(*handle));

        self.pairs = detect_collisions(self.colliders.as_slice());

        for pair in &self.pairs {
            self.collisions
                .entry(pair.a)
                .or_insert_with(|| Vec::with_capacity(NEIGHBOUR_LIST_CAPACITY))
                .push(pair.b);
            self.collisions
                .entry(pair.b)
                .or_insert_with(|| Vec::with_capacity(NEIGHBOUR_LIST_CAPACITY))
                .push(pair.a);
        }

        self.step_count += 1;
        log::debug!(
            "Physics step {}: {} colliders, {} pairs",
            self.step_count,
            self.colliders.len(),
            self.pairs.len()
        );
    }

    /// Handles overlapping `handle` during the latest step
    ///
    /// Unknown handles and colliders without contacts yield an empty slice.
    pub fn collisions_for(&self, handle: Handle) -> &[Handle] {
        self.collisions
            .get(&handle)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Raw pair list of the latest step
    pub fn collision_pairs(&self) -> &[CollisionPair] {
        &self.pairs
    }

    /// Classify the latest step's contacts for `handle` into Enter/Stay/Exit
    ///
    /// Contacts whose collider has since been destroyed come back detached.
    pub fn process_collisions<'h>(
        &self,
        handle: Handle,
        history: &'h mut CollisionHistory,
    ) -> &'h CollisionEvents {
        history.process(self.collisions_for(handle), |other| self.colliders.contains(other))
    }

    /// Number of completed steps
    pub const fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Release all colliders; later calls fail with a not-initialized error
    pub fn shutdown(&mut self) {
        self.colliders.teardown();
        self.collisions.clear();
        self.pairs.clear();
        log::info!("Physics system shut down after {} steps", self.step_count);
    }
}

const fn invalid(field: &'static str, value: f32) -> PhysicsError {
    PhysicsError::InvalidGeometry { field, value }
}

/// Sizes must be finite and not negative
fn check_extent(field: &'static str, value: f32) -> PhysicsResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value))
    }
}

const fn wrong_shape(handle: Handle, expected: ShapeKind, found: ShapeKind) -> PhysicsError {
    PhysicsError::WrongShapeKind { handle, expected, found }
}

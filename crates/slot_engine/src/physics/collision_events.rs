//! Enter/Stay/Exit classification
//!
//! Each collider owner keeps a [`CollisionHistory`]. Once per step it is fed
//! the handles currently touching its collider; the history diffs them
//! against the previous step and fills three event lists.

use crate::foundation::collections::Handle;

/// The other side of a collision event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionContact {
    /// Handle of the other collider as observed during detection
    pub handle: Handle,
    attached: bool,
}

impl CollisionContact {
    /// Contact whose collider is still live
    pub const fn attached(handle: Handle) -> Self {
        Self { handle, attached: true }
    }

    /// Contact whose collider was destroyed before classification
    pub const fn detached(handle: Handle) -> Self {
        Self { handle, attached: false }
    }

    /// The live collider, or `None` for a detached contact
    pub const fn collider(&self) -> Option<Handle> {
        if self.attached {
            Some(self.handle)
        } else {
            None
        }
    }

    /// Whether the other collider no longer exists
    pub const fn is_detached(&self) -> bool {
        !self.attached
    }
}

/// Events produced for one collider in one step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionEvents {
    /// Contacts that started this step
    pub entered: Vec<CollisionContact>,
    /// Contacts that continued from the previous step
    pub stayed: Vec<CollisionContact>,
    /// Contacts that ended this step
    pub exited: Vec<CollisionContact>,
}

impl CollisionEvents {
    /// Whether no event of any kind was produced
    pub fn is_empty(&self) -> bool {
        self.entered.is_empty() && self.stayed.is_empty() && self.exited.is_empty()
    }

    fn clear(&mut self) {
        self.entered.clear();
        self.stayed.clear();
        self.exited.clear();
    }
}

/// Previous-step neighbour set plus the latest events for one collider
#[derive(Debug, Clone, Default)]
pub struct CollisionHistory {
    previous: Vec<Handle>,
    scratch: Vec<Handle>,
    events: CollisionEvents,
}

impl CollisionHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `current` against the previous step
    ///
    /// `is_live` reports whether a handle still names a collider; contacts
    /// for which it returns false are reported as detached.
    pub fn process(&mut self, current: &[Handle], is_live: impl Fn(Handle) -> bool) -> &CollisionEvents {
        self.events.clear();
        self.scratch.clear();
        self.scratch.extend_from_slice(&self.previous);

        let contact = |handle: Handle| {
            if is_live(handle) {
                CollisionContact::attached(handle)
            } else {
                CollisionContact::detached(handle)
            }
        };

        for &handle in current {
            if let Some(index) = self.scratch.iter().position(|&h| h == handle) {
                self.scratch.swap_remove(index);
                self.events.stayed.push(contact(handle));
            } else {
                self.events.entered.push(contact(handle));
            }
        }

        for &handle in &self.scratch {
            self.events.exited.push(contact(handle));
        }

        self.previous.clear();
        self.previous.extend_from_slice(current);

        &self.events
    }

    /// Events from the latest [`process`](Self::process) call
    pub const fn events(&self) -> &CollisionEvents {
        &self.events
    }

    /// Neighbours recorded during the latest step
    pub fn previous(&self) -> &[Handle] {
        &self.previous
    }

    /// Forget all recorded neighbours and events
    pub fn reset(&mut self) {
        self.previous.clear();
        self.scratch.clear();
        self.events.clear();
    }
}

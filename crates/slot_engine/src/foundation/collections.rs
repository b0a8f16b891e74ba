//! Handle types and handle recycling

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of handles minted per batch
pub const DEFAULT_HANDLE_BATCH: u32 = 64;

/// Opaque integer identifying one logical record for its whole lifetime
///
/// A handle never changes when the record it names is moved inside a pool.
/// Once freed, the value may be handed out again for a different record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Handle(u32);

impl Handle {
    /// Create a handle from its raw value
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw integer value
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues and recycles handles independently of storage position
///
/// Handles are minted in batches of `batch_size` sequential integers and kept
/// on a stack. Freed handles are pushed on top of the stack, so the most
/// recently freed handle is reused first. Reuse order is otherwise
/// unspecified; the only guarantee is that a handle is never live twice.
#[derive(Debug, Clone)]
pub struct HandleAllocator {
    free: Vec<u32>,
    next_unminted: u32,
    batch_size: u32,
}

impl HandleAllocator {
    /// Create an allocator minting `batch_size` handles at a time
    pub fn new(batch_size: u32) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            free: Vec::with_capacity(batch_size as usize),
            next_unminted: 0,
            batch_size,
        }
    }

    /// Get a handle that is not currently live
    pub fn next_handle(&mut self) -> Handle {
        match self.free.pop() {
            Some(raw) => Handle(raw),
            None => Handle(self.mint_batch()),
        }
    }

    /// Return a handle to the recycle stack
    ///
    /// The caller guarantees the handle is live; freeing it twice would let
    /// two records share it.
    pub fn free_handle(&mut self, handle: Handle) {
        debug_assert!(
            !self.free.contains(&handle.0),
            "handle {handle} freed twice"
        );
        self.free.push(handle.0);
    }

    /// Number of handles waiting on the recycle stack
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Highest raw value ever minted, exclusive
    pub fn minted(&self) -> u32 {
        self.next_unminted
    }

    /// Batch size used when the stack runs dry
    pub fn batch_size(&self) -> u32 {
        self.batch_size
    }

    /// Mint the next batch, returning its lowest value and stacking the rest
    /// so the next-lowest sits on top
    fn mint_batch(&mut self) -> u32 {
        let start = self.next_unminted;
        // The last batch is cut short at u32::MAX, which is never minted
        let end = start.saturating_add(self.batch_size);
        debug_assert!(end > start, "handle space exhausted after {start} handles");
        self.free.extend((start + 1..end).rev());
        self.next_unminted = end;
        log::trace!("Minted handles {start}..{end}");
        start
    }
}

impl Default for HandleAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_HANDLE_BATCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_handles_are_sequential_within_batch() {
        let mut allocator = HandleAllocator::new(4);
        let handles: Vec<u32> = (0..4).map(|_| allocator.next_handle().raw()).collect();
        assert_eq!(handles, vec![0, 1, 2, 3]);
        assert_eq!(allocator.minted(), 4);
    }

    #[test]
    fn test_new_batch_starts_at_highest_minted() {
        let mut allocator = HandleAllocator::new(2);
        assert_eq!(allocator.available(), 0);
        allocator.next_handle();
        assert_eq!(allocator.available(), 1);
        allocator.next_handle();
        assert_eq!(allocator.available(), 0);

        let third = allocator.next_handle();
        assert_eq!(third.raw(), 2);
        assert_eq!(allocator.minted(), 4);
    }

    #[test]
    fn test_freed_handle_is_reused_first() {
        let mut allocator = HandleAllocator::new(8);
        let a = allocator.next_handle();
        let _b = allocator.next_handle();
        allocator.free_handle(a);
        assert_eq!(allocator.next_handle(), a);
    }

    #[test]
    fn test_zero_batch_is_clamped() {
        let mut allocator = HandleAllocator::new(0);
        assert_eq!(allocator.batch_size(), 1);
        let a = allocator.next_handle();
        let b = allocator.next_handle();
        assert_ne!(a, b);
    }

    #[test]
    fn test_last_batch_stops_short_of_max() {
        let mut allocator = HandleAllocator::new(64);
        allocator.next_unminted = u32::MAX - 2;

        assert_eq!(allocator.next_handle().raw(), u32::MAX - 2);
        assert_eq!(allocator.minted(), u32::MAX);
        assert_eq!(allocator.available(), 1);
        assert_eq!(allocator.next_handle().raw(), u32::MAX - 1);
    }

    #[test]
    fn test_live_handles_never_collide() {
        let mut allocator = HandleAllocator::new(3);
        let mut live = HashSet::new();
        for round in 0..50u32 {
            let handle = allocator.next_handle();
            assert!(live.insert(handle), "handle {handle} issued while live");
            if round % 3 == 0 {
                let victim = *live.iter().next().unwrap();
                live.remove(&victim);
                allocator.free_handle(victim);
            }
        }
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(Handle::from_raw(7).to_string(), "#7");
    }
}

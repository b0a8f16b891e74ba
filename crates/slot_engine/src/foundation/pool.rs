//! Dense slot pool
//!
//! Stores homogeneous records contiguously and addresses each one through a
//! [`Handle`] that stays valid while the record moves around in storage.
//!
//! # Architecture
//!
//! ```text
//! handle ──handle_to_slot──► slot ──records──► R
//!    ▲                         │
//!    └──────slot_to_handle─────┘
//! ```
//!
//! Removal is O(1): the last record is moved into the vacated slot and both
//! index maps are patched for the moved record. Storage order is therefore
//! not preserved across removals.
//!
//! References returned by [`DenseSlotPool::get`] or [`DenseSlotPool::as_slice`]
//! borrow the pool, so any call that may move records (`insert`, `remove`,
//! `ensure_capacity`) cannot happen while they are alive. Hold handles, not
//! references, across such calls.

use super::collections::{Handle, HandleAllocator, DEFAULT_HANDLE_BATCH};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// What a pool does when `insert` finds it full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthPolicy {
    /// Fail with [`PoolError::CapacityExceeded`]
    Fixed,
    /// Double the capacity and continue
    AutoGrow,
}

impl GrowthPolicy {
    /// Map a config flag onto a policy
    pub const fn from_auto_grow(auto_grow: bool) -> Self {
        if auto_grow {
            Self::AutoGrow
        } else {
            Self::Fixed
        }
    }
}

/// Slot pool errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// `initialize` called on a pool that is already set up
    #[error("pool is already initialized")]
    AlreadyInitialized,

    /// Operation on a pool that was never initialized or has been torn down
    #[error("pool is not initialized")]
    NotInitialized,

    /// The handle does not name a live record
    #[error("no live record for handle {0}")]
    NotFound(Handle),

    /// A fixed-size pool is full
    #[error("pool capacity of {capacity} exceeded")]
    CapacityExceeded {
        /// Capacity at the time of the failed insert
        capacity: usize,
    },
}

/// Result type for pool operations
pub type PoolResult<T> = Result<T, PoolError>;

#[derive(Debug)]
struct PoolStorage<R> {
    records: Vec<R>,
    handle_to_slot: HashMap<Handle, usize>,
    slot_to_handle: Vec<Handle>,
    handles: HandleAllocator,
    capacity: usize,
    policy: GrowthPolicy,
}

/// Contiguous growable record storage addressed by stable handles
#[derive(Debug)]
pub struct DenseSlotPool<R> {
    storage: Option<PoolStorage<R>>,
}

impl<R> DenseSlotPool<R> {
    /// Create an uninitialized pool; call [`initialize`](Self::initialize) before use
    pub const fn new() -> Self {
        Self { storage: None }
    }

    /// Create and initialize a pool in one step
    pub fn with_capacity(capacity: usize, policy: GrowthPolicy) -> Self {
        Self {
            storage: Some(PoolStorage::new(capacity, policy)),
        }
    }

    /// Allocate storage for `capacity` records
    ///
    /// The handle allocator mints `min(64, capacity)` handles per batch.
    pub fn initialize(&mut self, capacity: usize, policy: GrowthPolicy) -> PoolResult<()> {
        if self.storage.is_some() {
            return Err(PoolError::AlreadyInitialized);
        }
        self.storage = Some(PoolStorage::new(capacity, policy));
        log::debug!("Initialized slot pool with capacity {capacity} ({policy:?})");
        Ok(())
    }

    /// Whether the pool currently owns storage
    pub const fn is_initialized(&self) -> bool {
        self.storage.is_some()
    }

    /// Store a record and return its new handle
    pub fn insert(&mut self, value: R) -> PoolResult<Handle> {
        self.insert_with(|_| value)
    }

    /// Store a record built from its own handle
    ///
    /// Useful for records that carry their handle inline.
    pub fn insert_with(&mut self, build: impl FnOnce(Handle) -> R) -> PoolResult<Handle> {
        let storage = self.storage_mut()?;

        if storage.records.len() >= storage.capacity {
            match storage.policy {
                GrowthPolicy::AutoGrow => {
                    let doubled = (storage.capacity * 2).max(1);
                    storage.grow_to(doubled);
                }
                GrowthPolicy::Fixed => {
                    return Err(PoolError::CapacityExceeded {
                        capacity: storage.capacity,
                    });
                }
            }
        }

        let handle = storage.handles.next_handle();
        let slot = storage.records.len();
        storage.records.push(build(handle));
        storage.handle_to_slot.insert(handle, slot);
        storage.slot_to_handle.push(handle);

        Ok(handle)
    }

    /// Remove a record, moving the last record into its slot
    pub fn remove(&mut self, handle: Handle) -> PoolResult<R> {
        let storage = self.storage_mut()?;
        let slot = storage
            .handle_to_slot
            .remove(&handle)
            .ok_or(PoolError::NotFound(handle))?;

        let removed = storage.records.swap_remove(slot);
        storage.slot_to_handle.swap_remove(slot);

        // A record was moved down from the end unless we removed the last slot
        if let Some(&moved) = storage.slot_to_handle.get(slot) {
            storage.handle_to_slot.insert(moved, slot);
        }

        storage.handles.free_handle(handle);
        Ok(removed)
    }

    /// Get exclusive access to a record
    pub fn get(&mut self, handle: Handle) -> PoolResult<&mut R> {
        let storage = self.storage_mut()?;
        let slot = storage.slot_of(handle)?;
        Ok(&mut storage.records[slot])
    }

    /// Get shared access to a record
    pub fn get_ref(&self, handle: Handle) -> PoolResult<&R> {
        let storage = self.storage_ref()?;
        let slot = storage.slot_of(handle)?;
        Ok(&storage.records[slot])
    }

    /// Whether `handle` names a live record
    pub fn contains(&self, handle: Handle) -> bool {
        self.storage
            .as_ref()
            .is_some_and(|storage| storage.handle_to_slot.contains_key(&handle))
    }

    /// Handle of the record currently stored at `slot`
    pub fn handle_at(&self, slot: usize) -> Option<Handle> {
        self.storage.as_ref()?.slot_to_handle.get(slot).copied()
    }

    /// Live records in storage order
    pub fn as_slice(&self) -> &[R] {
        self.storage
            .as_ref()
            .map(|storage| storage.records.as_slice())
            .unwrap_or_default()
    }

    /// Live records in storage order, mutable
    pub fn as_mut_slice(&mut self) -> &mut [R] {
        match self.storage.as_mut() {
            Some(storage) => storage.records.as_mut_slice(),
            None => &mut [],
        }
    }

    /// Iterate `(handle, record)` pairs in storage order
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &R)> {
        self.handles().iter().copied().zip(self.as_slice())
    }

    /// Handles of all live records in storage order
    pub fn handles(&self) -> &[Handle] {
        self.storage
            .as_ref()
            .map(|storage| storage.slot_to_handle.as_slice())
            .unwrap_or_default()
    }

    /// Grow storage so it can hold at least `capacity` records
    ///
    /// Handles stay valid. Records are moved to new storage.
    pub fn ensure_capacity(&mut self, capacity: usize) -> PoolResult<()> {
        let storage = self.storage_mut()?;
        if capacity > storage.capacity {
            storage.grow_to(capacity);
        }
        Ok(())
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether the pool holds no live records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of records the pool can hold before growing
    pub fn capacity(&self) -> usize {
        self.storage.as_ref().map_or(0, |storage| storage.capacity)
    }

    /// Free slots left before the next insert grows or fails
    pub fn capacity_left(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Release all storage, invalidating every handle
    pub fn teardown(&mut self) {
        self.teardown_with(|_, _| {});
    }

    /// Release all storage, handing each live record to `release` first
    pub fn teardown_with(&mut self, mut release: impl FnMut(Handle, R)) {
        if let Some(storage) = self.storage.take() {
            let count = storage.records.len();
            for (handle, record) in storage.slot_to_handle.into_iter().zip(storage.records) {
                release(handle, record);
            }
            log::debug!("Tore down slot pool holding {count} records");
        }
    }

    fn storage_ref(&self) -> PoolResult<&PoolStorage<R>> {
        self.storage.as_ref().ok_or(PoolError::NotInitialized)
    }

    fn storage_mut(&mut self) -> PoolResult<&mut PoolStorage<R>> {
        self.storage.as_mut().ok_or(PoolError::NotInitialized)
    }
}

impl<R> Default for DenseSlotPool<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> PoolStorage<R> {
    fn new(capacity: usize, policy: GrowthPolicy) -> Self {
        let batch = u32::try_from(capacity)
            .unwrap_or(DEFAULT_HANDLE_BATCH)
            .min(DEFAULT_HANDLE_BATCH);
        Self {
            records: Vec::with_capacity(capacity),
            handle_to_slot: HashMap::with_capacity(capacity),
            slot_to_handle: Vec::with_capacity(capacity),
            handles: HandleAllocator::new(batch),
            capacity,
            policy,
        }
    }

    fn slot_of(&self, handle: Handle) -> PoolResult<usize> {
        self.handle_to_slot
            .get(&handle)
            .copied()
            .ok_or(PoolError::NotFound(handle))
    }

    /// Move live records into fresh storage of exactly `capacity` slots
    fn grow_to(&mut self, capacity: usize) {
        let mut records = Vec::with_capacity(capacity);
        records.append(&mut self.records);
        self.records = records;

        self.slot_to_handle
            .reserve_exact(capacity - self.slot_to_handle.len());
        self.handle_to_slot
            .reserve(capacity - self.handle_to_slot.len());

        log::debug!(
            "Slot pool grew from {} to {} slots ({} live)",
            self.capacity,
            capacity,
            self.records.len()
        );
        self.capacity = capacity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn pool(capacity: usize, policy: GrowthPolicy) -> DenseSlotPool<u32> {
        DenseSlotPool::with_capacity(capacity, policy)
    }

    fn assert_maps_consistent(pool: &DenseSlotPool<u32>) {
        for (slot, &handle) in pool.handles().iter().enumerate() {
            assert_eq!(pool.handle_at(slot), Some(handle));
            assert!(pool.contains(handle));
        }
        let unique: HashSet<_> = pool.handles().iter().collect();
        assert_eq!(unique.len(), pool.len());
    }

    #[test]
    fn test_initialize_twice_fails() {
        let mut pool = DenseSlotPool::<u32>::new();
        assert!(!pool.is_initialized());
        pool.initialize(4, GrowthPolicy::Fixed).unwrap();
        assert_eq!(
            pool.initialize(4, GrowthPolicy::Fixed),
            Err(PoolError::AlreadyInitialized)
        );
    }

    #[test]
    fn test_uninitialized_pool_rejects_operations() {
        let mut pool = DenseSlotPool::<u32>::new();
        assert_eq!(pool.insert(1), Err(PoolError::NotInitialized));
        assert_eq!(pool.remove(Handle::from_raw(0)), Err(PoolError::NotInitialized));
        assert!(pool.as_slice().is_empty());
        assert_eq!(pool.capacity(), 0);
    }

    #[test]
    fn test_insert_then_get_round_trip() {
        let mut pool = pool(4, GrowthPolicy::Fixed);
        let handle = pool.insert(42).unwrap();
        assert_eq!(*pool.get(handle).unwrap(), 42);
        assert_eq!(*pool.get_ref(handle).unwrap(), 42);
    }

    #[test]
    fn test_get_allows_in_place_mutation() {
        let mut pool = pool(4, GrowthPolicy::Fixed);
        let handle = pool.insert(1).unwrap();
        *pool.get(handle).unwrap() = 9;
        assert_eq!(pool.as_slice(), &[9]);
    }

    #[test]
    fn test_fixed_pool_reports_capacity_exceeded() {
        let mut pool = pool(2, GrowthPolicy::Fixed);
        pool.insert(1).unwrap();
        pool.insert(2).unwrap();
        assert_eq!(
            pool.insert(3),
            Err(PoolError::CapacityExceeded { capacity: 2 })
        );
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_auto_grow_doubles_capacity() {
        let mut pool = pool(2, GrowthPolicy::AutoGrow);
        for value in 0..3 {
            pool.insert(value).unwrap();
        }
        assert_eq!(pool.capacity(), 4);
        assert_eq!(pool.capacity_left(), 1);
    }

    #[test]
    fn test_auto_grow_from_zero_capacity() {
        let mut pool = pool(0, GrowthPolicy::AutoGrow);
        pool.insert(5).unwrap();
        assert_eq!(pool.capacity(), 1);
    }

    #[test]
    fn test_remove_last_slot() {
        let mut pool = pool(4, GrowthPolicy::Fixed);
        let a = pool.insert(1).unwrap();
        let b = pool.insert(2).unwrap();
        assert_eq!(pool.remove(b), Ok(2));
        assert_eq!(pool.as_slice(), &[1]);
        assert_eq!(pool.handle_at(0), Some(a));
        assert_eq!(pool.get_ref(b), Err(PoolError::NotFound(b)));
    }

    #[test]
    fn test_remove_only_record() {
        let mut pool = pool(4, GrowthPolicy::Fixed);
        let a = pool.insert(1).unwrap();
        pool.remove(a).unwrap();
        assert!(pool.is_empty());
        assert!(!pool.contains(a));
    }

    #[test]
    fn test_swap_removal_keeps_moved_record_reachable() {
        let mut pool = pool(4, GrowthPolicy::Fixed);
        let a = pool.insert(10).unwrap();
        let b = pool.insert(20).unwrap();
        let c = pool.insert(30).unwrap();

        pool.remove(a).unwrap();

        assert_eq!(pool.get(a), Err(PoolError::NotFound(a)));
        assert_eq!(*pool.get(c).unwrap(), 30);
        assert_eq!(*pool.get(b).unwrap(), 20);
        assert_eq!(pool.handle_at(0), Some(c));
        assert_eq!(pool.as_slice(), &[30, 20]);
        assert_maps_consistent(&pool);
    }

    #[test]
    fn test_remove_unknown_handle() {
        let mut pool = pool(4, GrowthPolicy::Fixed);
        pool.insert(1).unwrap();
        let stranger = Handle::from_raw(99);
        assert_eq!(pool.remove(stranger), Err(PoolError::NotFound(stranger)));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_double_remove_is_not_found() {
        let mut pool = pool(4, GrowthPolicy::Fixed);
        let a = pool.insert(1).unwrap();
        pool.insert(2).unwrap();
        pool.remove(a).unwrap();
        assert_eq!(pool.remove(a), Err(PoolError::NotFound(a)));
    }

    #[test]
    fn test_reinsert_never_reuses_live_handle() {
        let mut pool = pool(8, GrowthPolicy::Fixed);
        let a = pool.insert(1).unwrap();
        let b = pool.insert(2).unwrap();
        let c = pool.insert(3).unwrap();

        pool.remove(b).unwrap();
        let d = pool.insert(4).unwrap();

        assert_ne!(d, a);
        assert_ne!(d, c);
        assert!(d == b || d.raw() > c.raw());
        assert_maps_consistent(&pool);
    }

    #[test]
    fn test_growth_preserves_content() {
        let mut pool = pool(2, GrowthPolicy::AutoGrow);
        let handles: Vec<_> = (0..2).map(|v| pool.insert(v * 100).unwrap()).collect();

        pool.ensure_capacity(16).unwrap();
        assert_eq!(pool.capacity(), 16);

        for (value, handle) in handles.iter().enumerate() {
            assert_eq!(*pool.get_ref(*handle).unwrap(), value as u32 * 100);
        }
    }

    #[test]
    fn test_ensure_capacity_never_shrinks() {
        let mut pool = pool(8, GrowthPolicy::Fixed);
        pool.ensure_capacity(2).unwrap();
        assert_eq!(pool.capacity(), 8);
    }

    #[test]
    fn test_insert_with_sees_own_handle() {
        let mut pool = DenseSlotPool::<Handle>::with_capacity(2, GrowthPolicy::Fixed);
        let handle = pool.insert_with(|h| h).unwrap();
        assert_eq!(*pool.get_ref(handle).unwrap(), handle);
    }

    #[test]
    fn test_iter_pairs_handles_with_records() {
        let mut pool = pool(4, GrowthPolicy::Fixed);
        let a = pool.insert(1).unwrap();
        let b = pool.insert(2).unwrap();
        let pairs: Vec<_> = pool.iter().map(|(h, v)| (h, *v)).collect();
        assert_eq!(pairs, vec![(a, 1), (b, 2)]);
    }

    #[test]
    fn test_teardown_releases_every_record() {
        let mut pool = pool(4, GrowthPolicy::Fixed);
        let a = pool.insert(1).unwrap();
        let b = pool.insert(2).unwrap();

        let mut released = Vec::new();
        pool.teardown_with(|handle, value| released.push((handle, value)));

        released.sort();
        assert_eq!(released, vec![(a, 1), (b, 2)]);
        assert!(!pool.is_initialized());
        assert!(!pool.contains(a));
        pool.initialize(1, GrowthPolicy::Fixed).unwrap();
    }

    #[test]
    fn test_random_churn_keeps_handles_unique() {
        let mut pool = pool(4, GrowthPolicy::AutoGrow);
        let mut live: Vec<(Handle, u32)> = Vec::new();
        let mut seed = 0x2545_f491_u32;

        for step in 0..400u32 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;

            if live.is_empty() || seed % 3 != 0 {
                let handle = pool.insert(step).unwrap();
                assert!(live.iter().all(|(h, _)| *h != handle));
                live.push((handle, step));
            } else {
                let index = seed as usize % live.len();
                let (handle, value) = live.swap_remove(index);
                assert_eq!(pool.remove(handle), Ok(value));
            }

            assert_eq!(pool.len(), live.len());
        }

        for (handle, value) in &live {
            assert_eq!(pool.get_ref(*handle), Ok(value));
        }
        assert_maps_consistent(&pool);
    }
}

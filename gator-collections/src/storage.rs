//! Arena storage with stable handles.
//!
//! Storage owns node values and hands out handles that stay valid until the
//! value is explicitly removed. The tree and the heap coordinate handles into
//! storage instead of owning their nodes, which is what lets two structures
//! point at each other without reference cycles.

use crate::Index;

/// Slab-like storage with stable handles.
///
/// Implementations hand out handles that keep addressing the same value
/// until it is removed, support constant-time insert, lookup, and removal,
/// and may recycle a removed handle on a later insert.
///
/// # Implementations
///
/// - [`BoxedStorage<T>`] - fixed capacity chosen at runtime (in this crate)
/// - `slab::Slab<T>` - growable, never full (feature `slab`)
pub trait Storage<T> {
    /// Handle type for this storage.
    type Index: Index;

    /// Inserts a value, returning its stable handle.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if no slot is free.
    fn try_insert(&mut self, value: T) -> Result<Self::Index, Full<T>>;

    /// Removes and returns the value at `index`, if present.
    fn remove(&mut self, index: Self::Index) -> Option<T>;

    /// Returns a reference to the value at `index`, if present.
    fn get(&self, index: Self::Index) -> Option<&T>;

    /// Returns a mutable reference to the value at `index`, if present.
    fn get_mut(&mut self, index: Self::Index) -> Option<&mut T>;

    /// Returns the number of occupied slots.
    fn len(&self) -> usize;

    /// Returns `true` if no slots are occupied.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the next insert would fail.
    fn is_full(&self) -> bool;
}

/// A bounded arena or queue had no room.
///
/// The rejected value travels back inside so nothing is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> core::fmt::Display for Full<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "storage is full")
    }
}

impl<T: core::fmt::Debug> std::error::Error for Full<T> {}

// =============================================================================
// BoxedStorage - runtime capacity, single allocation, LIFO free stack
// =============================================================================

/// Arena with a capacity fixed at construction.
///
/// Slots are allocated once up front. Freed handles go on a free stack and
/// are handed out again in LIFO order, so the most recently released slot is
/// the next one reused.
///
/// # Example
///
/// ```
/// use gator_collections::{BoxedStorage, Storage};
///
/// let mut storage: BoxedStorage<u64> = BoxedStorage::with_capacity(4);
/// assert_eq!(storage.capacity(), 4);
///
/// let idx = storage.try_insert(42).unwrap();
/// assert_eq!(storage.get(idx), Some(&42));
/// ```
#[derive(Debug)]
pub struct BoxedStorage<T, Idx: Index = u32> {
    slots: Box<[Option<T>]>,
    /// Vacant handles; the top of the stack is the next slot handed out.
    free: Vec<Idx>,
}

impl<T, Idx: Index> BoxedStorage<T, Idx> {
    /// Creates storage with exactly `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0 or does not fit below the index type's
    /// sentinel.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be > 0");
        assert!(
            capacity <= Idx::NONE.as_usize(),
            "capacity exceeds index type maximum"
        );

        let slots = (0..capacity)
            .map(|_| None)
            .collect::<Vec<_>>()
            .into_boxed_slice();
        // Reverse so handle 0 is on top and handed out first.
        let free = (0..capacity).rev().map(Idx::from_usize).collect();

        Self { slots, free }
    }

    /// Returns the capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Vacates every slot and resets handle order.
    ///
    /// # Warning
    ///
    /// Any tree or heap still holding handles into this storage is left
    /// dangling. Clear those structures first.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.free.clear();
        let handles = (0..self.slots.len()).rev().map(Idx::from_usize);
        self.free.extend(handles);
    }

    /// Returns an iterator over occupied `(handle, value)` pairs in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (Idx, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (Idx::from_usize(i), v)))
    }
}

impl<T, Idx: Index> Storage<T> for BoxedStorage<T, Idx> {
    type Index = Idx;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<Idx, Full<T>> {
        let Some(idx) = self.free.pop() else {
            return Err(Full(value));
        };

        let slot = &mut self.slots[idx.as_usize()];
        debug_assert!(slot.is_none(), "free stack handed out an occupied slot");
        *slot = Some(value);

        Ok(idx)
    }

    #[inline]
    fn remove(&mut self, index: Idx) -> Option<T> {
        if index.is_none() {
            return None;
        }
        let value = self.slots.get_mut(index.as_usize())?.take()?;
        self.free.push(index);
        Some(value)
    }

    #[inline]
    fn get(&self, index: Idx) -> Option<&T> {
        if index.is_none() {
            return None;
        }
        self.slots.get(index.as_usize())?.as_ref()
    }

    #[inline]
    fn get_mut(&mut self, index: Idx) -> Option<&mut T> {
        if index.is_none() {
            return None;
        }
        self.slots.get_mut(index.as_usize())?.as_mut()
    }

    #[inline]
    fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    #[inline]
    fn is_full(&self) -> bool {
        self.free.is_empty()
    }
}

// =============================================================================
// slab::Slab implementation
// =============================================================================

#[cfg(feature = "slab")]
impl<T> Storage<T> for slab::Slab<T> {
    type Index = usize;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<usize, Full<T>> {
        Ok(self.insert(value))
    }

    #[inline]
    fn remove(&mut self, index: usize) -> Option<T> {
        self.try_remove(index)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&T> {
        slab::Slab::get(self, index)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        slab::Slab::get_mut(self, index)
    }

    #[inline]
    fn len(&self) -> usize {
        slab::Slab::len(self)
    }

    #[inline]
    fn is_full(&self) -> bool {
        false
    }
}

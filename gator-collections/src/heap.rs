//! Bounded min-heap over external storage with O(log n) removal by handle.
//!
//! Entries embed their own heap slot, so an entry owned by some other
//! structure can be located in the heap in O(1) and removed in O(log n)
//! without a linear search.
//!
//! Slots are 1-based: the root lives in slot 1 and slot `k` has children
//! `2k` and `2k + 1`. Slot 0 is never occupied.

use crate::{Full, Index, InvariantViolation, Storage};

const ROOT: usize = 1;

/// Trait for types that can participate in a heap.
///
/// Implementors embed their heap slot and define ordering through `Ord`;
/// the smallest entry sits at the root.
///
/// # Example
///
/// ```
/// use gator_collections::{HeapEntry, Index};
/// use std::cmp::Ordering;
///
/// struct Job {
///     cost: u64,
///     duration: u64,
///     slot: u32,
/// }
///
/// impl HeapEntry<u32> for Job {
///     fn heap_idx(&self) -> u32 { self.slot }
///     fn set_heap_idx(&mut self, idx: u32) { self.slot = idx; }
/// }
///
/// impl Ord for Job {
///     fn cmp(&self, other: &Self) -> Ordering {
///         (self.cost, self.duration).cmp(&(other.cost, other.duration))
///     }
/// }
/// impl PartialOrd for Job {
///     fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
///         Some(self.cmp(other))
///     }
/// }
/// impl PartialEq for Job {
///     fn eq(&self, other: &Self) -> bool {
///         self.cmp(other).is_eq()
///     }
/// }
/// impl Eq for Job {}
/// ```
pub trait HeapEntry<Idx: Index>: Ord {
    /// Returns this entry's heap slot, or `Idx::NONE` if not in a heap.
    fn heap_idx(&self) -> Idx;

    /// Sets this entry's heap slot.
    fn set_heap_idx(&mut self, idx: Idx);

    /// Returns `true` if this entry is currently in a heap.
    #[inline]
    fn in_heap(&self) -> bool {
        self.heap_idx().is_some()
    }
}

/// A fixed-capacity min-heap over external storage.
///
/// The heap holds storage handles in slot order; values stay in storage.
/// Capacity is a hard bound on simultaneously queued entries: pushing past
/// it fails instead of growing.
///
/// # Example
///
/// ```
/// use gator_collections::{BoxedStorage, Heap, HeapEntry, Index, Storage};
///
/// #[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
/// struct Task {
///     priority: u32,
///     slot: u32,
/// }
///
/// impl HeapEntry<u32> for Task {
///     fn heap_idx(&self) -> u32 { self.slot }
///     fn set_heap_idx(&mut self, idx: u32) { self.slot = idx; }
/// }
///
/// let mut storage: BoxedStorage<Task> = BoxedStorage::with_capacity(4);
/// let mut heap: Heap<u32> = Heap::with_capacity(4);
///
/// let a = storage.try_insert(Task { priority: 10, slot: u32::NONE }).unwrap();
/// let b = storage.try_insert(Task { priority: 1, slot: u32::NONE }).unwrap();
///
/// heap.try_push(&mut storage, a).unwrap();
/// heap.try_push(&mut storage, b).unwrap();
///
/// assert_eq!(heap.pop(&mut storage), Some(b));
/// assert_eq!(heap.pop(&mut storage), Some(a));
/// assert_eq!(heap.pop(&mut storage), None);
/// ```
#[derive(Debug, Clone)]
pub struct Heap<Idx: Index> {
    /// Heap-ordered storage handles. `slots[0]` is a placeholder.
    slots: Vec<Idx>,
    capacity: usize,
}

impl<Idx: Index> Heap<Idx> {
    /// Creates an empty heap that holds at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if the last slot, `capacity`, would equal `Idx::NONE`.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity < Idx::NONE.as_usize(),
            "heap capacity collides with the index sentinel"
        );
        let mut slots = Vec::with_capacity(capacity + 1);
        slots.push(Idx::NONE);
        Self { slots, capacity }
    }

    /// Returns the number of entries in the heap.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len() - 1
    }

    /// Returns `true` if the heap is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the next push would fail.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    /// Returns the maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the handle of the minimum entry without removing it.
    #[inline]
    pub fn peek(&self) -> Option<Idx> {
        self.slots.get(ROOT).copied()
    }

    /// Returns the handles in slot order (root first).
    pub fn iter(&self) -> impl Iterator<Item = Idx> + '_ {
        self.slots[ROOT..].iter().copied()
    }

    /// Pushes an entry that already lives in storage.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(idx))` if the heap is at capacity. The entry is
    /// left untouched in storage.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not valid in storage.
    pub fn try_push<T, S>(&mut self, storage: &mut S, idx: Idx) -> Result<(), Full<Idx>>
    where
        T: HeapEntry<Idx>,
        S: Storage<T, Index = Idx>,
    {
        if self.is_full() {
            return Err(Full(idx));
        }
        debug_assert!(!entry(storage, idx).in_heap(), "element already in heap");

        let pos = self.slots.len();
        self.slots.push(idx);
        entry_mut(storage, idx).set_heap_idx(Idx::from_usize(pos));

        self.sift_up(storage, pos);
        Ok(())
    }

    /// Removes and returns the handle of the minimum entry.
    pub fn pop<T, S>(&mut self, storage: &mut S) -> Option<Idx>
    where
        T: HeapEntry<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let idx = self.peek()?;
        self.remove_at(storage, ROOT);
        Some(idx)
    }

    /// Removes an arbitrary entry from the heap.
    ///
    /// The entry's slot is read from the entry itself, so this is O(log n).
    /// Returns `true` if the entry was in the heap and removed. The value
    /// stays in storage with its slot cleared.
    pub fn remove<T, S>(&mut self, storage: &mut S, idx: Idx) -> bool
    where
        T: HeapEntry<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let Some(entry) = storage.get(idx) else {
            return false;
        };

        let slot = entry.heap_idx();
        if slot.is_none() {
            return false;
        }

        let pos = slot.as_usize();
        debug_assert_eq!(self.slots.get(pos), Some(&idx), "stale heap slot");
        self.remove_at(storage, pos);
        true
    }

    /// Restores heap order after an entry's priority changed in either
    /// direction.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not in the heap.
    pub fn update<T, S>(&mut self, storage: &mut S, idx: Idx)
    where
        T: HeapEntry<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let pos = slot_of(storage, idx);
        if self.sift_up(storage, pos) == pos {
            self.sift_down(storage, pos);
        }
    }

    /// Restores heap order after an entry's priority decreased.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not in the heap.
    pub fn decrease_key<T, S>(&mut self, storage: &mut S, idx: Idx)
    where
        T: HeapEntry<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let pos = slot_of(storage, idx);
        self.sift_up(storage, pos);
    }

    /// Restores heap order after an entry's priority increased.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not in the heap.
    pub fn increase_key<T, S>(&mut self, storage: &mut S, idx: Idx)
    where
        T: HeapEntry<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let pos = slot_of(storage, idx);
        self.sift_down(storage, pos);
    }

    /// Clears the heap, marking all entries as not in heap.
    pub fn clear<T, S>(&mut self, storage: &mut S)
    where
        T: HeapEntry<Idx>,
        S: Storage<T, Index = Idx>,
    {
        for &idx in &self.slots[ROOT..] {
            if let Some(entry) = storage.get_mut(idx) {
                entry.set_heap_idx(Idx::NONE);
            }
        }
        self.slots.truncate(ROOT);
    }

    /// Checks slot bookkeeping and heap order across every entry.
    pub fn validate<T, S>(&self, storage: &S) -> Result<(), InvariantViolation>
    where
        T: HeapEntry<Idx>,
        S: Storage<T, Index = Idx>,
    {
        for (pos, &idx) in self.slots.iter().enumerate().skip(ROOT) {
            let Some(current) = storage.get(idx) else {
                return Err(InvariantViolation::Dangling {
                    index: idx.as_usize(),
                });
            };

            let recorded = current.heap_idx();
            if recorded.is_none() || recorded.as_usize() != pos {
                return Err(InvariantViolation::HeapSlot {
                    slot: pos,
                    recorded: recorded.as_usize(),
                });
            }

            if pos > ROOT {
                let parent = pos / 2;
                let parent_entry = entry(storage, self.slots[parent]);
                if parent_entry > current {
                    return Err(InvariantViolation::HeapOrder { parent, child: pos });
                }
            }
        }
        Ok(())
    }

    /// Detaches the entry at `pos` and fills the hole with the last entry.
    fn remove_at<T, S>(&mut self, storage: &mut S, pos: usize)
    where
        T: HeapEntry<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let idx = self.slots[pos];
        entry_mut(storage, idx).set_heap_idx(Idx::NONE);

        let last = self.slots.pop().expect("remove from empty heap");
        if pos < self.slots.len() {
            self.slots[pos] = last;
            entry_mut(storage, last).set_heap_idx(Idx::from_usize(pos));

            // The relocated entry came from another subtree and may belong
            // above its new parent as well as below its new children.
            if self.sift_up(storage, pos) == pos {
                self.sift_down(storage, pos);
            }
        }
    }

    /// Moves the entry at `pos` toward the root. Returns its final slot.
    fn sift_up<T, S>(&mut self, storage: &mut S, pos: usize) -> usize
    where
        T: HeapEntry<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let idx = self.slots[pos];
        let mut hole = pos;

        while hole > ROOT {
            let parent = hole / 2;
            let parent_idx = self.slots[parent];

            if entry(storage, idx) < entry(storage, parent_idx) {
                self.slots[hole] = parent_idx;
                entry_mut(storage, parent_idx).set_heap_idx(Idx::from_usize(hole));
                hole = parent;
            } else {
                break;
            }
        }

        if hole != pos {
            self.slots[hole] = idx;
            entry_mut(storage, idx).set_heap_idx(Idx::from_usize(hole));
        }
        hole
    }

    /// Moves the entry at `pos` toward the leaves. Returns its final slot.
    fn sift_down<T, S>(&mut self, storage: &mut S, pos: usize) -> usize
    where
        T: HeapEntry<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let last = self.len();
        let idx = self.slots[pos];
        let mut hole = pos;

        // Phase 1: descend to a leaf, always following the smaller child
        loop {
            let left = 2 * hole;
            if left > last {
                break;
            }
            let right = left + 1;

            let left_idx = self.slots[left];
            let smaller = if right <= last
                && entry(storage, self.slots[right]) < entry(storage, left_idx)
            {
                right
            } else {
                left
            };

            let smaller_idx = self.slots[smaller];
            self.slots[hole] = smaller_idx;
            entry_mut(storage, smaller_idx).set_heap_idx(Idx::from_usize(hole));
            hole = smaller;
        }

        // Phase 2: sift back up from the leaf
        while hole > pos {
            let parent = hole / 2;
            let parent_idx = self.slots[parent];

            if entry(storage, idx) < entry(storage, parent_idx) {
                self.slots[hole] = parent_idx;
                entry_mut(storage, parent_idx).set_heap_idx(Idx::from_usize(hole));
                hole = parent;
            } else {
                break;
            }
        }

        self.slots[hole] = idx;
        entry_mut(storage, idx).set_heap_idx(Idx::from_usize(hole));
        hole
    }
}

#[inline]
fn entry<T, S: Storage<T>>(storage: &S, idx: S::Index) -> &T {
    storage.get(idx).expect("heap handle not in storage")
}

#[inline]
fn entry_mut<T, S: Storage<T>>(storage: &mut S, idx: S::Index) -> &mut T {
    storage.get_mut(idx).expect("heap handle not in storage")
}

#[inline]
fn slot_of<T, S>(storage: &S, idx: S::Index) -> usize
where
    T: HeapEntry<S::Index>,
    S: Storage<T>,
{
    let slot = entry(storage, idx).heap_idx();
    assert!(slot.is_some(), "entry is not in the heap");
    slot.as_usize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoxedStorage;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use std::cmp::Ordering;

    #[derive(Debug)]
    struct Job {
        cost: u64,
        duration: u64,
        slot: u32,
    }

    impl Job {
        fn new(cost: u64, duration: u64) -> Self {
            Self {
                cost,
                duration,
                slot: u32::NONE,
            }
        }
    }

    impl HeapEntry<u32> for Job {
        fn heap_idx(&self) -> u32 {
            self.slot
        }
        fn set_heap_idx(&mut self, idx: u32) {
            self.slot = idx;
        }
    }

    impl Ord for Job {
        fn cmp(&self, other: &Self) -> Ordering {
            (self.cost, self.duration).cmp(&(other.cost, other.duration))
        }
    }

    impl PartialOrd for Job {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    impl PartialEq for Job {
        fn eq(&self, other: &Self) -> bool {
            self.cmp(other).is_eq()
        }
    }

    impl Eq for Job {}

    type TestStorage = BoxedStorage<Job>;

    fn push(heap: &mut Heap<u32>, storage: &mut TestStorage, cost: u64, duration: u64) -> u32 {
        let idx = storage.try_insert(Job::new(cost, duration)).unwrap();
        heap.try_push(storage, idx).unwrap();
        idx
    }

    fn tuple(storage: &TestStorage, idx: u32) -> (u64, u64) {
        let job = storage.get(idx).unwrap();
        (job.cost, job.duration)
    }

    #[test]
    fn new_is_empty() {
        let heap: Heap<u32> = Heap::with_capacity(4);
        assert!(heap.is_empty());
        assert!(!heap.is_full());
        assert_eq!(heap.len(), 0);
        assert_eq!(heap.capacity(), 4);
        assert!(heap.peek().is_none());
    }

    #[test]
    fn top_slot_stays_below_sentinel() {
        let heap: Heap<u16> = Heap::with_capacity(u16::MAX as usize - 1);
        assert_eq!(heap.capacity(), 65534);
    }

    #[test]
    #[should_panic(expected = "sentinel")]
    fn capacity_reaching_sentinel_panics() {
        let _heap: Heap<u16> = Heap::with_capacity(u16::MAX as usize);
    }

    #[test]
    fn push_pop_single() {
        let mut storage = TestStorage::with_capacity(16);
        let mut heap: Heap<u32> = Heap::with_capacity(16);

        let idx = push(&mut heap, &mut storage, 5, 1);
        assert_eq!(heap.len(), 1);
        assert_eq!(heap.peek(), Some(idx));

        // Root lives in slot 1
        assert_eq!(storage.get(idx).unwrap().heap_idx(), 1);

        assert_eq!(heap.pop(&mut storage), Some(idx));
        assert!(heap.is_empty());
        assert!(!storage.get(idx).unwrap().in_heap());
    }

    #[test]
    fn orders_by_cost_then_duration() {
        let mut storage = TestStorage::with_capacity(16);
        let mut heap: Heap<u32> = Heap::with_capacity(16);

        push(&mut heap, &mut storage, 10, 20);
        push(&mut heap, &mut storage, 5, 15);
        push(&mut heap, &mut storage, 5, 3);
        push(&mut heap, &mut storage, 7, 1);

        let mut popped = Vec::new();
        while let Some(idx) = heap.pop(&mut storage) {
            popped.push(tuple(&storage, idx));
        }
        assert_eq!(popped, vec![(5, 3), (5, 15), (7, 1), (10, 20)]);
    }

    #[test]
    fn push_past_capacity_fails() {
        let mut storage = TestStorage::with_capacity(4);
        let mut heap: Heap<u32> = Heap::with_capacity(2);

        push(&mut heap, &mut storage, 1, 1);
        push(&mut heap, &mut storage, 2, 2);
        assert!(heap.is_full());

        let extra = storage.try_insert(Job::new(0, 0)).unwrap();
        let err = heap.try_push(&mut storage, extra).unwrap_err();
        assert_eq!(err.into_inner(), extra);
        assert!(!storage.get(extra).unwrap().in_heap());
        assert_eq!(heap.len(), 2);
    }

    #[test]
    fn remove_arbitrary() {
        let mut storage = TestStorage::with_capacity(16);
        let mut heap: Heap<u32> = Heap::with_capacity(16);

        let _a = push(&mut heap, &mut storage, 10, 0);
        let _b = push(&mut heap, &mut storage, 1, 0);
        let c = push(&mut heap, &mut storage, 5, 0);

        assert!(heap.remove(&mut storage, c));
        assert!(!storage.get(c).unwrap().in_heap());
        assert_eq!(heap.len(), 2);
        heap.validate(&storage).unwrap();

        // Second removal is a no-op
        assert!(!heap.remove(&mut storage, c));

        let idx = heap.pop(&mut storage).unwrap();
        assert_eq!(tuple(&storage, idx), (1, 0));
        let idx = heap.pop(&mut storage).unwrap();
        assert_eq!(tuple(&storage, idx), (10, 0));
    }

    #[test]
    fn remove_last_slot() {
        let mut storage = TestStorage::with_capacity(16);
        let mut heap: Heap<u32> = Heap::with_capacity(16);

        push(&mut heap, &mut storage, 1, 0);
        push(&mut heap, &mut storage, 2, 0);
        let last = push(&mut heap, &mut storage, 3, 0);
        assert_eq!(storage.get(last).unwrap().heap_idx(), 3);

        assert!(heap.remove(&mut storage, last));
        assert_eq!(heap.len(), 2);
        heap.validate(&storage).unwrap();
    }

    #[test]
    fn remove_relocates_smaller_entry_upward() {
        let mut storage = TestStorage::with_capacity(16);
        let mut heap: Heap<u32> = Heap::with_capacity(16);

        //          1
        //      10      2
        //    11  12   3  4
        let costs = [1, 10, 2, 11, 12, 3, 4];
        let handles: Vec<u32> = costs
            .iter()
            .map(|&c| push(&mut heap, &mut storage, c, 0))
            .collect();
        heap.validate(&storage).unwrap();

        // Removing 11 moves 4 under 10, where it must rise above 10.
        assert!(heap.remove(&mut storage, handles[3]));
        heap.validate(&storage).unwrap();

        let mut popped = Vec::new();
        while let Some(idx) = heap.pop(&mut storage) {
            popped.push(tuple(&storage, idx).0);
        }
        assert_eq!(popped, vec![1, 2, 3, 4, 10, 12]);
    }

    #[test]
    fn update_after_mutation() {
        let mut storage = TestStorage::with_capacity(16);
        let mut heap: Heap<u32> = Heap::with_capacity(16);

        let a = push(&mut heap, &mut storage, 10, 0);
        let b = push(&mut heap, &mut storage, 5, 0);
        let c = push(&mut heap, &mut storage, 3, 0);

        storage.get_mut(a).unwrap().cost = 1;
        heap.update(&mut storage, a);
        assert_eq!(heap.peek(), Some(a));

        storage.get_mut(a).unwrap().cost = 100;
        heap.update(&mut storage, a);
        assert_eq!(heap.peek(), Some(c));
        heap.validate(&storage).unwrap();

        storage.get_mut(b).unwrap().duration = 9;
        heap.update(&mut storage, b);
        heap.validate(&storage).unwrap();
    }

    #[test]
    fn decrease_and_increase_key() {
        let mut storage = TestStorage::with_capacity(16);
        let mut heap: Heap<u32> = Heap::with_capacity(16);

        let a = push(&mut heap, &mut storage, 1, 0);
        let b = push(&mut heap, &mut storage, 5, 0);
        let c = push(&mut heap, &mut storage, 10, 0);

        storage.get_mut(c).unwrap().cost = 0;
        heap.decrease_key(&mut storage, c);
        assert_eq!(heap.peek(), Some(c));

        storage.get_mut(c).unwrap().cost = 100;
        heap.increase_key(&mut storage, c);
        assert_eq!(heap.peek(), Some(a));

        storage.get_mut(a).unwrap().cost = 50;
        heap.increase_key(&mut storage, a);
        assert_eq!(heap.peek(), Some(b));
        heap.validate(&storage).unwrap();
    }

    #[test]
    fn validate_detects_unnotified_mutation() {
        let mut storage = TestStorage::with_capacity(16);
        let mut heap: Heap<u32> = Heap::with_capacity(16);

        let a = push(&mut heap, &mut storage, 1, 0);
        push(&mut heap, &mut storage, 5, 0);

        storage.get_mut(a).unwrap().cost = 9;
        assert_eq!(
            heap.validate(&storage),
            Err(InvariantViolation::HeapOrder {
                parent: 1,
                child: 2,
            })
        );
    }

    #[test]
    fn clear() {
        let mut storage = TestStorage::with_capacity(16);
        let mut heap: Heap<u32> = Heap::with_capacity(16);

        let a = push(&mut heap, &mut storage, 10, 0);
        let b = push(&mut heap, &mut storage, 1, 0);

        heap.clear(&mut storage);

        assert!(heap.is_empty());
        assert!(!storage.get(a).unwrap().in_heap());
        assert!(!storage.get(b).unwrap().in_heap());
    }

    #[test]
    fn stress_random_operations() {
        let mut storage = TestStorage::with_capacity(512);
        let mut heap: Heap<u32> = Heap::with_capacity(512);
        let mut rng = SmallRng::seed_from_u64(0x6a7e);
        let mut live: Vec<u32> = Vec::new();

        for _ in 0..5_000 {
            let op = rng.random_range(0..100);

            if op < 45 && !heap.is_full() {
                let cost = rng.random_range(0..50);
                let duration = rng.random_range(0..50);
                live.push(push(&mut heap, &mut storage, cost, duration));
            } else if op < 70 && !live.is_empty() {
                let victim = live.swap_remove(rng.random_range(0..live.len()));
                assert!(heap.remove(&mut storage, victim));
                storage.remove(victim);
            } else if op < 85 && !live.is_empty() {
                let target = live[rng.random_range(0..live.len())];
                storage.get_mut(target).unwrap().duration = rng.random_range(0..50);
                heap.update(&mut storage, target);
            } else if let Some(min) = heap.pop(&mut storage) {
                let popped = tuple(&storage, min);
                for &i in live.iter().filter(|&&i| i != min) {
                    assert!(tuple(&storage, i) >= popped);
                }
                live.retain(|&i| i != min);
                storage.remove(min);
            }

            assert_eq!(heap.len(), live.len());
            heap.validate(&storage).unwrap();
        }

        let mut last = (0, 0);
        while let Some(idx) = heap.pop(&mut storage) {
            let current = tuple(&storage, idx);
            assert!(current >= last, "heap order violated");
            last = current;
        }
    }
}

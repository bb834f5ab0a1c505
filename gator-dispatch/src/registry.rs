//! The ride registry: an ordered index and a priority queue kept in lockstep.
//!
//! Every pending ride lives in both structures at once. The red-black tree
//! answers "is ride `k` pending" and "which rides fall in `[lo, hi]`"; the
//! heap answers "which ride is cheapest". Each side stores the other's
//! handle, so a ride found through one structure is removed from the other
//! without a second search.
//!
//! Each public mutation either fully applies or returns an error with nothing
//! changed.

use gator_collections::{BoxedRbStorage, BoxedStorage, Heap, HeapEntry, RbNode, RbTree, Storage};
use tracing::{debug, instrument, trace};

use crate::ride::{Handle, HeapRide, TreeRide};
use crate::{RegistryBuilder, RegistryError, Ride, ValidationError};

type TreeStorage = BoxedRbStorage<u32, TreeRide, Handle>;
type RideTree = RbTree<u32, TreeRide, TreeStorage, Handle>;
type HeapStorage = BoxedStorage<HeapRide, Handle>;

/// Outcome of [`RideRegistry::update_trip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripUpdate {
    /// The ride stays pending with these new values.
    Updated(Ride),
    /// The new duration exceeded twice the old one; the ride was cancelled.
    Removed(Ride),
}

/// Pending rides indexed by id and ordered by `(cost, duration)`.
///
/// # Example
///
/// ```
/// use gator_dispatch::{RegistryError, RideRegistry, Ride};
///
/// let mut registry = RideRegistry::builder().capacity(16).build().unwrap();
///
/// registry.insert(5, 10, 20).unwrap();
/// registry.insert(3, 5, 15).unwrap();
///
/// assert_eq!(registry.dispatch_next(), Ok(Ride::new(3, 5, 15)));
/// assert_eq!(registry.dispatch_next(), Ok(Ride::new(5, 10, 20)));
/// assert_eq!(registry.dispatch_next(), Err(RegistryError::Empty));
/// ```
#[derive(Debug)]
pub struct RideRegistry {
    tree_storage: TreeStorage,
    tree: RideTree,
    heap_storage: HeapStorage,
    heap: Heap<Handle>,
    capacity: usize,
    surcharge: u64,
}

impl RideRegistry {
    /// Returns a builder with default capacity and surcharge.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub(crate) fn from_parts(capacity: usize, surcharge: u64) -> Self {
        Self {
            tree_storage: TreeStorage::with_capacity(capacity),
            tree: RideTree::new(),
            heap_storage: HeapStorage::with_capacity(capacity),
            heap: Heap::with_capacity(capacity),
            capacity,
            surcharge,
        }
    }

    /// Number of pending rides.
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if nothing is pending.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Maximum number of pending rides.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cost added by an update in the surcharge band.
    #[inline]
    pub fn surcharge(&self) -> u64 {
        self.surcharge
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Registers a new pending ride.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::DuplicateKey`] if `ride_id` is already pending.
    /// - [`RegistryError::CapacityExceeded`] if the registry is full.
    #[instrument(level = "trace", skip(self))]
    pub fn insert(
        &mut self,
        ride_id: u32,
        cost: u64,
        duration: u64,
    ) -> Result<(), RegistryError> {
        if self.tree.contains_key(&self.tree_storage, &ride_id) {
            debug!(ride_id, "rejected duplicate ride");
            return Err(RegistryError::DuplicateKey(ride_id));
        }
        let capacity = self.capacity;
        if self.len() >= capacity {
            debug!(ride_id, capacity, "rejected ride, registry full");
            return Err(RegistryError::CapacityExceeded { capacity });
        }

        // Both arenas and the heap are sized to `capacity` and hold exactly
        // `len` entries, so none of them can be full here.
        let heap_ref = self
            .heap_storage
            .try_insert(HeapRide::new(ride_id, cost, duration))
            .expect("ride arena full below capacity");

        let value = TreeRide {
            cost,
            duration,
            heap_ref,
        };
        let tree_ref = self
            .tree
            .try_insert(&mut self.tree_storage, ride_id, value)
            .expect("ride index rejected a checked insert");

        self.heap_entry_mut(heap_ref).tree_ref = tree_ref;
        self.heap
            .try_push(&mut self.heap_storage, heap_ref)
            .expect("ride queue full below capacity");

        trace!(ride_id, tree_ref, heap_ref, "linked ride");
        self.debug_validate();
        Ok(())
    }

    /// Removes and returns the ride with the lowest `(cost, duration)`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Empty`] if nothing is pending.
    #[instrument(level = "trace", skip(self))]
    pub fn dispatch_next(&mut self) -> Result<Ride, RegistryError> {
        let heap_ref = self
            .heap
            .pop(&mut self.heap_storage)
            .ok_or(RegistryError::Empty)?;
        let tree_ref = self.heap_entry(heap_ref).tree_ref;

        let ride = self.release(tree_ref, heap_ref);
        debug!(%ride, "dispatched");
        self.debug_validate();
        Ok(ride)
    }

    /// Cancels a pending ride, returning it.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] if `ride_id` is not pending.
    #[instrument(level = "trace", skip(self))]
    pub fn cancel(&mut self, ride_id: u32) -> Result<Ride, RegistryError> {
        let tree_ref = self
            .tree
            .find(&self.tree_storage, &ride_id)
            .ok_or(RegistryError::NotFound(ride_id))?;

        let ride = self.cancel_at(tree_ref);
        debug!(%ride, "cancelled");
        self.debug_validate();
        Ok(ride)
    }

    /// Changes a pending ride's duration under the update policy.
    ///
    /// With `d` the current duration, checked in order:
    ///
    /// 1. `d < new <= 2d`: duration becomes `new` and cost grows by the
    ///    surcharge.
    /// 2. `new > 2d`: the ride is cancelled.
    /// 3. `new <= d`: duration becomes `new`, cost unchanged.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] if `ride_id` is not pending.
    #[instrument(level = "trace", skip(self))]
    pub fn update_trip(
        &mut self,
        ride_id: u32,
        new_duration: u64,
    ) -> Result<TripUpdate, RegistryError> {
        let tree_ref = self
            .tree
            .find(&self.tree_storage, &ride_id)
            .ok_or(RegistryError::NotFound(ride_id))?;

        let surcharge = self.surcharge;
        let value = &mut self.tree_node_mut(tree_ref).value;
        let ceiling = value.duration.saturating_mul(2);

        if new_duration > ceiling {
            let ride = self.cancel_at(tree_ref);
            debug!(%ride, new_duration, "trip too long, cancelled");
            self.debug_validate();
            return Ok(TripUpdate::Removed(ride));
        }

        if new_duration > value.duration {
            value.cost = value.cost.saturating_add(surcharge);
        }
        value.duration = new_duration;
        let (cost, duration, heap_ref) = (value.cost, value.duration, value.heap_ref);

        let entry = self.heap_entry_mut(heap_ref);
        entry.cost = cost;
        entry.duration = duration;
        self.heap.update(&mut self.heap_storage, heap_ref);

        let ride = Ride::new(ride_id, cost, duration);
        debug!(%ride, "trip updated");
        self.debug_validate();
        Ok(TripUpdate::Updated(ride))
    }

    /// Removes every pending ride.
    pub fn clear(&mut self) {
        self.heap.clear(&mut self.heap_storage);
        self.heap_storage.clear();
        self.tree.clear(&mut self.tree_storage);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Returns the pending ride with this id.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] if `ride_id` is not pending.
    pub fn get(&self, ride_id: u32) -> Result<Ride, RegistryError> {
        self.tree
            .get(&self.tree_storage, &ride_id)
            .map(|value| Ride::new(ride_id, value.cost, value.duration))
            .ok_or(RegistryError::NotFound(ride_id))
    }

    /// Returns `true` if a ride with this id is pending.
    pub fn contains(&self, ride_id: u32) -> bool {
        self.tree.contains_key(&self.tree_storage, &ride_id)
    }

    /// Returns all pending rides with `low <= ride_id <= high`, ascending by id.
    ///
    /// Empty when nothing qualifies or `low > high`.
    pub fn range(&self, low: u32, high: u32) -> Vec<Ride> {
        self.tree
            .range(&self.tree_storage, &low, &high)
            .into_iter()
            .map(|idx| self.ride_at(idx))
            .collect()
    }

    /// Returns the ride [`dispatch_next`](Self::dispatch_next) would return,
    /// without removing it.
    pub fn peek_next(&self) -> Option<Ride> {
        self.heap.peek().map(|idx| self.heap_entry(idx).ride())
    }

    /// Iterates pending rides in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = Ride> + '_ {
        self.tree
            .iter(&self.tree_storage)
            .map(|(&id, value)| Ride::new(id, value.cost, value.duration))
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Checks both structures and the links between them.
    ///
    /// Verifies red-black balance and key order, heap order and slot
    /// bookkeeping, equal ride counts, that every tree node and heap entry
    /// point at each other, and that both copies of each ride agree.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.tree
            .validate(&self.tree_storage)
            .map_err(ValidationError::Tree)?;
        self.heap
            .validate(&self.heap_storage)
            .map_err(ValidationError::Heap)?;

        if self.tree.len() != self.heap.len() {
            return Err(ValidationError::Count {
                tree: self.tree.len(),
                heap: self.heap.len(),
            });
        }

        for heap_ref in self.heap.iter() {
            let entry = self.heap_entry(heap_ref);
            let ride_id = entry.ride_id;

            let Some(node) = self.tree_storage.get(entry.tree_ref) else {
                return Err(ValidationError::Linkage { ride_id });
            };
            if *node.key() != ride_id || node.value.heap_ref != heap_ref {
                return Err(ValidationError::Linkage { ride_id });
            }
            if self.tree.find(&self.tree_storage, &ride_id) != Some(entry.tree_ref) {
                return Err(ValidationError::Linkage { ride_id });
            }
            if node.value.cost != entry.cost || node.value.duration != entry.duration {
                return Err(ValidationError::Diverged { ride_id });
            }
        }

        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Takes the ride at `tree_ref` out of the heap, then out of both arenas.
    fn cancel_at(&mut self, tree_ref: Handle) -> Ride {
        let heap_ref = self.tree_node(tree_ref).value.heap_ref;
        let was_queued = self.heap.remove(&mut self.heap_storage, heap_ref);
        debug_assert!(was_queued, "linked heap entry was not queued");
        self.release(tree_ref, heap_ref)
    }

    /// Frees both sides of a ride whose heap entry is already dequeued.
    fn release(&mut self, tree_ref: Handle, heap_ref: Handle) -> Ride {
        let (ride_id, value) = self.tree.remove_node(&mut self.tree_storage, tree_ref);
        let entry = self
            .heap_storage
            .remove(heap_ref)
            .expect("linked heap entry missing from arena");

        debug_assert!(!entry.in_heap());
        debug_assert_eq!(value.heap_ref, heap_ref);
        debug_assert_eq!(entry.tree_ref, tree_ref);
        debug_assert_eq!(entry.ride_id, ride_id);
        trace!(ride_id, tree_ref, heap_ref, "released ride");

        Ride::new(ride_id, value.cost, value.duration)
    }

    fn ride_at(&self, tree_ref: Handle) -> Ride {
        let node = self.tree_node(tree_ref);
        Ride::new(*node.key(), node.value.cost, node.value.duration)
    }

    #[inline]
    fn tree_node(&self, idx: Handle) -> &RbNode<u32, TreeRide, Handle> {
        self.tree_storage
            .get(idx)
            .expect("tree handle missing from arena")
    }

    #[inline]
    fn tree_node_mut(&mut self, idx: Handle) -> &mut RbNode<u32, TreeRide, Handle> {
        self.tree_storage
            .get_mut(idx)
            .expect("tree handle missing from arena")
    }

    #[inline]
    fn heap_entry(&self, idx: Handle) -> &HeapRide {
        self.heap_storage
            .get(idx)
            .expect("heap handle missing from arena")
    }

    #[inline]
    fn heap_entry_mut(&mut self, idx: Handle) -> &mut HeapRide {
        self.heap_storage
            .get_mut(idx)
            .expect("heap handle missing from arena")
    }

    #[inline]
    fn debug_validate(&self) {
        #[cfg(debug_assertions)]
        if let Err(err) = self.validate() {
            panic!("registry invariant broken: {err}");
        }
    }
}

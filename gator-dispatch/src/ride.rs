//! Ride values and the linked entries stored in each structure.
//!
//! A pending ride is represented twice: a [`TreeRide`] value keyed by ride id
//! in the ordered index, and a [`HeapRide`] entry in the priority queue. Each
//! side holds the other's storage handle so composite operations never have
//! to search.

use core::cmp::Ordering;
use core::fmt;

use gator_collections::{HeapEntry, Index};

/// Storage handle type used by both arenas.
pub type Handle = u32;

/// A pending ride as seen by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ride {
    /// Unique ride number.
    pub ride_id: u32,
    /// Estimated cost.
    pub cost: u64,
    /// Estimated trip duration.
    pub duration: u64,
}

impl Ride {
    /// Creates a ride.
    pub const fn new(ride_id: u32, cost: u64, duration: u64) -> Self {
        Self {
            ride_id,
            cost,
            duration,
        }
    }

    /// The dispatch priority: lower cost first, ties broken by duration.
    #[inline]
    pub fn priority(&self) -> (u64, u64) {
        (self.cost, self.duration)
    }
}

impl fmt::Display for Ride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.ride_id, self.cost, self.duration)
    }
}

/// Value stored under a ride id in the ordered index.
#[derive(Debug, Clone)]
pub(crate) struct TreeRide {
    pub(crate) cost: u64,
    pub(crate) duration: u64,
    /// Handle of the matching [`HeapRide`] in the heap arena.
    pub(crate) heap_ref: Handle,
}

/// Entry in the priority queue.
#[derive(Debug, Clone)]
pub(crate) struct HeapRide {
    pub(crate) ride_id: u32,
    pub(crate) cost: u64,
    pub(crate) duration: u64,
    /// Handle of the matching tree node in the tree arena.
    pub(crate) tree_ref: Handle,
    slot: Handle,
}

impl HeapRide {
    pub(crate) fn new(ride_id: u32, cost: u64, duration: u64) -> Self {
        Self {
            ride_id,
            cost,
            duration,
            tree_ref: Handle::NONE,
            slot: Handle::NONE,
        }
    }

    pub(crate) fn ride(&self) -> Ride {
        Ride::new(self.ride_id, self.cost, self.duration)
    }

    #[inline]
    fn priority(&self) -> (u64, u64) {
        (self.cost, self.duration)
    }
}

impl HeapEntry<Handle> for HeapRide {
    #[inline]
    fn heap_idx(&self) -> Handle {
        self.slot
    }

    #[inline]
    fn set_heap_idx(&mut self, idx: Handle) {
        self.slot = idx;
    }
}

impl Ord for HeapRide {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl PartialOrd for HeapRide {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HeapRide {
    fn eq(&self, other: &Self) -> bool {
        self.priority() == other.priority()
    }
}

impl Eq for HeapRide {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_output_format() {
        assert_eq!(Ride::new(7, 120, 30).to_string(), "(7,120,30)");
    }

    #[test]
    fn heap_order_is_cost_then_duration() {
        let cheap = HeapRide::new(9, 10, 50);
        let pricey = HeapRide::new(1, 20, 5);
        let cheap_short = HeapRide::new(4, 10, 40);

        assert!(cheap < pricey);
        assert!(cheap_short < cheap);
        // ride id does not participate
        assert_eq!(HeapRide::new(1, 5, 5), HeapRide::new(2, 5, 5));
    }

    #[test]
    fn new_entry_is_unlinked() {
        let entry = HeapRide::new(3, 1, 1);
        assert!(!entry.in_heap());
        assert!(entry.tree_ref.is_none());
        assert_eq!(entry.ride(), Ride::new(3, 1, 1));
    }
}

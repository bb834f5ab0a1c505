//! Error types for registry operations, construction, and validation.

use gator_collections::InvariantViolation;
use thiserror::Error;

/// A registry operation was rejected. The registry is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A ride with this id is already pending.
    #[error("duplicate ride number {0}")]
    DuplicateKey(u32),
    /// No pending ride has this id.
    #[error("ride {0} not found")]
    NotFound(u32),
    /// Nothing is pending.
    #[error("no active ride requests")]
    Empty,
    /// The registry already holds its maximum number of pending rides.
    #[error("registry is at capacity ({capacity} rides)")]
    CapacityExceeded {
        /// Configured maximum.
        capacity: usize,
    },
}

/// Invalid [`RegistryBuilder`](crate::RegistryBuilder) settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Capacity must be at least one ride.
    #[error("capacity cannot be zero")]
    ZeroCapacity,
    /// Capacity does not fit the handle type.
    #[error("capacity {requested} exceeds maximum {max}")]
    CapacityTooLarge {
        /// Requested capacity.
        requested: usize,
        /// Largest supported capacity.
        max: usize,
    },
}

/// A broken invariant found by [`RideRegistry::validate`](crate::RideRegistry::validate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The ordered index is malformed.
    #[error("ordered index: {0}")]
    Tree(#[source] InvariantViolation),
    /// The priority queue is malformed.
    #[error("priority queue: {0}")]
    Heap(#[source] InvariantViolation),
    /// The two structures hold different numbers of rides.
    #[error("index holds {tree} rides but queue holds {heap}")]
    Count {
        /// Rides in the ordered index.
        tree: usize,
        /// Rides in the priority queue.
        heap: usize,
    },
    /// A cross-reference does not round-trip for this ride.
    #[error("ride {ride_id} is not linked in both directions")]
    Linkage {
        /// Affected ride.
        ride_id: u32,
    },
    /// The two copies of this ride's cost or duration disagree.
    #[error("ride {ride_id} has diverging cost or duration")]
    Diverged {
        /// Affected ride.
        ride_id: u32,
    },
}

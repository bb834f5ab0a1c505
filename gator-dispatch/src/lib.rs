//! Ride dispatch registry.
//!
//! [`RideRegistry`] keeps pending rides in two structures at once:
//!
//! ```text
//! RbTree  keyed by ride id        - point lookup, range scan, cancel by id
//! Heap    ordered by (cost, dur)  - next ride to dispatch
//! ```
//!
//! Each tree node holds the handle of its heap entry and each heap entry
//! holds the handle of its tree node. Composite operations follow those
//! handles instead of searching the other structure, so every operation is
//! O(log n).
//!
//! # Quick Start
//!
//! ```
//! use gator_dispatch::{RideRegistry, Ride, TripUpdate};
//!
//! let mut registry = RideRegistry::builder().build().unwrap();
//!
//! registry.insert(1, 50, 30).unwrap();
//! assert_eq!(
//!     registry.update_trip(1, 40),
//!     Ok(TripUpdate::Updated(Ride::new(1, 60, 40)))
//! );
//! assert_eq!(registry.range(0, 10), vec![Ride::new(1, 60, 40)]);
//! ```
//!
//! # Update policy
//!
//! [`RideRegistry::update_trip`] applies one of three outcomes depending on
//! how the new duration compares to the current one. A trip that grows by at
//! most double is charged a surcharge (default 10, see
//! [`RegistryBuilder::surcharge`]); one that grows beyond double is
//! cancelled; a trip that does not grow keeps its cost.
//!
//! # Logging
//!
//! Composite operations emit `tracing` spans at `TRACE` and outcome events
//! at `DEBUG`. No subscriber is installed by this crate.

#![warn(missing_docs)]

mod config;
mod error;
mod registry;
mod ride;

pub use config::{DEFAULT_CAPACITY, DEFAULT_SURCHARGE, RegistryBuilder};
pub use error::{ConfigError, RegistryError, ValidationError};
pub use registry::{RideRegistry, TripUpdate};
pub use ride::Ride;

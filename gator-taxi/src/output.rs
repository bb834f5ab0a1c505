//! Output line formatting.

use gator_dispatch::Ride;

/// Written when a dispatch finds nothing pending.
pub const NO_ACTIVE_RIDES: &str = "No active ride requests";

/// Written when an insert reuses a pending ride number.
pub const DUPLICATE_RIDE: &str = "Duplicate Ride Number";

/// Written when a lookup or range finds nothing.
pub const NO_RIDE: &str = "(0,0,0)";

/// Formats one ride as `(rideNumber,rideCost,tripDuration)`.
pub fn ride(ride: &Ride) -> String {
    ride.to_string()
}

/// Formats rides comma-separated on one line, or [`NO_RIDE`] if empty.
pub fn rides(rides: &[Ride]) -> String {
    if rides.is_empty() {
        return NO_RIDE.to_owned();
    }
    rides
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

//! Registry construction.

use gator_collections::Index;

use crate::ride::Handle;
use crate::{ConfigError, RideRegistry};

/// Default maximum number of pending rides.
pub const DEFAULT_CAPACITY: usize = 2000;

/// Default cost added when a trip is lengthened within the surcharge band.
pub const DEFAULT_SURCHARGE: u64 = 10;

/// Builder for [`RideRegistry`].
///
/// # Example
///
/// ```
/// use gator_dispatch::RegistryBuilder;
///
/// let registry = RegistryBuilder::default()
///     .capacity(64)
///     .surcharge(15)
///     .build()
///     .unwrap();
///
/// assert_eq!(registry.capacity(), 64);
/// assert_eq!(registry.surcharge(), 15);
/// ```
#[derive(Clone, Debug)]
pub struct RegistryBuilder {
    capacity: usize,
    surcharge: u64,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            surcharge: DEFAULT_SURCHARGE,
        }
    }
}

impl RegistryBuilder {
    /// Maximum number of pending rides. Both arenas are sized to this up
    /// front and never grow. Default: 2000.
    pub fn capacity(mut self, rides: usize) -> Self {
        self.capacity = rides;
        self
    }

    /// Cost added by an update that lengthens a trip by at most double.
    /// Default: 10.
    pub fn surcharge(mut self, surcharge: u64) -> Self {
        self.surcharge = surcharge;
        self
    }

    /// Largest capacity the handle type can address.
    ///
    /// Queue slots are 1-based, so the top slot must stay below the
    /// sentinel handle.
    pub fn max_capacity() -> usize {
        Handle::NONE.as_usize() - 1
    }

    /// Allocates both arenas and builds the registry.
    pub fn build(self) -> Result<RideRegistry, ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        let max = Self::max_capacity();
        if self.capacity > max {
            return Err(ConfigError::CapacityTooLarge {
                requested: self.capacity,
                max,
            });
        }

        Ok(RideRegistry::from_parts(self.capacity, self.surcharge))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let registry = RegistryBuilder::default().build().unwrap();
        assert_eq!(registry.capacity(), DEFAULT_CAPACITY);
        assert_eq!(registry.surcharge(), DEFAULT_SURCHARGE);
        assert!(registry.is_empty());
    }

    #[test]
    fn zero_capacity_rejected() {
        let err = RegistryBuilder::default().capacity(0).build().unwrap_err();
        assert_eq!(err, ConfigError::ZeroCapacity);
    }

    #[test]
    fn capacity_equal_to_sentinel_rejected() {
        assert!(RegistryBuilder::max_capacity() < Handle::NONE.as_usize());
        let err = RegistryBuilder::default()
            .capacity(Handle::NONE.as_usize())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::CapacityTooLarge { .. }));
    }

    #[test]
    fn oversized_capacity_rejected() {
        let requested = RegistryBuilder::max_capacity() + 1;
        let err = RegistryBuilder::default()
            .capacity(requested)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::CapacityTooLarge {
                requested,
                max: u32::MAX as usize - 1,
            }
        );
    }
}

//! Sentinel-based handle trait for arena-addressed nodes.
//!
//! Tree and heap nodes link to each other through integer handles into
//! their storage. A reserved sentinel value (`MAX`) stands in for "no node",
//! so links stay a single machine word instead of `Option<Idx>`.

/// A copyable handle type with a sentinel "none" value.
///
/// # Example
///
/// ```
/// use gator_collections::Index;
///
/// let handle = u32::from_usize(7);
///
/// assert!(handle.is_some());
/// assert!(u32::NONE.is_none());
/// assert_eq!(handle.as_usize(), 7);
/// ```
pub trait Index: Copy + Eq + core::fmt::Debug {
    /// Sentinel value representing "no node".
    const NONE: Self;

    /// `true` for the sentinel.
    #[inline]
    fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// `true` for any real handle.
    #[inline]
    fn is_some(self) -> bool {
        !self.is_none()
    }

    /// Returns the handle as a `usize` for array addressing.
    fn as_usize(self) -> usize;

    /// Creates a handle from an array position.
    fn from_usize(val: usize) -> Self;
}

macro_rules! unsigned_index {
    ($($ty:ty),*) => {
        $(
            impl Index for $ty {
                const NONE: Self = <$ty>::MAX;

                #[inline]
                fn as_usize(self) -> usize {
                    self as usize
                }

                #[inline]
                fn from_usize(val: usize) -> Self {
                    debug_assert!(val <= <$ty>::MAX as usize, "handle overflows index type");
                    val as Self
                }
            }
        )*
    };
}

unsigned_index!(u16, u32, u64, usize);

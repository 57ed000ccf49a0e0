//! Sentinel-based indices for link fields.
//!
//! Link fields in intrusive nodes are plain unsigned integers with one
//! reserved value (`MAX`) standing in for "no node". This keeps a
//! `TreeLinks<u32>` at 16 bytes where `Option<u32>` fields would double it.

/// A copyable storage index with a reserved sentinel meaning "none".
///
/// Implemented for the unsigned integer types; the sentinel is always the
/// type's maximum value, so storage capacity must stay below `MAX`.
///
/// # Example
///
/// ```
/// use burrow_collections::Index;
///
/// let linked: u32 = 7;
/// assert!(linked.is_some());
/// assert!(u32::NONE.is_none());
/// ```
pub trait Index: Copy + Eq {
    /// The reserved "no index" value.
    const NONE: Self;

    /// Returns `true` if this is the sentinel.
    #[inline]
    fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Returns `true` if this is a real index.
    #[inline]
    fn is_some(self) -> bool {
        self != Self::NONE
    }

    /// Widens the index for use as a slot position.
    fn as_usize(self) -> usize;

    /// Narrows a slot position back into an index.
    ///
    /// Callers must ensure `val` fits; storage constructors reject
    /// capacities that would make a valid index collide with the sentinel.
    fn from_usize(val: usize) -> Self;
}

macro_rules! sentinel_index {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Index for $ty {
                const NONE: Self = <$ty>::MAX;

                #[inline]
                fn as_usize(self) -> usize {
                    self as usize
                }

                #[inline]
                fn from_usize(val: usize) -> Self {
                    val as Self
                }
            }
        )*
    };
}

sentinel_index!(u8, u16, u32, u64, usize);

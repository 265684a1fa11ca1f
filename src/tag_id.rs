//! Integer types usable as tag IDs
//!
//! The resolver assigns IDs as `usize`. A table narrows them to its own ID
//! type when it is built, failing if the table's range does not fit.

use std::fmt;
use std::hash::Hash;

/// An unsigned integer type a [`Table`](crate::Table) hands out as tag ID
pub trait TagId: Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Convert from a global `usize` ID, `None` if it does not fit
    fn from_offset(offset: usize) -> Option<Self>;

    /// Widen back to `usize`
    ///
    /// Saturates at `usize::MAX`, which is never a valid ID, so a value too
    /// wide for the platform reads as out of range instead of wrapping into
    /// some table.
    fn to_offset(self) -> usize;
}

macro_rules! impl_tag_id {
    ($($ty:ty),*) => {
        $(
            impl TagId for $ty {
                #[inline]
                fn from_offset(offset: usize) -> Option<Self> {
                    <$ty>::try_from(offset).ok()
                }

                #[inline]
                fn to_offset(self) -> usize {
                    usize::try_from(self).unwrap_or(usize::MAX)
                }
            }
        )*
    };
}

impl_tag_id!(u8, u16, u32, u64, usize);

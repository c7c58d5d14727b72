//! Key orderings accepted by [`AvlDictionary`](crate::AvlDictionary).

use std::cmp::Ordering;

/// An ordering over keys, fixed when a dictionary is constructed.
///
/// Returning `None` marks the two keys as incomparable. The dictionary rejects
/// such keys with an [`Error`](crate::Error) instead of storing them.
pub trait Compare<K: ?Sized> {
    fn compare(&self, lhs: &K, rhs: &K) -> Option<Ordering>;
}

/// The key type's own total order (`Ord`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

/// The key type's partial order (`PartialOrd`), e.g. for floating point keys.
///
/// Keys without a place in the order (NaN) are rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PartialOrder;

impl<K: Ord + ?Sized> Compare<K> for NaturalOrder {
    #[inline]
    fn compare(&self, lhs: &K, rhs: &K) -> Option<Ordering> {
        Some(lhs.cmp(rhs))
    }
}

impl<K: PartialOrd + ?Sized> Compare<K> for PartialOrder {
    #[inline]
    fn compare(&self, lhs: &K, rhs: &K) -> Option<Ordering> {
        lhs.partial_cmp(rhs)
    }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, lhs: &K, rhs: &K) -> Option<Ordering> {
        Some(self(lhs, rhs))
    }
}

//! Element-wise arithmetic over resource vectors.
//!
//! All helpers assume both operands have the same length; callers validate
//! shape before reaching here.

/// True when every component of `a` is at most the matching component of `b`
pub fn fits_within(a: &[u32], b: &[u32]) -> bool {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).all(|(x, y)| x <= y)
}

/// `acc += other`, component-wise
///
/// Only used on working vectors bounded by the per-resource totals, which
/// are checked to fit in `u32` when a snapshot is built.
pub fn add_assign(acc: &mut [u32], other: &[u32]) {
    debug_assert_eq!(acc.len(), other.len());
    for (a, b) in acc.iter_mut().zip(other) {
        *a += *b;
    }
}

/// `a + b`, or `None` if any component overflows
pub fn checked_add(a: &[u32], b: &[u32]) -> Option<Vec<u32>> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x.checked_add(*y)).collect()
}

/// `a - b`, or `None` if any component would go negative
pub fn checked_sub(a: &[u32], b: &[u32]) -> Option<Vec<u32>> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x.checked_sub(*y)).collect()
}

/// Index of the first component where `a[i] > b[i]`
pub fn first_excess(a: &[u32], b: &[u32]) -> Option<usize> {
    a.iter().zip(b).position(|(x, y)| x > y)
}

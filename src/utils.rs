//! Utility types and functions shared across the crate.

use std::cmp::Ordering;

/// A wrapper around f64 that implements `Ord` by using `total_cmp`.
/// This allows f64 values to be used in contexts requiring total ordering,
/// such as `BinaryHeap`, sorting, and other ordered collections.
///
/// # Examples
///
/// ```
/// use plantnet::utils::OrdF64;
/// use std::collections::BinaryHeap;
///
/// let mut heap = BinaryHeap::new();
/// heap.push(OrdF64(3.14));
/// heap.push(OrdF64(2.71));
/// heap.push(OrdF64(1.41));
///
/// assert_eq!(heap.pop().unwrap().0, 3.14);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrdF64(pub f64);

impl Eq for OrdF64 {}

impl PartialOrd for OrdF64 {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrdF64 {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for OrdF64 {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<OrdF64> for f64 {
    fn from(value: OrdF64) -> Self {
        value.0
    }
}

/// Split `[0, len)` into `parts` contiguous ranges as `(chunk_idx, start, end)`.
///
/// Ensures `parts in [1, len]` (when `len > 0`) and distributes remainder fairly.
/// Ranges are non-empty and cover the entire domain.
///
/// Both the Floyd-Warshall row bands and the Dijkstra source chunks are cut
/// with this.
pub fn split_ranges(len: usize, parts: usize) -> Vec<(usize, usize, usize)> {
    let parts = parts.max(1).min(len.max(1));
    let base = len / parts;
    let rem = len % parts;

    let mut out = Vec::with_capacity(parts);
    let mut start = 0usize;
    for idx in 0..parts {
        let extra = if idx < rem { 1 } else { 0 };
        let end = start + base + extra;
        if start < end {
            out.push((idx, start, end));
        }
        start = end;
    }
    out
}

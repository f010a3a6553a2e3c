//! Direction vectors in `{-1, 0, 1}^N` and their stable integer indices.
//!
//! Every exchange partner of a rank is identified by a nonzero direction
//! vector. The index assigned here is pure arithmetic on the vector, so
//! every rank derives the same id for the same direction without any
//! coordination — which is what makes the ids usable inside message tags.

use loam_core::Coord;
use smallvec::smallvec;

/// Stable index of a direction vector: its lexicographic rank within
/// `{-1, 0, 1}^N`, with axis 0 as the most significant digit.
///
/// The center vector `(0, ..., 0)` maps to `(3^N - 1) / 2`.
pub fn direction_index(d: &[i32]) -> usize {
    debug_assert!(d.iter().all(|&c| (-1..=1).contains(&c)));
    d.iter().fold(0usize, |acc, &c| acc * 3 + (c + 1) as usize)
}

/// Index of the opposite direction, `direction_index(-d)`.
///
/// A send in direction `d` is received by the peer under this index.
pub fn reverse_index(d: &[i32]) -> usize {
    d.iter().fold(0usize, |acc, &c| acc * 3 + (1 - c) as usize)
}

/// Decode an index produced by [`direction_index`] back into its vector.
pub fn direction_of(mut index: usize, ndim: usize) -> Coord {
    let mut d: Coord = smallvec![0; ndim];
    for axis in (0..ndim).rev() {
        d[axis] = (index % 3) as i32 - 1;
        index /= 3;
    }
    d
}

/// All `3^N - 1` nonzero direction vectors, in index order.
pub fn neighborhood(ndim: usize) -> Vec<Coord> {
    let count = 3usize.pow(ndim as u32);
    (0..count)
        .map(|i| direction_of(i, ndim))
        .filter(|d| d.iter().any(|&c| c != 0))
        .collect()
}

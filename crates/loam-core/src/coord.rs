//! The [`Coord`] type alias used for all integer coordinates.

use smallvec::SmallVec;

/// A coordinate in simulation space or on the rank mesh.
///
/// Uses `SmallVec<[i32; 4]>` to avoid heap allocation for spaces up to
/// four dimensions. Higher-dimensional spaces spill to the heap
/// transparently. The same alias serves global cell coordinates, local
/// (ghost-inclusive) coordinates, rank-mesh coordinates, and direction
/// vectors in `{-1, 0, 1}^N`.
pub type Coord = SmallVec<[i32; 4]>;

//! Rectangular arrangement of ranks and the partitioning of the global box.

use crate::error::MeshError;
use loam_core::{Coord, GridBounds};
use smallvec::smallvec;

/// A Cartesian arrangement of ranks on a rectangular mesh.
///
/// Ranks are numbered `0..size` in row-major order (last axis fastest).
/// When `periodic` is true the mesh wraps on every axis, so every rank
/// has all `3^N - 1` neighbors; otherwise directions that step off the
/// mesh have no neighbor.
///
/// The topology is immutable and shared read-only by every layer bound
/// to it; it must outlive those layers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartTopology {
    shape: Vec<usize>,
    periodic: bool,
}

impl CartTopology {
    /// Create a topology from the ranks-per-axis shape.
    ///
    /// Returns `Err(MeshError::InvalidShape)` for an empty shape or an
    /// axis with zero ranks.
    pub fn new(shape: Vec<usize>, periodic: bool) -> Result<Self, MeshError> {
        if shape.is_empty() {
            return Err(MeshError::InvalidShape {
                reason: "mesh must have at least one axis".into(),
            });
        }
        if let Some(axis) = shape.iter().position(|&n| n == 0) {
            return Err(MeshError::InvalidShape {
                reason: format!("axis {axis} has zero ranks"),
            });
        }
        Ok(Self { shape, periodic })
    }

    /// Number of mesh axes.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of ranks on the mesh.
    pub fn size(&self) -> usize {
        self.shape.iter().product()
    }

    /// Ranks per axis.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// True if the mesh wraps on every axis.
    pub fn is_periodic(&self) -> bool {
        self.periodic
    }

    /// Mesh coordinates of a rank.
    pub fn coordinates(&self, rank: usize) -> Result<Coord, MeshError> {
        if rank >= self.size() {
            return Err(MeshError::RankOutOfRange {
                rank,
                size: self.size(),
            });
        }
        let mut coords: Coord = smallvec![0; self.ndim()];
        let mut rest = rank;
        for axis in (0..self.ndim()).rev() {
            coords[axis] = (rest % self.shape[axis]) as i32;
            rest /= self.shape[axis];
        }
        Ok(coords)
    }

    /// Rank reached from `coords` by stepping one mesh cell in direction
    /// `offset`, or `None` when the step leaves a non-periodic mesh.
    pub fn rank_of(&self, coords: &[i32], offset: &[i32]) -> Option<usize> {
        debug_assert_eq!(coords.len(), self.ndim());
        debug_assert_eq!(offset.len(), self.ndim());
        let mut rank = 0usize;
        for axis in 0..self.ndim() {
            let n = self.shape[axis] as i32;
            let mut c = coords[axis] + offset[axis];
            if c < 0 || c >= n {
                if !self.periodic {
                    return None;
                }
                c = c.rem_euclid(n);
            }
            rank = rank * self.shape[axis] + c as usize;
        }
        Some(rank)
    }

    /// The slab of the global box owned by `rank`.
    ///
    /// Every axis of the global box must divide evenly by the rank count
    /// on that axis; otherwise the mesh cannot tile the box and
    /// `Err(MeshError::DoesNotTile)` is returned.
    pub fn local_bounds(&self, rank: usize, global: &GridBounds) -> Result<GridBounds, MeshError> {
        if global.ndim() != self.ndim() {
            return Err(MeshError::InvalidShape {
                reason: format!(
                    "mesh is {}D but the global box is {}D",
                    self.ndim(),
                    global.ndim()
                ),
            });
        }
        let coords = self.coordinates(rank)?;
        let mut origin: Coord = smallvec![0; self.ndim()];
        let mut extents: Coord = smallvec![0; self.ndim()];
        for axis in 0..self.ndim() {
            let ranks = self.shape[axis];
            let extent = global.extent(axis);
            if extent % ranks as i32 != 0 {
                return Err(MeshError::DoesNotTile {
                    axis,
                    extent,
                    ranks,
                });
            }
            let per_rank = extent / ranks as i32;
            origin[axis] = global.min(axis) + coords[axis] * per_rank;
            extents[axis] = per_rank;
        }
        Ok(GridBounds::new(origin, extents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn global_10x10() -> GridBounds {
        GridBounds::new(smallvec![0, 0], smallvec![10, 10])
    }

    #[test]
    fn rejects_empty_and_zero_shapes() {
        assert!(matches!(
            CartTopology::new(vec![], false),
            Err(MeshError::InvalidShape { .. })
        ));
        assert!(matches!(
            CartTopology::new(vec![2, 0], false),
            Err(MeshError::InvalidShape { .. })
        ));
    }

    #[test]
    fn coordinates_are_row_major() {
        let t = CartTopology::new(vec![2, 3], false).unwrap();
        assert_eq!(t.size(), 6);
        assert_eq!(t.coordinates(0).unwrap().as_slice(), &[0, 0]);
        assert_eq!(t.coordinates(1).unwrap().as_slice(), &[0, 1]);
        assert_eq!(t.coordinates(3).unwrap().as_slice(), &[1, 0]);
        assert_eq!(t.coordinates(5).unwrap().as_slice(), &[1, 2]);
        assert!(matches!(
            t.coordinates(6),
            Err(MeshError::RankOutOfRange { rank: 6, size: 6 })
        ));
    }

    #[test]
    fn rank_of_inverts_coordinates() {
        let t = CartTopology::new(vec![2, 3, 2], true).unwrap();
        for rank in 0..t.size() {
            let coords = t.coordinates(rank).unwrap();
            assert_eq!(t.rank_of(&coords, &[0, 0, 0]), Some(rank));
        }
    }

    #[test]
    fn non_periodic_edges_have_no_neighbor() {
        let t = CartTopology::new(vec![2], false).unwrap();
        assert_eq!(t.rank_of(&[0], &[-1]), None);
        assert_eq!(t.rank_of(&[0], &[1]), Some(1));
        assert_eq!(t.rank_of(&[1], &[1]), None);
    }

    #[test]
    fn periodic_edges_wrap() {
        let t = CartTopology::new(vec![2], true).unwrap();
        assert_eq!(t.rank_of(&[0], &[-1]), Some(1));
        assert_eq!(t.rank_of(&[1], &[1]), Some(0));
        // A single-rank axis wraps onto itself.
        let solo = CartTopology::new(vec![1], true).unwrap();
        assert_eq!(solo.rank_of(&[0], &[1]), Some(0));
        assert_eq!(solo.rank_of(&[0], &[-1]), Some(0));
    }

    #[test]
    fn local_bounds_partition_the_global_box() {
        let t = CartTopology::new(vec![2, 2], false).unwrap();
        let global = global_10x10();
        let b0 = t.local_bounds(0, &global).unwrap();
        assert_eq!(b0, GridBounds::new(smallvec![0, 0], smallvec![5, 5]));
        let b3 = t.local_bounds(3, &global).unwrap();
        assert_eq!(b3, GridBounds::new(smallvec![5, 5], smallvec![5, 5]));

        let total: usize = (0..t.size())
            .map(|r| t.local_bounds(r, &global).unwrap().cell_count())
            .sum();
        assert_eq!(total, global.cell_count());
    }

    #[test]
    fn uneven_division_is_rejected() {
        let t = CartTopology::new(vec![3], false).unwrap();
        let global = GridBounds::new(smallvec![0], smallvec![10]);
        assert!(matches!(
            t.local_bounds(0, &global),
            Err(MeshError::DoesNotTile {
                axis: 0,
                extent: 10,
                ranks: 3
            })
        ));
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let t = CartTopology::new(vec![2, 2], false).unwrap();
        let global = GridBounds::new(smallvec![0], smallvec![10]);
        assert!(matches!(
            t.local_bounds(0, &global),
            Err(MeshError::InvalidShape { .. })
        ));
    }

    proptest! {
        #[test]
        fn slabs_never_overlap(
            nx in 1usize..5,
            ny in 1usize..5,
            periodic in proptest::bool::ANY,
        ) {
            let t = CartTopology::new(vec![nx, ny], periodic).unwrap();
            let global = GridBounds::new(
                smallvec![0, 0],
                smallvec![(nx * 3) as i32, (ny * 3) as i32],
            );
            let slabs: Vec<GridBounds> = (0..t.size())
                .map(|r| t.local_bounds(r, &global).unwrap())
                .collect();
            for (i, a) in slabs.iter().enumerate() {
                for b in slabs.iter().skip(i + 1) {
                    let overlap = (0..2).all(|ax| {
                        a.min(ax) < b.max(ax) && b.min(ax) < a.max(ax)
                    });
                    prop_assert!(!overlap, "slabs {a} and {b} overlap");
                }
            }
        }
    }
}

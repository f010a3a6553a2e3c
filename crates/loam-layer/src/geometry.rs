//! Aggregate slab geometry: axes, linear layout, and the neighbor table.

use crate::axis::DimensionAxis;
use crate::error::LayerError;
use crate::neighbor::NeighborLink;
use crate::volume::VolumeSpec;
use loam_core::GridBounds;
use loam_mesh::direction;
use loam_mesh::CartTopology;

/// The immutable geometry of one rank's slab of a layer.
///
/// Built once at layer construction from the topology, the global box,
/// and the ghost width. Owns the per-axis data, the linear layout
/// (`places`), the total storage length, and one [`NeighborLink`] per
/// reachable mesh neighbor.
///
/// Storage is laid out as a nested loop with axis 0 innermost:
/// `places[0] = 1`, `places[i] = places[i-1] * width[i-1]`, and the
/// offset of an indexed position `p` is the dot product of `p` with
/// `places`.
#[derive(Clone, Debug)]
pub struct LayerGeometry {
    axes: Vec<DimensionAxis>,
    places: Vec<usize>,
    length: usize,
    ghost_width: u32,
    neighbors: Vec<NeighborLink>,
}

impl LayerGeometry {
    /// Derive the slab geometry for `rank`.
    ///
    /// Fails when the mesh cannot tile the global box, or when the ghost
    /// width exceeds the local width on some axis (a ghost region must be
    /// fillable from the nearest neighbor alone).
    pub fn new(
        topology: &CartTopology,
        rank: usize,
        global: &GridBounds,
        ghost_width: u32,
    ) -> Result<Self, LayerError> {
        let local = topology.local_bounds(rank, global)?;
        let ndim = topology.ndim();

        let mut axes = Vec::with_capacity(ndim);
        let mut places = Vec::with_capacity(ndim);
        let mut length = 1usize;
        for axis in 0..ndim {
            let datum =
                DimensionAxis::new(axis, global, &local, ghost_width, topology.is_periodic());
            if datum.local_width() < 1 {
                return Err(LayerError::Misconfigured {
                    reason: format!("axis {axis} has an empty local interval"),
                });
            }
            if ghost_width as i32 > datum.local_width() {
                return Err(LayerError::Misconfigured {
                    reason: format!(
                        "ghost width {ghost_width} exceeds local width {} on axis {axis}",
                        datum.local_width()
                    ),
                });
            }
            places.push(length);
            length *= datum.width() as usize;
            axes.push(datum);
        }

        let neighbors = Self::build_neighbor_table(topology, rank, &axes, &places)?;

        Ok(Self {
            axes,
            places,
            length,
            ghost_width,
            neighbors,
        })
    }

    fn build_neighbor_table(
        topology: &CartTopology,
        rank: usize,
        axes: &[DimensionAxis],
        places: &[usize],
    ) -> Result<Vec<NeighborLink>, LayerError> {
        let my_coords = topology.coordinates(rank)?;
        let mut table = Vec::new();
        for dir in direction::neighborhood(topology.ndim()) {
            let Some(peer) = topology.rank_of(&my_coords, &dir) else {
                continue;
            };

            let shape: Vec<usize> = axes
                .iter()
                .zip(&dir)
                .map(|(axis, &d)| axis.send_recv_size(d))
                .collect();
            let volume = VolumeSpec::new(shape, places.to_vec());

            // The send volume holds the local cells just inside this
            // rank's border; their mirror image on the peer is the peer's
            // incoming ghost region.
            let mut send_offset = 0usize;
            let mut recv_offset = 0usize;
            for (i, axis) in axes.iter().enumerate() {
                let send_start = if dir[i] <= 0 {
                    axis.left_ghost()
                } else {
                    axis.width() - 2 * axis.right_ghost()
                };
                let recv_start = match dir[i].cmp(&0) {
                    std::cmp::Ordering::Less => 0,
                    std::cmp::Ordering::Equal => axis.left_ghost(),
                    std::cmp::Ordering::Greater => axis.width() - axis.right_ghost(),
                };
                send_offset += send_start as usize * places[i];
                recv_offset += recv_start as usize * places[i];
            }

            table.push(NeighborLink {
                peer,
                send_dir: direction::direction_index(&dir),
                recv_dir: direction::reverse_index(&dir),
                direction: dir,
                volume,
                send_offset,
                recv_offset,
            });
        }
        Ok(table)
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.axes.len()
    }

    /// Total storage length of one bank, ghost cells included.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Uniform ghost width per side per axis.
    pub fn ghost_width(&self) -> u32 {
        self.ghost_width
    }

    /// Per-axis geometry.
    pub fn axes(&self) -> &[DimensionAxis] {
        &self.axes
    }

    /// Linear-layout multipliers, axis 0 first.
    pub fn places(&self) -> &[usize] {
        &self.places
    }

    /// The exchange descriptors, one per reachable neighbor.
    pub fn neighbors(&self) -> &[NeighborLink] {
        &self.neighbors
    }

    /// Linear offset of a global coordinate, or `None` when the
    /// coordinate falls outside the slab's ghost-inclusive frame on any
    /// axis.
    pub fn index_of(&self, coord: &[i32]) -> Option<usize> {
        if coord.len() != self.ndim() {
            return None;
        }
        let mut offset = 0usize;
        for (i, axis) in self.axes.iter().enumerate() {
            let idx = axis.indexed(coord[i], false);
            if idx < 0 || idx >= axis.width() {
                return None;
            }
            offset += idx as usize * self.places[i];
        }
        Some(offset)
    }

    /// True if the coordinate lies in the locally-owned box on all axes.
    pub fn in_local_bounds(&self, coord: &[i32]) -> bool {
        coord.len() == self.ndim()
            && self
                .axes
                .iter()
                .zip(coord)
                .all(|(axis, &c)| axis.in_local(c))
    }

    /// Visit every cell in storage order (axis 0 fastest).
    ///
    /// The callback receives the indexed position (per-axis, in
    /// `0..width`), the linear offset, and whether the cell lies in a
    /// ghost region (any axis inside a ghost band).
    pub(crate) fn for_each_position(&self, mut f: impl FnMut(&[i32], usize, bool)) {
        let ndim = self.ndim();
        let mut pos = vec![0i32; ndim];
        let mut offset = 0usize;
        loop {
            let ghost = self.axes.iter().zip(&pos).any(|(axis, &p)| {
                p < axis.left_ghost() || p >= axis.left_ghost() + axis.local_width()
            });
            f(&pos, offset, ghost);
            let mut axis = 0;
            loop {
                pos[axis] += 1;
                offset += self.places[axis];
                if pos[axis] < self.axes[axis].width() {
                    break;
                }
                offset -= self.places[axis] * pos[axis] as usize;
                pos[axis] = 0;
                axis += 1;
                if axis == ndim {
                    return;
                }
            }
        }
    }

    /// Write `local_value` into owned cells and `ghost_value` into ghost
    /// cells, each gated by its flag.
    pub(crate) fn fill(
        &self,
        data: &mut [f64],
        local_value: f64,
        ghost_value: f64,
        do_local: bool,
        do_ghost: bool,
    ) {
        if !do_local && !do_ghost {
            return;
        }
        self.for_each_position(|_, offset, ghost| {
            if ghost {
                if do_ghost {
                    data[offset] = ghost_value;
                }
            } else if do_local {
                data[offset] = local_value;
            }
        });
    }
}

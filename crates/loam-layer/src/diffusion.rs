//! Double-buffered N-dimensional field with a synchronous stencil update.

use crate::config::LayerConfig;
use crate::csv;
use crate::error::LayerError;
use crate::exchange::exchange_ghosts;
use crate::geometry::LayerGeometry;
use loam_core::Diffusor;
use loam_mesh::{CartTopology, MeshComm};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

/// A partitioned N-dimensional field updated synchronously by a
/// [`Diffusor`] over a fixed-radius neighborhood.
///
/// Two equal banks back the field. During [`diffuse`](Self::diffuse)
/// every read comes from the pre-update bank and every write goes to
/// the other, so cell visit order cannot leak partial updates into the
/// stencil; afterwards the banks swap roles by flipping an index —
/// no pointers change hands.
///
/// Cells whose stencil overlaps a non-wrapping global boundary read
/// whatever the ghost region holds (the configured ghost value,
/// typically `NaN`); the diffusor owns its boundary policy.
///
/// Like [`ValueLayer`](crate::ValueLayer), construction and
/// [`synchronize`](Self::synchronize) are collective across all ranks of
/// the topology.
pub struct DiffusionLayer {
    topology: Arc<CartTopology>,
    comm: MeshComm,
    geometry: LayerGeometry,
    banks: [Vec<f64>; 2],
    current: usize,
}

impl DiffusionLayer {
    /// Build this rank's slab, fill both banks with the configured
    /// initial values, and run one collective ghost exchange.
    pub fn new(
        topology: Arc<CartTopology>,
        comm: MeshComm,
        config: LayerConfig,
    ) -> Result<Self, LayerError> {
        let geometry = LayerGeometry::new(&topology, comm.rank(), &config.bounds, config.ghost_width)?;
        let length = geometry.length();
        let mut layer = Self {
            topology,
            comm,
            geometry,
            banks: [vec![0.0; length], vec![0.0; length]],
            current: 0,
        };
        layer.initialize(config.initial_value, config.initial_ghost_value);
        layer.synchronize()?;
        Ok(layer)
    }

    /// This rank's id on the mesh.
    pub fn rank(&self) -> usize {
        self.comm.rank()
    }

    /// The topology this layer is bound to.
    pub fn topology(&self) -> &Arc<CartTopology> {
        &self.topology
    }

    /// The slab geometry.
    pub fn geometry(&self) -> &LayerGeometry {
        &self.geometry
    }

    /// Value at a global coordinate in the active bank, or `NaN` when it
    /// is out of range.
    pub fn get(&self, coord: &[i32]) -> f64 {
        match self.geometry.index_of(coord) {
            Some(offset) => self.banks[self.current][offset],
            None => f64::NAN,
        }
    }

    /// Overwrite the value at a global coordinate in the active bank.
    ///
    /// Returns the stored value, or `NaN` when the coordinate is out of
    /// range (in which case nothing is written).
    pub fn set(&mut self, coord: &[i32], value: f64) -> f64 {
        match self.geometry.index_of(coord) {
            Some(offset) => {
                self.banks[self.current][offset] = value;
                value
            }
            None => f64::NAN,
        }
    }

    /// Add to the value at a global coordinate in the active bank.
    ///
    /// Returns the new stored value, or `NaN` when the coordinate is out
    /// of range (in which case nothing is written).
    pub fn add(&mut self, coord: &[i32], value: f64) -> f64 {
        match self.geometry.index_of(coord) {
            Some(offset) => {
                let bank = &mut self.banks[self.current];
                bank[offset] += value;
                bank[offset]
            }
            None => f64::NAN,
        }
    }

    /// True if the coordinate lies in this rank's owned box on all axes.
    pub fn in_local_bounds(&self, coord: &[i32]) -> bool {
        self.geometry.in_local_bounds(coord)
    }

    /// Reset both banks: owned cells to `local_value`, ghost cells to
    /// `ghost_value`.
    pub fn initialize(&mut self, local_value: f64, ghost_value: f64) {
        for bank in &mut self.banks {
            self.geometry.fill(bank, local_value, ghost_value, true, true);
        }
    }

    /// Reset only the selected regions of both banks to `value`.
    pub fn initialize_where(&mut self, value: f64, fill_local: bool, fill_ghost: bool) {
        for bank in &mut self.banks {
            self.geometry.fill(bank, value, value, fill_local, fill_ghost);
        }
    }

    /// Apply the diffusor to every owned cell, flip banks, and refresh
    /// ghosts from the neighbors.
    pub fn diffuse(&mut self, diffusor: &dyn Diffusor) -> Result<(), LayerError> {
        self.diffuse_inner(diffusor, false)
    }

    /// Apply the diffusor and flip banks, but skip the ghost exchange.
    ///
    /// Ghost regions are stale afterwards; a later
    /// [`synchronize`](Self::synchronize) is required to complete the
    /// update. Mainly useful for measuring the compute phase alone.
    pub fn diffuse_without_sync(&mut self, diffusor: &dyn Diffusor) -> Result<(), LayerError> {
        self.diffuse_inner(diffusor, true)
    }

    fn diffuse_inner(&mut self, diffusor: &dyn Diffusor, omit_sync: bool) -> Result<(), LayerError> {
        let radius = diffusor.radius();
        let ghost = self.geometry.ghost_width();
        if radius > ghost {
            return Err(LayerError::RadiusExceedsGhost { radius, ghost });
        }

        let rel = stencil_offsets(self.geometry.places(), radius as i32);
        let mut vals = vec![0.0; rel.len()];

        let [bank_a, bank_b] = &mut self.banks;
        let (src, dst) = if self.current == 0 {
            (&*bank_a, bank_b)
        } else {
            (&*bank_b, bank_a)
        };
        self.geometry.for_each_position(|_, offset, ghost_cell| {
            if ghost_cell {
                return;
            }
            for (slot, &off) in vals.iter_mut().zip(&rel) {
                // Radius <= ghost width keeps every probe inside storage.
                *slot = src[(offset as isize + off) as usize];
            }
            dst[offset] = diffusor.new_value(&vals);
        });

        self.current = 1 - self.current;
        if !omit_sync {
            self.synchronize()?;
        }
        Ok(())
    }

    /// Refresh the active bank's ghost cells from all neighbors,
    /// blocking until every exchanged volume has landed.
    pub fn synchronize(&mut self) -> Result<(), LayerError> {
        exchange_ghosts(
            &mut self.comm,
            &self.geometry,
            &mut self.banks[self.current],
        )
    }

    /// Dump this rank's active bank to
    /// `<prefix>DiffusionLayer_<tag>_<rank>.csv`.
    ///
    /// Header `DIM_0,...,DIM_{N-1},VALUE`; one row per nonzero cell, with
    /// coordinates in the local frame (first owned cell at the origin).
    /// Ghost rows are included only when `write_shared_boundary_areas`
    /// is set.
    pub fn write_csv(
        &self,
        prefix: &str,
        tag: &str,
        write_shared_boundary_areas: bool,
    ) -> io::Result<PathBuf> {
        csv::write_layer(
            &self.geometry,
            &self.banks[self.current],
            prefix,
            tag,
            self.rank(),
            write_shared_boundary_areas,
        )
    }
}

/// Relative linear offsets of the `(2r + 1)^N` stencil, enumerated
/// lexicographically with axis 0 fastest; the zero offset sits at the
/// middle index.
fn stencil_offsets(places: &[usize], radius: i32) -> Vec<isize> {
    let ndim = places.len();
    let side = (2 * radius + 1) as usize;
    let count = side.pow(ndim as u32);
    let mut rel = Vec::with_capacity(count);
    let mut digits = vec![0i32; ndim];
    for _ in 0..count {
        let offset: isize = digits
            .iter()
            .zip(places)
            .map(|(&d, &p)| (d - radius) as isize * p as isize)
            .sum();
        rel.push(offset);
        for digit in digits.iter_mut() {
            *digit += 1;
            if *digit < side as i32 {
                break;
            }
            *digit = 0;
        }
    }
    rel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diffusors::VonNeumannAverage;
    use loam_core::GridBounds;
    use smallvec::smallvec;

    struct Identity;

    impl Diffusor for Identity {
        fn new_value(&self, vals: &[f64]) -> f64 {
            vals[(vals.len() - 1) / 2]
        }
    }

    /// One periodic rank owning the whole 8-cell line, ghost 1.
    fn solo_line(initial: f64, ghost: f64) -> DiffusionLayer {
        let topology = Arc::new(CartTopology::new(vec![1], true).unwrap());
        let comm = MeshComm::for_topology(&topology).pop().unwrap();
        let config = LayerConfig::new(GridBounds::new(smallvec![0], smallvec![8]), 1)
            .with_initial(initial, ghost);
        DiffusionLayer::new(topology, comm, config).unwrap()
    }

    #[test]
    fn stencil_offsets_center_is_zero() {
        // 2D layout, axis widths 10 x anything: places [1, 10].
        let rel = stencil_offsets(&[1, 10], 1);
        assert_eq!(rel.len(), 9);
        assert_eq!(rel[4], 0);
        assert_eq!(rel[0], -11); // (-1, -1)
        assert_eq!(rel[1], -10); // ( 0, -1)
        assert_eq!(rel[5], 1); //   (+1,  0)
        assert_eq!(rel[8], 11); //  (+1, +1)
    }

    #[test]
    fn identity_diffusion_preserves_the_field_and_refreshes_ghosts() {
        let mut layer = solo_line(1.0, 0.0);
        layer.diffuse(&Identity).unwrap();
        assert_eq!(layer.get(&[0]), 1.0);
        // After the post-diffuse exchange both wrap ghosts mirror the
        // opposite edge.
        assert_eq!(layer.banks[layer.current][0], 1.0);
        assert_eq!(layer.banks[layer.current][9], 1.0);
    }

    #[test]
    fn diffuse_reads_only_the_pre_swap_bank() {
        // A moving pulse: identity keeps values in place, so two ticks
        // leave the field unchanged even though banks alternate.
        let mut layer = solo_line(0.0, 0.0);
        layer.set(&[3], 9.0);
        layer.diffuse(&Identity).unwrap();
        layer.diffuse(&Identity).unwrap();
        assert_eq!(layer.get(&[3]), 9.0);
        assert_eq!(layer.get(&[2]), 0.0);
    }

    #[test]
    fn omit_sync_mutates_only_the_local_region_of_the_other_bank() {
        let mut layer = solo_line(2.0, -3.0);
        let before_current = layer.current;
        let before = layer.banks[layer.current].clone();
        layer.diffuse_without_sync(&Identity).unwrap();
        // The pre-swap bank is bitwise untouched.
        assert_eq!(layer.banks[1 - layer.current], before);
        assert_ne!(layer.current, before_current);
        // Ghost cells of the new bank were not written by the sweep:
        // they still hold the constructor-era ghost fill. (Only the
        // active bank's ghosts were refreshed by the constructor's
        // exchange.)
        assert_eq!(layer.banks[layer.current][0], -3.0);
        assert_eq!(layer.banks[layer.current][9], -3.0);
    }

    #[test]
    fn radius_wider_than_ghost_region_is_rejected() {
        struct Wide;
        impl Diffusor for Wide {
            fn radius(&self) -> u32 {
                2
            }
            fn new_value(&self, vals: &[f64]) -> f64 {
                vals[(vals.len() - 1) / 2]
            }
        }
        let mut layer = solo_line(0.0, 0.0);
        assert!(matches!(
            layer.diffuse(&Wide),
            Err(LayerError::RadiusExceedsGhost { radius: 2, ghost: 1 })
        ));
    }

    #[test]
    fn point_mass_spreads_to_face_neighbors() {
        let topology = Arc::new(CartTopology::new(vec![1, 1], true).unwrap());
        let comm = MeshComm::for_topology(&topology).pop().unwrap();
        let config = LayerConfig::new(GridBounds::new(smallvec![0, 0], smallvec![6, 6]), 1);
        let mut layer = DiffusionLayer::new(topology, comm, config).unwrap();
        layer.set(&[3, 3], 5.0);
        layer.diffuse(&VonNeumannAverage).unwrap();
        // Center and each of the four face neighbors settle at 5/5.
        assert_eq!(layer.get(&[3, 3]), 1.0);
        for nb in [[2, 3], [4, 3], [3, 2], [3, 4]] {
            assert_eq!(layer.get(&nb), 1.0);
        }
        // Diagonal neighbors see no mass.
        assert_eq!(layer.get(&[2, 2]), 0.0);
        // Mass is conserved.
        let total: f64 = (0..6)
            .flat_map(|x| (0..6).map(move |y| (x, y)))
            .map(|(x, y)| layer.get(&[x, y]))
            .sum();
        assert!((total - 5.0).abs() < 1e-12);
    }

    #[test]
    fn set_and_add_operate_on_the_active_bank() {
        let mut layer = solo_line(0.0, 0.0);
        assert_eq!(layer.set(&[2], 4.0), 4.0);
        assert_eq!(layer.add(&[2], 0.5), 4.5);
        assert!(layer.set(&[99], 1.0).is_nan());
        assert_eq!(layer.get(&[2]), 4.5);
    }
}

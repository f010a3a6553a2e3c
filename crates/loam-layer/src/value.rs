//! Single-bank N-dimensional scalar field with ghost exchange.

use crate::config::LayerConfig;
use crate::csv;
use crate::error::LayerError;
use crate::exchange::exchange_ghosts;
use crate::geometry::LayerGeometry;
use loam_mesh::{CartTopology, MeshComm};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

/// A partitioned N-dimensional field of `f64` with one scalar per cell.
///
/// Each rank owns one slab of the global box plus a rim of ghost cells
/// mirroring its neighbors. Reads and writes address cells by *global*
/// coordinates; coordinates that fall outside the slab's ghost-inclusive
/// frame are reported by returning `NaN` and leaving the field
/// untouched.
///
/// The layer is single-threaded: it lives on its rank's thread, and no
/// writes may happen concurrently with [`synchronize`](Self::synchronize).
/// Construction is collective — every rank of the topology must construct
/// its layer at the same time, because the constructor performs one
/// initial ghost exchange.
pub struct ValueLayer {
    topology: Arc<CartTopology>,
    comm: MeshComm,
    geometry: LayerGeometry,
    data: Vec<f64>,
}

impl ValueLayer {
    /// Build this rank's slab of the field, fill it with the configured
    /// initial values, and run one collective ghost exchange.
    pub fn new(
        topology: Arc<CartTopology>,
        comm: MeshComm,
        config: LayerConfig,
    ) -> Result<Self, LayerError> {
        let geometry = LayerGeometry::new(&topology, comm.rank(), &config.bounds, config.ghost_width)?;
        let mut data = vec![0.0; geometry.length()];
        geometry.fill(
            &mut data,
            config.initial_value,
            config.initial_ghost_value,
            true,
            true,
        );
        let mut layer = Self {
            topology,
            comm,
            geometry,
            data,
        };
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

    /// Value at a global coordinate, or `NaN` when it is out of range.
    pub fn get(&self, coord: &[i32]) -> f64 {
        match self.geometry.index_of(coord) {
            Some(offset) => self.data[offset],
            None => f64::NAN,
        }
    }

    /// Overwrite the value at a global coordinate.
    ///
    /// Returns the stored value, or `NaN` when the coordinate is out of
    /// range (in which case nothing is written).
    pub fn set(&mut self, coord: &[i32], value: f64) -> f64 {
        match self.geometry.index_of(coord) {
            Some(offset) => {
                self.data[offset] = value;
                value
            }
            None => f64::NAN,
        }
    }

    /// Add to the value at a global coordinate.
    ///
    /// Returns the new stored value, or `NaN` when the coordinate is out
    /// of range (in which case nothing is written).
    pub fn add(&mut self, coord: &[i32], value: f64) -> f64 {
        match self.geometry.index_of(coord) {
            Some(offset) => {
                self.data[offset] += value;
                self.data[offset]
            }
            None => f64::NAN,
        }
    }

    /// True if the coordinate lies in this rank's owned box on all axes.
    pub fn in_local_bounds(&self, coord: &[i32]) -> bool {
        self.geometry.in_local_bounds(coord)
    }

    /// Reset owned cells to `local_value` and ghost cells to
    /// `ghost_value`.
    pub fn initialize(&mut self, local_value: f64, ghost_value: f64) {
        self.geometry
            .fill(&mut self.data, local_value, ghost_value, true, true);
    }

    /// Reset only the selected regions to `value`.
    pub fn initialize_where(&mut self, value: f64, fill_local: bool, fill_ghost: bool) {
        self.geometry
            .fill(&mut self.data, value, value, fill_local, fill_ghost);
    }

    /// Refresh ghost cells from all neighbors, blocking until every
    /// exchanged volume has landed.
    pub fn synchronize(&mut self) -> Result<(), LayerError> {
        exchange_ghosts(&mut self.comm, &self.geometry, &mut self.data)
    }

    /// Dump this rank's slab to `<prefix>DiffusionLayer_<tag>_<rank>.csv`.
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
            &self.data,
            prefix,
            tag,
            self.rank(),
            write_shared_boundary_areas,
        )
    }
}

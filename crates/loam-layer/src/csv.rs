//! Per-rank CSV dump of a layer's storage.
//!
//! One file per rank, named `<prefix>DiffusionLayer_<tag>_<rank>.csv`,
//! with header `DIM_0,...,DIM_{N-1},VALUE` and one row per cell holding a
//! nonzero value. Coordinates are emitted in the local frame shifted by
//! the ghost width, so the rank's first owned cell is `(0, ..., 0)` and
//! ghost rows (written only when `write_shared_boundary_areas` is set)
//! carry negative coordinates on their ghost axes.

use crate::geometry::LayerGeometry;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::PathBuf;

pub(crate) fn write_layer(
    geometry: &LayerGeometry,
    data: &[f64],
    prefix: &str,
    tag: &str,
    rank: usize,
    write_shared_boundary_areas: bool,
) -> io::Result<PathBuf> {
    let path = PathBuf::from(format!("{prefix}DiffusionLayer_{tag}_{rank}.csv"));

    let mut out = String::new();
    for i in 0..geometry.ndim() {
        let _ = write!(out, "DIM_{i},");
    }
    out.push_str("VALUE\n");

    geometry.for_each_position(|pos, offset, ghost| {
        if ghost && !write_shared_boundary_areas {
            return;
        }
        let value = data[offset];
        if value != 0.0 {
            for (i, axis) in geometry.axes().iter().enumerate() {
                let _ = write!(out, "{},", pos[i] - axis.left_ghost());
            }
            let _ = writeln!(out, "{value}");
        }
    });

    fs::write(&path, out)?;
    Ok(path)
}

//! Round trip of the per-rank CSV dump.

use loam_core::GridBounds;
use loam_layer::{DiffusionLayer, LayerConfig};
use loam_test_utils::run_mesh;
use smallvec::smallvec;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// The distinctive nonzero cells seeded into the 8x8 torus.
fn seeded_cells() -> BTreeMap<[i32; 2], f64> {
    [[0, 0], [3, 5], [6, 2], [7, 7]]
        .into_iter()
        .map(|[x, y]| ([x, y], f64::from(x * 10 + y + 1)))
        .collect()
}

fn read_rows(path: &Path) -> Vec<([i32; 2], f64)> {
    let text = fs::read_to_string(path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("DIM_0,DIM_1,VALUE"));
    lines
        .map(|line| {
            let mut parts = line.split(',');
            let x: i32 = parts.next().unwrap().parse().unwrap();
            let y: i32 = parts.next().unwrap().parse().unwrap();
            let value: f64 = parts.next().unwrap().parse().unwrap();
            assert!(parts.next().is_none(), "extra column in {line:?}");
            ([x, y], value)
        })
        .collect()
}

fn write_dumps(prefix: &str) -> Vec<(usize, [i32; 2])> {
    let prefix = prefix.to_owned();
    run_mesh(&[2, 2], true, move |ctx| {
        let bounds = GridBounds::new(smallvec![0, 0], smallvec![8, 8]);
        let local = ctx.topology.local_bounds(ctx.rank, &bounds).unwrap();
        let config = LayerConfig::new(bounds, 1);
        let mut layer = DiffusionLayer::new(ctx.topology.clone(), ctx.comm, config).unwrap();

        for (coord, value) in seeded_cells() {
            if layer.in_local_bounds(&coord) {
                layer.set(&coord, value);
            }
        }
        layer.synchronize().unwrap();

        layer.write_csv(&prefix, "shared", true).unwrap();
        layer.write_csv(&prefix, "local", false).unwrap();
        (ctx.rank, [local.min(0), local.min(1)])
    })
}

#[test]
fn dump_recovers_every_nonzero_cell_per_rank() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = format!("{}/", dir.path().display());
    let origins = write_dumps(&prefix);
    let seeded = seeded_cells();

    // Owned rows across all ranks reconstruct exactly the seeded cells.
    let mut recovered = BTreeMap::new();
    for (rank, origin) in &origins {
        let path = dir.path().join(format!("DiffusionLayer_shared_{rank}.csv"));
        for ([x, y], value) in read_rows(&path) {
            let owned = (0..4).contains(&x) && (0..4).contains(&y);
            let global = [
                (origin[0] + x).rem_euclid(8),
                (origin[1] + y).rem_euclid(8),
            ];
            // Ghost rows mirror some owner's cell; owned rows are the
            // owner's cells themselves. Either way the value must match.
            assert_eq!(seeded.get(&global), Some(&value), "row ({x}, {y})");
            if owned {
                assert!(
                    recovered.insert(global, value).is_none(),
                    "cell {global:?} dumped twice"
                );
            }
        }
    }
    assert_eq!(recovered, seeded);
}

#[test]
fn ghost_rows_are_omitted_without_the_shared_flag() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = format!("{}/", dir.path().display());
    let origins = write_dumps(&prefix);
    let seeded = seeded_cells();

    let mut recovered = BTreeMap::new();
    for (rank, origin) in &origins {
        let path = dir.path().join(format!("DiffusionLayer_local_{rank}.csv"));
        for ([x, y], value) in read_rows(&path) {
            assert!(
                (0..4).contains(&x) && (0..4).contains(&y),
                "ghost row ({x}, {y}) leaked into the local-only dump"
            );
            recovered.insert([origin[0] + x, origin[1] + y], value);
        }
    }
    assert_eq!(recovered, seeded);
}

//! Criterion micro-benchmarks for the diffusion sweep and ghost exchange.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use loam_core::GridBounds;
use loam_layer::{DiffusionLayer, LayerConfig, VonNeumannAverage};
use loam_mesh::{CartTopology, MeshComm};
use smallvec::smallvec;
use std::sync::Arc;

/// One periodic rank owning the whole 64x64 torus, ghost 1. Self-wired
/// exchange keeps the benchmark single-threaded while still exercising
/// the full pack/send/recv/unpack path.
fn solo_torus() -> DiffusionLayer {
    let topology = Arc::new(CartTopology::new(vec![1, 1], true).unwrap());
    let comm = MeshComm::for_topology(&topology).pop().unwrap();
    let bounds = GridBounds::new(smallvec![0, 0], smallvec![64, 64]);
    DiffusionLayer::new(topology, comm, LayerConfig::new(bounds, 1)).unwrap()
}

/// Benchmark: one full diffuse (sweep + bank flip + exchange) over 4K cells.
fn bench_diffuse_64x64(c: &mut Criterion) {
    let mut layer = solo_torus();
    layer.set(&[32, 32], 100.0);

    c.bench_function("diffuse_radius1_64x64", |b| {
        b.iter(|| {
            layer.diffuse(&VonNeumannAverage).unwrap();
            black_box(layer.get(&[32, 32]));
        });
    });
}

/// Benchmark: the sweep alone, exchange omitted.
fn bench_diffuse_without_sync_64x64(c: &mut Criterion) {
    let mut layer = solo_torus();
    layer.set(&[32, 32], 100.0);

    c.bench_function("diffuse_no_sync_radius1_64x64", |b| {
        b.iter(|| {
            layer.diffuse_without_sync(&VonNeumannAverage).unwrap();
            black_box(layer.get(&[32, 32]));
        });
    });
}

/// Benchmark: ghost exchange alone on a quiescent field.
fn bench_synchronize_64x64(c: &mut Criterion) {
    let mut layer = solo_torus();

    c.bench_function("synchronize_64x64", |b| {
        b.iter(|| layer.synchronize().unwrap());
    });
}

criterion_group!(
    benches,
    bench_diffuse_64x64,
    bench_diffuse_without_sync_64x64,
    bench_synchronize_64x64
);
criterion_main!(benches);

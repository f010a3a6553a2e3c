//! Loam: distributed N-dimensional value layers for agent-based
//! simulation.
//!
//! This is the top-level facade crate re-exporting the public API from
//! the Loam sub-crates. For most users, adding `loam` as a single
//! dependency is sufficient.
//!
//! A *layer* is an N-dimensional field of `f64` scalars partitioned
//! across a rectangular mesh of ranks. Each rank owns one slab plus a
//! rim of ghost cells mirroring its neighbors; `synchronize` refreshes
//! the ghosts collectively, and a
//! [`DiffusionLayer`](prelude::DiffusionLayer) rewrites every owned cell
//! from a fixed-radius neighborhood each tick through a user-supplied
//! [`Diffusor`](prelude::Diffusor).
//!
//! # Quick start
//!
//! ```rust
//! use loam::prelude::*;
//! use std::sync::Arc;
//!
//! // One periodic rank owning an 8-cell line with a one-cell ghost rim.
//! let topology = Arc::new(CartTopology::new(vec![1], true).unwrap());
//! let comm = MeshComm::for_topology(&topology).pop().unwrap();
//! let bounds = GridBounds::new(Coord::from_slice(&[0]), Coord::from_slice(&[8]));
//! let config = LayerConfig::new(bounds, 1);
//! let mut layer = DiffusionLayer::new(topology, comm, config).unwrap();
//!
//! // A kernel that keeps every cell as it is.
//! struct Identity;
//! impl Diffusor for Identity {
//!     fn new_value(&self, vals: &[f64]) -> f64 {
//!         vals[(vals.len() - 1) / 2]
//!     }
//! }
//!
//! layer.set(&[3], 1.0);
//! layer.diffuse(&Identity).unwrap();
//! assert_eq!(layer.get(&[3]), 1.0);
//! ```
//!
//! Multi-rank use is identical except that every rank of the topology
//! constructs its layer concurrently (layers are collective objects);
//! the `loam-test-utils` crate shows the thread-per-rank pattern.
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `loam-core` | Coordinates, bounds, the `Diffusor` trait |
//! | [`mesh`] | `loam-mesh` | Cartesian topology, directions, transport |
//! | [`layer`] | `loam-layer` | Geometry, value and diffusion layers, CSV dump |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub use loam_core as types;
pub use loam_layer as layer;
pub use loam_mesh as mesh;

/// The most commonly used types, re-exported in one place.
pub mod prelude {
    pub use loam_core::{Coord, Diffusor, GridBounds};
    pub use loam_layer::{
        DiffusionLayer, FiniteMean, LayerConfig, LayerError, ValueLayer, VonNeumannAverage,
    };
    pub use loam_mesh::{CartTopology, MeshComm, MeshError};
}

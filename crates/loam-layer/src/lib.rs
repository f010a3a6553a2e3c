//! Ghost-buffered N-dimensional value and diffusion layers.
//!
//! A layer is a partitioned field of `f64` scalars owned jointly by the
//! ranks of a [`CartTopology`](loam_mesh::CartTopology). Each rank
//! stores its own slab plus a rim of ghost cells mirroring its
//! neighbors, refreshed collectively by `synchronize`.
//! [`ValueLayer`] is the plain single-bank field;
//! [`DiffusionLayer`] adds a second bank and applies a
//! [`Diffusor`](loam_core::Diffusor) synchronously over a fixed-radius
//! stencil each tick.
//!
//! Coordinate frames: public reads and writes use *global* coordinates;
//! internally every cell lives at a *simplified* (local,
//! ghost-inclusive) coordinate, mapped to a linear offset through
//! [`LayerGeometry`]. The transform resolves wrap-around, so a
//! coordinate one ghost width past a wrapped edge addresses the
//! corresponding ghost cell.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod axis;
pub mod config;
mod csv;
pub mod diffusion;
pub mod diffusors;
pub mod error;
mod exchange;
pub mod geometry;
pub mod neighbor;
pub mod value;
pub mod volume;

pub use axis::DimensionAxis;
pub use config::LayerConfig;
pub use diffusion::DiffusionLayer;
pub use diffusors::{FiniteMean, VonNeumannAverage};
pub use error::LayerError;
pub use geometry::LayerGeometry;
pub use neighbor::NeighborLink;
pub use value::ValueLayer;
pub use volume::VolumeSpec;

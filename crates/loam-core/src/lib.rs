//! Core types and traits for the Loam distributed value-layer library.
//!
//! This is the leaf crate with zero internal Loam dependencies. It defines
//! the fundamental abstractions shared by the mesh and layer crates:
//! coordinates, rectangular bounds, and the [`Diffusor`] trait.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bounds;
pub mod coord;
pub mod diffusor;

pub use bounds::GridBounds;
pub use coord::Coord;
pub use diffusor::Diffusor;

//! Cartesian rank topology and the tagged channel transport.
//!
//! A [`CartTopology`] arranges a set of ranks on a rectangular mesh and
//! carves a global [`GridBounds`](loam_core::GridBounds) into one slab per
//! rank. A [`MeshComm`] is one rank's endpoint of the communicator wired
//! across the whole mesh: sends never block, receives rendezvous on a
//! `(peer, tag)` pair. Direction vectors in `{-1, 0, 1}^N` and their
//! stable integer indices live in [`direction`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod comm;
pub mod direction;
pub mod error;
pub mod topology;

pub use comm::MeshComm;
pub use error::MeshError;
pub use topology::CartTopology;

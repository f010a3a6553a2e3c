//! Test utilities for Loam development.
//!
//! Layers are collective objects: every rank of a topology must
//! construct and synchronize in lockstep. [`run_mesh`] stands up a whole
//! mesh on scoped threads — one per rank — runs a closure on each, and
//! collects the per-rank results. Tests assert on the returned values,
//! so failures surface as ordinary assertion panics joined back onto the
//! test thread.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use loam_mesh::{CartTopology, MeshComm};
use std::sync::Arc;
use std::thread;

/// Everything one rank's closure needs: its id, the shared topology,
/// and its communicator endpoint.
pub struct MeshContext {
    pub rank: usize,
    pub topology: Arc<CartTopology>,
    pub comm: MeshComm,
}

/// Run `f` once per rank of a fresh mesh, each on its own thread, and
/// return the results indexed by rank.
///
/// # Panics
///
/// Panics if the shape is invalid or any rank's thread panics — both are
/// test failures, not conditions to handle.
pub fn run_mesh<T, F>(shape: &[usize], periodic: bool, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(MeshContext) -> T + Sync,
{
    let topology =
        Arc::new(CartTopology::new(shape.to_vec(), periodic).expect("valid mesh shape"));
    let comms = MeshComm::for_topology(&topology);
    thread::scope(|scope| {
        let handles: Vec<_> = comms
            .into_iter()
            .enumerate()
            .map(|(rank, comm)| {
                let topology = Arc::clone(&topology);
                let f = &f;
                scope.spawn(move || {
                    f(MeshContext {
                        rank,
                        topology,
                        comm,
                    })
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(value) => value,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}

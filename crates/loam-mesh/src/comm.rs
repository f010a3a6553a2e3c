//! One rank's endpoint of the mesh-wide communicator.
//!
//! Every pair of ranks is wired with an unbounded crossbeam channel, so a
//! send never blocks and never deadlocks regardless of posting order. A
//! receive blocks until a datagram matching the requested `(peer, tag)`
//! pair arrives; datagrams for other rendezvous points are stashed in a
//! mailbox and handed out when their own receive is posted. This gives the
//! same rendezvous semantics as posting a set of non-blocking operations
//! and waiting on all of them.

use crate::error::MeshError;
use crate::topology::CartTopology;
use crossbeam_channel::{unbounded, Receiver, Sender};
use indexmap::IndexMap;
use std::cell::Cell;
use std::collections::VecDeque;

/// One tagged message between two ranks.
#[derive(Debug)]
struct Datagram {
    from: usize,
    tag: u32,
    payload: Vec<f64>,
}

/// A single rank's endpoint of the communicator.
///
/// Endpoints are created in one batch by [`MeshComm::for_topology`] and
/// then moved onto their rank's thread; an endpoint is not shared between
/// threads. Each endpoint carries the communicator's rolling exchange
/// counter, advanced once per collective exchange by every rank in
/// lockstep.
pub struct MeshComm {
    rank: usize,
    peers: Vec<Sender<Datagram>>,
    inbox: Receiver<Datagram>,
    mailbox: IndexMap<(usize, u32), VecDeque<Vec<f64>>>,
    sync_count: Cell<u32>,
}

impl MeshComm {
    /// Number of exchange-counter values before wrap-around.
    ///
    /// The wait-for-all barrier guarantees at most one exchange's traffic
    /// in flight per pair, so any modulus of at least 2 disambiguates;
    /// 10 keeps tags readable.
    pub const SYNC_MODULUS: u32 = 10;

    /// Build the fully-wired set of endpoints for a topology, one per
    /// rank, indexed by rank id.
    pub fn for_topology(topology: &CartTopology) -> Vec<MeshComm> {
        let size = topology.size();
        let (senders, receivers): (Vec<_>, Vec<_>) =
            (0..size).map(|_| unbounded::<Datagram>()).unzip();
        receivers
            .into_iter()
            .enumerate()
            .map(|(rank, inbox)| MeshComm {
                rank,
                peers: senders.clone(),
                inbox,
                mailbox: IndexMap::new(),
                sync_count: Cell::new(0),
            })
            .collect()
    }

    /// This endpoint's rank id.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Number of ranks reachable through this endpoint.
    pub fn size(&self) -> usize {
        self.peers.len()
    }

    /// Post a datagram to `peer`. Never blocks.
    ///
    /// Sending to oneself is allowed; the datagram is delivered through
    /// the same path as any other and picked up by a later [`recv`].
    ///
    /// [`recv`]: MeshComm::recv
    pub fn send(&self, peer: usize, tag: u32, payload: Vec<f64>) -> Result<(), MeshError> {
        self.peers[peer]
            .send(Datagram {
                from: self.rank,
                tag,
                payload,
            })
            .map_err(|_| MeshError::Disconnected { peer })
    }

    /// Receive the datagram sent by `peer` with `tag`, blocking until it
    /// arrives.
    ///
    /// Datagrams consumed from the channel that match a different
    /// rendezvous point are stashed and returned by the `recv` that asks
    /// for them, so arrival order across peers and tags is immaterial.
    pub fn recv(&mut self, peer: usize, tag: u32) -> Result<Vec<f64>, MeshError> {
        if let Some(queue) = self.mailbox.get_mut(&(peer, tag)) {
            if let Some(payload) = queue.pop_front() {
                return Ok(payload);
            }
        }
        loop {
            let datagram = self
                .inbox
                .recv()
                .map_err(|_| MeshError::Disconnected { peer })?;
            if datagram.from == peer && datagram.tag == tag {
                return Ok(datagram.payload);
            }
            self.mailbox
                .entry((datagram.from, datagram.tag))
                .or_default()
                .push_back(datagram.payload);
        }
    }

    /// Advance the rolling exchange counter and return its new value in
    /// `0..SYNC_MODULUS`.
    ///
    /// The counter belongs to the communicator, not to any one layer:
    /// every layer bound to this endpoint shares it, which is sound
    /// because a rank issues collective exchanges serially.
    pub fn next_sync_count(&self) -> u32 {
        let next = (self.sync_count.get() + 1) % Self::SYNC_MODULUS;
        self.sync_count.set(next);
        next
    }
}

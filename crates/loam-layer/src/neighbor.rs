//! Per-neighbor exchange descriptors.

use crate::volume::VolumeSpec;
use loam_core::Coord;

/// Everything needed to exchange ghost volumes with one mesh neighbor.
///
/// One link exists per nonzero direction vector that has a peer on the
/// mesh — up to `3^N - 1` of them. The link is built once at layer
/// construction and is immutable afterwards.
///
/// The send volume covers the cells just inside this rank's border in
/// the link's direction; its mirror image on the peer is the peer's
/// incoming ghost region, which is why a single [`VolumeSpec`] serves
/// both ends with different base offsets.
#[derive(Clone, Debug)]
pub struct NeighborLink {
    pub(crate) peer: usize,
    pub(crate) direction: Coord,
    pub(crate) volume: VolumeSpec,
    pub(crate) send_offset: usize,
    pub(crate) recv_offset: usize,
    pub(crate) send_dir: usize,
    pub(crate) recv_dir: usize,
}

impl NeighborLink {
    /// The peer's rank id.
    pub fn peer(&self) -> usize {
        self.peer
    }

    /// Direction vector from this rank to the peer, in `{-1, 0, 1}^N`.
    pub fn direction(&self) -> &[i32] {
        &self.direction
    }

    /// The strided volume exchanged in both directions.
    pub fn volume(&self) -> &VolumeSpec {
        &self.volume
    }

    /// Offset of the first sent scalar from the layer base.
    pub fn send_offset(&self) -> usize {
        self.send_offset
    }

    /// Offset of the first received scalar from the layer base.
    pub fn recv_offset(&self) -> usize {
        self.recv_offset
    }

    /// Stable direction id of the outgoing volume, used in send tags.
    pub fn send_dir(&self) -> usize {
        self.send_dir
    }

    /// Stable direction id of the incoming volume (the peer's send
    /// direction), used in receive tags.
    pub fn recv_dir(&self) -> usize {
        self.recv_dir
    }
}

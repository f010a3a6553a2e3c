//! Error types for topology construction and transport failures.

use std::error::Error;
use std::fmt;

/// Errors arising from mesh construction, rank lookups, or the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MeshError {
    /// The mesh shape is unusable (empty, or an axis with zero ranks).
    InvalidShape {
        /// What went wrong.
        reason: String,
    },
    /// A rank id outside `0..size` was passed to a topology query.
    RankOutOfRange {
        /// The offending rank.
        rank: usize,
        /// Total number of ranks on the mesh.
        size: usize,
    },
    /// The global box cannot be partitioned evenly across the mesh.
    DoesNotTile {
        /// Axis on which the division fails.
        axis: usize,
        /// Global extent on that axis.
        extent: i32,
        /// Number of ranks on that axis.
        ranks: usize,
    },
    /// A peer's channel endpoint is gone. Exchanges cannot complete and
    /// ghost regions are left indeterminate; there is no resend path.
    Disconnected {
        /// The unreachable peer rank.
        peer: usize,
    },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidShape { reason } => write!(f, "invalid mesh shape: {reason}"),
            Self::RankOutOfRange { rank, size } => {
                write!(f, "rank {rank} out of range for a mesh of {size} ranks")
            }
            Self::DoesNotTile {
                axis,
                extent,
                ranks,
            } => write!(
                f,
                "global extent {extent} on axis {axis} is not divisible by {ranks} ranks"
            ),
            Self::Disconnected { peer } => write!(f, "transport to rank {peer} disconnected"),
        }
    }
}

impl Error for MeshError {}

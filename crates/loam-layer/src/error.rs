//! Error types for layer construction and exchange.

use loam_mesh::MeshError;
use std::error::Error;
use std::fmt;

/// Errors from layer construction, diffusion, or ghost exchange.
///
/// Out-of-range coordinates on `get`/`set`/`add` are deliberately not an
/// error variant: those report `NaN` at the value level and leave the
/// layer untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayerError {
    /// The layer cannot be built from the given topology and box.
    Misconfigured {
        /// What went wrong.
        reason: String,
    },
    /// A diffusor asked for a neighborhood wider than the ghost region.
    RadiusExceedsGhost {
        /// The diffusor's radius.
        radius: u32,
        /// The layer's ghost width.
        ghost: u32,
    },
    /// The transport failed mid-exchange. Ghost regions are left in an
    /// indeterminate state; there is no recovery path.
    Mesh(MeshError),
}

impl fmt::Display for LayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Misconfigured { reason } => write!(f, "layer misconfigured: {reason}"),
            Self::RadiusExceedsGhost { radius, ghost } => write!(
                f,
                "diffusion radius {radius} exceeds ghost width {ghost}"
            ),
            Self::Mesh(err) => write!(f, "ghost exchange failed: {err}"),
        }
    }
}

impl Error for LayerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Mesh(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MeshError> for LayerError {
    fn from(err: MeshError) -> Self {
        Self::Mesh(err)
    }
}

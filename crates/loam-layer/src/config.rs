//! Construction-time configuration for value and diffusion layers.

use loam_core::GridBounds;

/// Configuration shared by [`ValueLayer::new`](crate::ValueLayer::new) and
/// [`DiffusionLayer::new`](crate::DiffusionLayer::new).
///
/// The ghost width is uniform: every axis carries the same number of
/// ghost cells on both sides. Initial values are applied to both banks
/// of a diffusion layer so the first tick starts from a coherent state.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerConfig {
    /// The global simulation box, shared by all ranks.
    pub bounds: GridBounds,
    /// Ghost cells per side per axis.
    pub ghost_width: u32,
    /// Value written to every locally-owned cell at construction.
    pub initial_value: f64,
    /// Value written to every ghost cell at construction. Ghost cells
    /// along a non-wrapping global boundary are never overwritten by
    /// exchange, so this is also the permanent boundary-zone value —
    /// `f64::NAN` is the usual choice.
    pub initial_ghost_value: f64,
}

impl LayerConfig {
    /// Configuration with both initial values zero.
    pub fn new(bounds: GridBounds, ghost_width: u32) -> Self {
        Self {
            bounds,
            ghost_width,
            initial_value: 0.0,
            initial_ghost_value: 0.0,
        }
    }

    /// Replace the initial local and ghost values.
    pub fn with_initial(mut self, local: f64, ghost: f64) -> Self {
        self.initial_value = local;
        self.initial_ghost_value = ghost;
        self
    }
}

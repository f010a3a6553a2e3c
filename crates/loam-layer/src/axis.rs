//! Per-axis geometry: bounds in three coordinate frames and the
//! transforms between them.

use loam_core::GridBounds;

/// Everything a layer needs to know about one axis of its slab.
///
/// Three coordinate frames meet here:
///
/// - **global**: the shared simulation frame, `[global_min, global_max)`;
/// - **simplified**: the local ghost-inclusive frame,
///   `[local_min - left_ghost, local_max + right_ghost)`, in which all
///   indexing is done;
/// - **indexed**: simplified shifted to start at zero, `[0, width)`.
///
/// The *matching* interval is the part of simplified space whose
/// coordinates coincide with global coordinates. It covers the local
/// interval, extended into a ghost region only when the cells there
/// mirror a straight-line (non-wrapped) neighbor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DimensionAxis {
    global_min: i32,
    global_max: i32,
    local_min: i32,
    local_max: i32,
    simplified_min: i32,
    simplified_max: i32,
    matching_min: i32,
    matching_max: i32,
    left_ghost: i32,
    right_ghost: i32,
    periodic: bool,
    at_left_bound: bool,
    at_right_bound: bool,
    space_continues_left: bool,
    space_continues_right: bool,
}

impl DimensionAxis {
    /// Derive the axis geometry for `axis` from the global box, this
    /// rank's slab, the ghost width, and the global wrap flag.
    pub fn new(
        axis: usize,
        global: &GridBounds,
        local: &GridBounds,
        ghost_width: u32,
        periodic: bool,
    ) -> Self {
        let ghost = ghost_width as i32;
        let global_min = global.min(axis);
        let global_max = global.max(axis);
        let local_min = local.min(axis);
        let local_max = local.max(axis);

        let at_left_bound = local_min == global_min;
        let at_right_bound = local_max == global_max;
        let space_continues_left = !at_left_bound || periodic;
        let space_continues_right = !at_right_bound || periodic;

        let mut matching_min = local_min;
        if space_continues_left && !at_left_bound {
            matching_min -= ghost;
        }
        let mut matching_max = local_max;
        if space_continues_right && !at_right_bound {
            matching_max += ghost;
        }

        Self {
            global_min,
            global_max,
            local_min,
            local_max,
            simplified_min: local_min - ghost,
            simplified_max: local_max + ghost,
            matching_min,
            matching_max,
            left_ghost: ghost,
            right_ghost: ghost,
            periodic,
            at_left_bound,
            at_right_bound,
            space_continues_left,
            space_continues_right,
        }
    }

    /// Ghost cells on the low side.
    pub fn left_ghost(&self) -> i32 {
        self.left_ghost
    }

    /// Ghost cells on the high side.
    pub fn right_ghost(&self) -> i32 {
        self.right_ghost
    }

    /// Width of the locally-owned interval.
    pub fn local_width(&self) -> i32 {
        self.local_max - self.local_min
    }

    /// Total width including both ghost regions.
    pub fn width(&self) -> i32 {
        self.left_ghost + self.local_width() + self.right_ghost
    }

    /// Inclusive lower bound of the locally-owned interval.
    pub fn local_min(&self) -> i32 {
        self.local_min
    }

    /// Exclusive upper bound of the locally-owned interval.
    pub fn local_max(&self) -> i32 {
        self.local_max
    }

    /// Lower bound of the simplified (ghost-inclusive) frame.
    pub fn simplified_min(&self) -> i32 {
        self.simplified_min
    }

    /// Upper bound of the simplified frame.
    pub fn simplified_max(&self) -> i32 {
        self.simplified_max
    }

    /// Lower bound of the interval where simplified and global
    /// coordinates coincide.
    pub fn matching_min(&self) -> i32 {
        self.matching_min
    }

    /// Upper bound of the matching interval.
    pub fn matching_max(&self) -> i32 {
        self.matching_max
    }

    /// True if the global space wraps on this axis.
    pub fn is_periodic(&self) -> bool {
        self.periodic
    }

    /// True if this slab touches the low global boundary.
    pub fn at_left_bound(&self) -> bool {
        self.at_left_bound
    }

    /// True if this slab touches the high global boundary.
    pub fn at_right_bound(&self) -> bool {
        self.at_right_bound
    }

    /// True if cells exist beyond the low edge, by adjacency or wrap.
    pub fn space_continues_left(&self) -> bool {
        self.space_continues_left
    }

    /// True if cells exist beyond the high edge, by adjacency or wrap.
    pub fn space_continues_right(&self) -> bool {
        self.space_continues_right
    }

    /// Extent on this axis of the slab exchanged with the neighbor in
    /// direction `d` (-1, 0, or +1).
    pub fn send_recv_size(&self, d: i32) -> usize {
        match d {
            -1 => self.left_ghost as usize,
            1 => self.right_ghost as usize,
            _ => self.local_width() as usize,
        }
    }

    /// Map a global coordinate into the simplified frame, resolving
    /// wrap-around.
    ///
    /// A coordinate below the matching interval is assumed to sit just
    /// past the high global boundary of a wrapped axis, and vice versa.
    /// Only coordinates within one ghost width of the slab (directly or
    /// through the wrap) land inside `[simplified_min, simplified_max)`;
    /// anything farther afield must be rejected by the caller's range
    /// check.
    pub fn transform(&self, coord: i32) -> i32 {
        if coord < self.matching_min {
            self.matching_max + (coord - self.global_min)
        } else if coord > self.matching_max {
            self.matching_min - (self.global_max - coord)
        } else {
            coord
        }
    }

    /// Zero-based index of a coordinate in the simplified frame.
    ///
    /// `already_simplified` skips the global-to-simplified transform.
    /// The result is only valid for indexing when it lies in
    /// `[0, width)`.
    pub fn indexed(&self, coord: i32, already_simplified: bool) -> i32 {
        let simplified = if already_simplified {
            coord
        } else {
            self.transform(coord)
        };
        simplified - self.simplified_min
    }

    /// True if the global coordinate lies in the locally-owned interval.
    pub fn in_local(&self, coord: i32) -> bool {
        coord >= self.local_min && coord < self.local_max
    }
}

//! Strided rectangular sub-volumes of a layer's linear storage.

/// Describes a rectangular sub-volume of the layer array as a nested
/// strided shape: a contiguous run of `shape[0]` scalars on axis 0, and
/// `shape[i]` copies of the inner shape at stride `strides[i]` on each
/// outer axis.
///
/// The same descriptor serves both ends of an exchange; only the base
/// offset differs between the send and receive volumes. Rather than
/// handing the shape to a transport derived-type facility, the volume is
/// packed into a contiguous staging buffer on send and unpacked on
/// receive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VolumeSpec {
    shape: Vec<usize>,
    strides: Vec<usize>,
}

impl VolumeSpec {
    /// Build a descriptor from per-axis extents and element strides.
    ///
    /// `strides[0]` must be 1: axis 0 is the contiguous axis.
    pub fn new(shape: Vec<usize>, strides: Vec<usize>) -> Self {
        assert_eq!(shape.len(), strides.len());
        assert_eq!(strides.first(), Some(&1), "axis 0 must be contiguous");
        Self { shape, strides }
    }

    /// Per-axis extents of the volume.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of scalars in the volume.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    /// True if any axis has zero extent.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Linear span of the volume: one past the highest offset touched,
    /// relative to the base. Zero for an empty volume.
    pub fn span(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        self.shape
            .iter()
            .zip(&self.strides)
            .map(|(&n, &s)| (n - 1) * s)
            .sum::<usize>()
            + 1
    }

    /// Copy the volume at `base` out of `src` into a contiguous buffer,
    /// innermost axis fastest.
    pub fn pack(&self, src: &[f64], base: usize) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.len());
        if !self.is_empty() {
            self.pack_axis(src, base, self.shape.len() - 1, &mut out);
        }
        out
    }

    fn pack_axis(&self, src: &[f64], base: usize, axis: usize, out: &mut Vec<f64>) {
        if axis == 0 {
            out.extend_from_slice(&src[base..base + self.shape[0]]);
        } else {
            for i in 0..self.shape[axis] {
                self.pack_axis(src, base + i * self.strides[axis], axis - 1, out);
            }
        }
    }

    /// Scatter a contiguous buffer produced by [`pack`](Self::pack) back
    /// into the volume at `base` in `dst`.
    ///
    /// # Panics
    ///
    /// Panics if `payload` does not hold exactly [`len`](Self::len)
    /// scalars — a mismatched exchange is a wiring bug, not a
    /// recoverable condition.
    pub fn unpack(&self, dst: &mut [f64], base: usize, payload: &[f64]) {
        assert_eq!(payload.len(), self.len(), "volume/payload shape mismatch");
        if !self.is_empty() {
            let mut cursor = 0;
            self.unpack_axis(dst, base, self.shape.len() - 1, payload, &mut cursor);
        }
    }

    fn unpack_axis(
        &self,
        dst: &mut [f64],
        base: usize,
        axis: usize,
        payload: &[f64],
        cursor: &mut usize,
    ) {
        if axis == 0 {
            let run = self.shape[0];
            dst[base..base + run].copy_from_slice(&payload[*cursor..*cursor + run]);
            *cursor += run;
        } else {
            for i in 0..self.shape[axis] {
                self.unpack_axis(dst, base + i * self.strides[axis], axis - 1, payload, cursor);
            }
        }
    }
}

//! Local extremum candidates from discrete derivatives.
//!
//! Along one axis, each position gets two flags derived from forward
//! differences `d[i] = x[i + 1] - x[i]`:
//!
//! - `rising_right[i]`: `d[i] > 0`, with `d` taken as 0 past the last position.
//! - `non_increasing_left[i]`: `d[i - 1] <= 0`, with `d` taken as 0 before the
//!   first position.
//!
//! A valley rises to the right, does not increase from the left and is
//! non-positive. A peak is the exact complement on all three flags, so it is
//! strictly positive. In 2D a position must qualify on both axes.

use crate::util::{SparsifyError, SparsifyResult};

/// Axis of a row-major plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Along a row (column index varies).
    X,
    /// Along a column (row index varies).
    Y,
}

/// Per-position derivative flags along one axis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivativeFlags {
    /// Forward difference starting at the position is positive.
    pub rising_right: Vec<bool>,
    /// Forward difference ending at the position is not positive.
    pub non_increasing_left: Vec<bool>,
}

impl DerivativeFlags {
    /// Computes the flags for a row-major `height x width` plane.
    pub fn along(
        plane: &[f32],
        height: usize,
        width: usize,
        axis: Axis,
    ) -> SparsifyResult<Self> {
        check_plane_len(plane, height, width)?;
        Ok(Self::along_unchecked(plane, height, width, axis))
    }

    fn along_unchecked(plane: &[f32], height: usize, width: usize, axis: Axis) -> Self {
        let (len, step) = match axis {
            Axis::X => (width, 1),
            Axis::Y => (height, width),
        };

        let mut rising_right = vec![false; plane.len()];
        let mut non_increasing_left = vec![false; plane.len()];
        for y in 0..height {
            for x in 0..width {
                let idx = y * width + x;
                let pos = match axis {
                    Axis::X => x,
                    Axis::Y => y,
                };
                let right = if pos + 1 < len {
                    plane[idx + step] - plane[idx]
                } else {
                    0.0
                };
                let left = if pos > 0 {
                    plane[idx] - plane[idx - step]
                } else {
                    0.0
                };
                rising_right[idx] = right > 0.0;
                non_increasing_left[idx] = left <= 0.0;
            }
        }

        Self {
            rising_right,
            non_increasing_left,
        }
    }

    fn is_valley(&self, idx: usize) -> bool {
        self.rising_right[idx] && self.non_increasing_left[idx]
    }

    fn is_peak(&self, idx: usize) -> bool {
        !self.rising_right[idx] && !self.non_increasing_left[idx]
    }
}

fn check_plane_len(plane: &[f32], height: usize, width: usize) -> SparsifyResult<()> {
    let expected = height
        .checked_mul(width)
        .ok_or_else(|| SparsifyError::InvalidDimensions {
            dims: vec![height, width],
        })?;
    if plane.len() != expected {
        return Err(SparsifyError::BufferSizeMismatch {
            expected,
            got: plane.len(),
        });
    }
    Ok(())
}

// NaN counts as non-positive, so it is never a peak.
#[allow(clippy::neg_cmp_op_on_partial_ord)]
fn non_positive(value: f32) -> bool {
    !(value > 0.0)
}

/// Boolean grid marking local extremum candidates of one plane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateMask {
    data: Vec<bool>,
    height: usize,
    width: usize,
}

impl CandidateMask {
    /// Returns the number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the flags in row-major order.
    pub fn as_slice(&self) -> &[bool] {
        &self.data
    }

    /// Returns whether `(y, x)` is a candidate; out of range is `false`.
    pub fn get(&self, y: usize, x: usize) -> bool {
        if y >= self.height || x >= self.width {
            return false;
        }
        self.data[y * self.width + x]
    }

    /// Number of candidate positions.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&flag| flag).count()
    }

    /// Linear indices of candidates in row-major order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(idx, &flag)| flag.then_some(idx))
    }
}

/// Candidate mask of a 1D signal.
pub fn candidate_mask_1d(signal: &[f32]) -> CandidateMask {
    let width = signal.len();
    let flags = DerivativeFlags::along_unchecked(signal, 1, width, Axis::X);
    let data = signal
        .iter()
        .enumerate()
        .map(|(idx, &value)| {
            let valley = flags.is_valley(idx) && non_positive(value);
            let peak = flags.is_peak(idx) && !non_positive(value);
            valley || peak
        })
        .collect();
    CandidateMask {
        data,
        height: 1,
        width,
    }
}

/// Candidate mask of a row-major `height x width` plane.
///
/// Both the horizontal and the vertical cross-section through a position must
/// classify it the same way (valley or peak). Fails with `BufferSizeMismatch`
/// when `plane.len() != height * width`.
pub fn candidate_mask_2d(
    plane: &[f32],
    height: usize,
    width: usize,
) -> SparsifyResult<CandidateMask> {
    check_plane_len(plane, height, width)?;
    Ok(plane_mask_2d(plane, height, width))
}

/// Length-checked by the caller.
pub(crate) fn plane_mask_2d(plane: &[f32], height: usize, width: usize) -> CandidateMask {
    let fx = DerivativeFlags::along_unchecked(plane, height, width, Axis::X);
    let fy = DerivativeFlags::along_unchecked(plane, height, width, Axis::Y);
    let data = plane
        .iter()
        .enumerate()
        .map(|(idx, &value)| {
            let valley = fx.is_valley(idx) && fy.is_valley(idx) && non_positive(value);
            let peak = fx.is_peak(idx) && fy.is_peak(idx) && !non_positive(value);
            valley || peak
        })
        .collect();
    CandidateMask {
        data,
        height,
        width,
    }
}

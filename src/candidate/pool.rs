//! Windowed pooling by absolute value.
//!
//! A plane is tiled with non-overlapping windows; in each window the entry of
//! largest magnitude keeps its signed value. Within a window the first entry
//! in row-major order wins ties.

use crate::util::{SparsifyError, SparsifyResult};

/// How to handle trailing entries when a window does not divide an extent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PoolRemainder {
    /// Fail with `InvalidArgument`.
    #[default]
    Reject,
    /// Drop the trailing entries; they are zero in the output.
    Truncate,
    /// Pool the trailing entries as a smaller window.
    Partial,
}

/// Window extents resolved against one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AxisTiling {
    pub(crate) window: usize,
    pub(crate) count: usize,
}

impl AxisTiling {
    /// Resolves how many windows of `window` cover `extent`.
    pub(crate) fn resolve(
        extent: usize,
        window: usize,
        remainder: PoolRemainder,
        axis: &'static str,
    ) -> SparsifyResult<Self> {
        if window == 0 {
            return Err(SparsifyError::invalid_argument(format!(
                "{axis} window size must be at least 1"
            )));
        }
        let count = match remainder {
            PoolRemainder::Reject => {
                if extent % window != 0 {
                    return Err(SparsifyError::invalid_argument(format!(
                        "{axis} window size {window} does not divide extent {extent}"
                    )));
                }
                extent / window
            }
            PoolRemainder::Truncate => extent / window,
            PoolRemainder::Partial => extent.div_ceil(window),
        };
        Ok(Self { window, count })
    }

    fn span(&self, idx: usize, extent: usize) -> std::ops::Range<usize> {
        let start = idx * self.window;
        start..(start + self.window).min(extent)
    }
}

/// Returns the linear index of the largest-magnitude entry of every window.
pub(crate) fn pool_abs_argmax(
    plane: &[f32],
    height: usize,
    width: usize,
    rows: AxisTiling,
    cols: AxisTiling,
) -> Vec<usize> {
    let mut winners = Vec::with_capacity(rows.count * cols.count);
    for wy in 0..rows.count {
        for wx in 0..cols.count {
            let mut best: Option<(usize, f32)> = None;
            for y in rows.span(wy, height) {
                for x in cols.span(wx, width) {
                    let idx = y * width + x;
                    let magnitude = plane[idx].abs();
                    match best {
                        Some((_, best_mag)) if best_mag.total_cmp(&magnitude).is_ge() => {}
                        _ => best = Some((idx, magnitude)),
                    }
                }
            }
            if let Some((idx, _)) = best {
                winners.push(idx);
            }
        }
    }
    winners
}

/// Writes the per-window winners of a plane into a zero-filled `output`.
///
/// Returns the number of windows pooled.
pub(crate) fn pool_abs_into(
    plane: &[f32],
    output: &mut [f32],
    height: usize,
    width: usize,
    rows: AxisTiling,
    cols: AxisTiling,
) -> usize {
    let winners = pool_abs_argmax(plane, height, width, rows, cols);
    for &idx in &winners {
        output[idx] = plane[idx];
    }
    winners.len()
}

/// Returns the pooled index of every window of a row-major plane.
///
/// Indices are listed window by window in row-major window order.
pub fn pool_abs_indices(
    plane: &[f32],
    height: usize,
    width: usize,
    window: (usize, usize),
    remainder: PoolRemainder,
) -> SparsifyResult<Vec<usize>> {
    if plane.len() != height * width {
        return Err(SparsifyError::BufferSizeMismatch {
            expected: height * width,
            got: plane.len(),
        });
    }
    let rows = AxisTiling::resolve(height, window.0, remainder, "row")?;
    let cols = AxisTiling::resolve(width, window.1, remainder, "column")?;
    Ok(pool_abs_argmax(plane, height, width, rows, cols))
}

#[cfg(test)]
mod tests {
    use super::{pool_abs_indices, AxisTiling, PoolRemainder};
    use crate::SparsifyError;

    #[test]
    fn tiling_follows_remainder_policy() {
        assert_eq!(
            AxisTiling::resolve(6, 3, PoolRemainder::Reject, "column").unwrap(),
            AxisTiling {
                window: 3,
                count: 2
            }
        );
        assert!(matches!(
            AxisTiling::resolve(5, 3, PoolRemainder::Reject, "column"),
            Err(SparsifyError::InvalidArgument { .. })
        ));
        assert_eq!(
            AxisTiling::resolve(5, 3, PoolRemainder::Truncate, "column")
                .unwrap()
                .count,
            1
        );
        assert_eq!(
            AxisTiling::resolve(5, 3, PoolRemainder::Partial, "column")
                .unwrap()
                .count,
            2
        );
        assert!(AxisTiling::resolve(5, 0, PoolRemainder::Partial, "column").is_err());
    }

    #[test]
    fn indices_pick_first_max_in_each_window() {
        let plane = [1.0, -3.0, 3.0, 0.0, 0.0, 0.5];
        let indices = pool_abs_indices(&plane, 1, 6, (1, 3), PoolRemainder::Reject).unwrap();
        assert_eq!(indices, vec![1, 5]);
    }

    #[test]
    fn indices_keep_all_zero_windows() {
        let plane = [0.0; 4];
        let indices = pool_abs_indices(&plane, 2, 2, (2, 2), PoolRemainder::Reject).unwrap();
        assert_eq!(indices, vec![0]);
    }
}

//! The six public selectors and their free-function forms.

use crate::array::{Array, ArrayView, Shape};
use crate::candidate::mask::{candidate_mask_1d, plane_mask_2d};
use crate::candidate::nms::{suppress_1d, suppress_2d};
use crate::candidate::pool::{pool_abs_into, AxisTiling, PoolRemainder};
use crate::candidate::topk::topk_abs_into;
use crate::select::batch::map_items;
use crate::select::{expect_rank, expect_single_channel, SelectConfig, Selector};
use crate::trace::{select_done, select_span};
use crate::util::{SparsifyError, SparsifyResult};

/// Keeps the `k` largest-magnitude entries of every `(B, C, W)` batch item.
///
/// Ranking spans all `C * W` entries of an item, so channels compete with each
/// other; a channel may keep more than `k / C` entries or none at all. To rank
/// each channel on its own, reshape the input to `(B * C, 1, W)` first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TopKAbsolutes1D {
    /// Entries kept per batch item, `1 ≤ k ≤ C * W`.
    pub k: usize,
    /// Execution options.
    pub config: SelectConfig,
}

/// Keeps the `k` largest-magnitude entries of every `(B, C, H, W)` batch item.
///
/// As with [`TopKAbsolutes1D`], ranking spans every channel of the item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TopKAbsolutes2D {
    /// Entries kept per batch item, `1 ≤ k ≤ C * H * W`.
    pub k: usize,
    /// Execution options.
    pub config: SelectConfig,
}

/// Keeps the largest-magnitude entry of every window of a `(B, C, W)` array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtremaPoolIndices1D {
    /// Window length along the signal.
    pub window: usize,
    /// Handling of a trailing partial window.
    pub remainder: PoolRemainder,
    /// Execution options.
    pub config: SelectConfig,
}

/// Keeps the largest-magnitude entry of every window of a `(B, C, H, W)` array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtremaPoolIndices2D {
    /// Window extent as `(rows, columns)`.
    pub window: (usize, usize),
    /// Handling of trailing partial windows on either axis.
    pub remainder: PoolRemainder,
    /// Execution options.
    pub config: SelectConfig,
}

/// Primary extrema of `(B, 1, W)` signals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extrema1D {
    /// Suppression radius in samples.
    pub min_distance: usize,
    /// Execution options.
    pub config: SelectConfig,
}

/// Primary extrema of `(B, 1, H, W)` images.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extrema2D {
    /// Suppression radius as `(rows, columns)`.
    pub min_distance: (usize, usize),
    /// Execution options.
    pub config: SelectConfig,
}

macro_rules! with_config {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $ty {
                /// Replaces the execution options.
                pub fn with_config(mut self, config: SelectConfig) -> Self {
                    self.config = config;
                    self
                }
            }
        )+
    };
}

with_config!(
    TopKAbsolutes1D,
    TopKAbsolutes2D,
    ExtremaPoolIndices1D,
    ExtremaPoolIndices2D,
    Extrema1D,
    Extrema2D,
);

impl TopKAbsolutes1D {
    /// Creates the selector; `k` is checked against the input on each call.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            config: SelectConfig::default(),
        }
    }
}

impl TopKAbsolutes2D {
    /// Creates the selector; `k` is checked against the input on each call.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            config: SelectConfig::default(),
        }
    }
}

impl ExtremaPoolIndices1D {
    /// Creates the selector with the rejecting remainder policy.
    pub fn new(window: usize) -> Self {
        Self {
            window,
            remainder: PoolRemainder::default(),
            config: SelectConfig::default(),
        }
    }

    /// Replaces the remainder policy.
    pub fn with_remainder(mut self, remainder: PoolRemainder) -> Self {
        self.remainder = remainder;
        self
    }
}

impl ExtremaPoolIndices2D {
    /// Creates the selector with the rejecting remainder policy.
    pub fn new(window: (usize, usize)) -> Self {
        Self {
            window,
            remainder: PoolRemainder::default(),
            config: SelectConfig::default(),
        }
    }

    /// Replaces the remainder policy.
    pub fn with_remainder(mut self, remainder: PoolRemainder) -> Self {
        self.remainder = remainder;
        self
    }
}

impl Extrema1D {
    /// Creates the selector.
    pub fn new(min_distance: usize) -> Self {
        Self {
            min_distance,
            config: SelectConfig::default(),
        }
    }
}

impl Extrema2D {
    /// Creates the selector.
    pub fn new(min_distance: (usize, usize)) -> Self {
        Self {
            min_distance,
            config: SelectConfig::default(),
        }
    }
}

fn select_topk(
    op: &'static str,
    input: ArrayView<'_, f32>,
    k: usize,
    ndim: usize,
    config: SelectConfig,
) -> SparsifyResult<Array> {
    let shape = input.shape();
    expect_rank(shape, ndim)?;
    let per_item = shape.item_len();
    if k == 0 || k > per_item {
        return Err(SparsifyError::invalid_argument(format!(
            "k must be in 1..={per_item}, got {k}"
        )));
    }

    let _span = select_span!(op, k = k, batch = shape.batch()).entered();
    let (output, kept) = map_items(input, config.parallel, |src, dst| {
        topk_abs_into(src, dst, k)
    });
    select_done!(kept);
    Ok(output)
}

fn select_pool(
    op: &'static str,
    input: ArrayView<'_, f32>,
    window: (usize, usize),
    remainder: PoolRemainder,
    ndim: usize,
    config: SelectConfig,
) -> SparsifyResult<Array> {
    let shape = input.shape();
    expect_rank(shape, ndim)?;
    let (height, width) = (shape.height(), shape.width());
    let rows = AxisTiling::resolve(height, window.0, remainder, "row")?;
    let cols = AxisTiling::resolve(width, window.1, remainder, "column")?;
    let plane_len = shape.plane_len();

    let _span = select_span!(
        op,
        window_rows = window.0,
        window_cols = window.1,
        batch = shape.batch()
    )
    .entered();
    let (output, kept) = map_items(input, config.parallel, |src, dst| {
        src.chunks(plane_len)
            .zip(dst.chunks_mut(plane_len))
            .map(|(plane, out)| pool_abs_into(plane, out, height, width, rows, cols))
            .sum()
    });
    select_done!(kept);
    Ok(output)
}

fn check_extrema_input(shape: Shape, ndim: usize) -> SparsifyResult<()> {
    expect_rank(shape, ndim)?;
    expect_single_channel(shape)
}

fn extrema_1d_into(signal: &[f32], output: &mut [f32], min_distance: usize) -> usize {
    let mask = candidate_mask_1d(signal);
    let primary = suppress_1d(signal, &mask, min_distance);
    for &idx in &primary {
        output[idx] = signal[idx];
    }
    primary.len()
}

fn extrema_2d_into(
    plane: &[f32],
    output: &mut [f32],
    height: usize,
    width: usize,
    min_distance: (usize, usize),
) -> usize {
    let mask = plane_mask_2d(plane, height, width);
    let primary = suppress_2d(plane, &mask, min_distance);
    for &(row, col) in &primary {
        let idx = row * width + col;
        output[idx] = plane[idx];
    }
    primary.len()
}

/// Primary extrema of a single signal; every other entry is zero.
pub fn primary_extrema_1d(signal: &[f32], min_distance: usize) -> Vec<f32> {
    let mut output = vec![0.0; signal.len()];
    extrema_1d_into(signal, &mut output, min_distance);
    output
}

/// Primary extrema of a single row-major plane; every other entry is zero.
pub fn primary_extrema_2d(
    plane: &[f32],
    height: usize,
    width: usize,
    min_distance: (usize, usize),
) -> SparsifyResult<Vec<f32>> {
    if plane.len() != height * width {
        return Err(SparsifyError::BufferSizeMismatch {
            expected: height * width,
            got: plane.len(),
        });
    }
    let mut output = vec![0.0; plane.len()];
    extrema_2d_into(plane, &mut output, height, width, min_distance);
    Ok(output)
}

impl Selector for TopKAbsolutes1D {
    fn name(&self) -> &'static str {
        "topk_absolutes_1d"
    }

    fn select(&self, input: ArrayView<'_, f32>) -> SparsifyResult<Array> {
        select_topk(self.name(), input, self.k, 3, self.config)
    }
}

impl Selector for TopKAbsolutes2D {
    fn name(&self) -> &'static str {
        "topk_absolutes_2d"
    }

    fn select(&self, input: ArrayView<'_, f32>) -> SparsifyResult<Array> {
        select_topk(self.name(), input, self.k, 4, self.config)
    }
}

impl Selector for ExtremaPoolIndices1D {
    fn name(&self) -> &'static str {
        "extrema_pool_indices_1d"
    }

    fn select(&self, input: ArrayView<'_, f32>) -> SparsifyResult<Array> {
        select_pool(
            self.name(),
            input,
            (1, self.window),
            self.remainder,
            3,
            self.config,
        )
    }
}

impl Selector for ExtremaPoolIndices2D {
    fn name(&self) -> &'static str {
        "extrema_pool_indices_2d"
    }

    fn select(&self, input: ArrayView<'_, f32>) -> SparsifyResult<Array> {
        select_pool(
            self.name(),
            input,
            self.window,
            self.remainder,
            4,
            self.config,
        )
    }
}

impl Selector for Extrema1D {
    fn name(&self) -> &'static str {
        "extrema_1d"
    }

    fn select(&self, input: ArrayView<'_, f32>) -> SparsifyResult<Array> {
        let shape = input.shape();
        check_extrema_input(shape, 3)?;
        let min_distance = self.min_distance;

        let _span = select_span!(
            self.name(),
            min_distance = min_distance,
            batch = shape.batch()
        )
        .entered();
        let (output, kept) = map_items(input, self.config.parallel, |src, dst| {
            extrema_1d_into(src, dst, min_distance)
        });
        select_done!(kept);
        Ok(output)
    }
}

impl Selector for Extrema2D {
    fn name(&self) -> &'static str {
        "extrema_2d"
    }

    fn select(&self, input: ArrayView<'_, f32>) -> SparsifyResult<Array> {
        let shape = input.shape();
        check_extrema_input(shape, 4)?;
        let (height, width) = (shape.height(), shape.width());
        let min_distance = self.min_distance;

        let _span = select_span!(
            self.name(),
            min_distance_rows = min_distance.0,
            min_distance_cols = min_distance.1,
            batch = shape.batch()
        )
        .entered();
        let (output, kept) = map_items(input, self.config.parallel, |src, dst| {
            extrema_2d_into(src, dst, height, width, min_distance)
        });
        select_done!(kept);
        Ok(output)
    }
}

/// Keeps the `k` largest-magnitude entries per batch item of a `(B, C, W)` array.
pub fn topk_absolutes_1d(input: ArrayView<'_, f32>, k: usize) -> SparsifyResult<Array> {
    TopKAbsolutes1D::new(k).select(input)
}

/// Keeps the `k` largest-magnitude entries per batch item of a `(B, C, H, W)` array.
pub fn topk_absolutes_2d(input: ArrayView<'_, f32>, k: usize) -> SparsifyResult<Array> {
    TopKAbsolutes2D::new(k).select(input)
}

/// Pools a `(B, C, W)` array with a dividing window length.
pub fn extrema_pool_indices_1d(input: ArrayView<'_, f32>, window: usize) -> SparsifyResult<Array> {
    ExtremaPoolIndices1D::new(window).select(input)
}

/// Pools a `(B, C, H, W)` array with a dividing `(rows, columns)` window.
pub fn extrema_pool_indices_2d(
    input: ArrayView<'_, f32>,
    window: (usize, usize),
) -> SparsifyResult<Array> {
    ExtremaPoolIndices2D::new(window).select(input)
}

/// Primary extrema of `(B, 1, W)` signals.
pub fn extrema_1d(input: ArrayView<'_, f32>, min_distance: usize) -> SparsifyResult<Array> {
    Extrema1D::new(min_distance).select(input)
}

/// Primary extrema of `(B, 1, H, W)` images.
pub fn extrema_2d(input: ArrayView<'_, f32>, min_distance: (usize, usize)) -> SparsifyResult<Array> {
    Extrema2D::new(min_distance).select(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(values: &[f32]) -> Array {
        Array::from_vec(values.to_vec(), Shape::d1(1, 1, values.len()).unwrap()).unwrap()
    }

    #[test]
    fn topk_rejects_out_of_range_k() {
        let input = signal(&[1.0, 2.0, 3.0]);
        for k in [0, 4] {
            assert!(matches!(
                topk_absolutes_1d(input.view(), k),
                Err(SparsifyError::InvalidArgument { .. })
            ));
        }
        assert!(topk_absolutes_1d(input.view(), 3).is_ok());
    }

    #[test]
    fn topk_counts_all_channels_of_an_item() {
        let data = [1.0, -5.0, 2.0, 4.0];
        let input = Array::from_vec(data.to_vec(), Shape::d1(1, 2, 2).unwrap()).unwrap();
        let out = TopKAbsolutes1D::new(2).select(input.view()).unwrap();
        assert_eq!(out.as_slice(), &[0.0, -5.0, 0.0, 4.0]);
    }

    #[test]
    fn pool_pools_each_channel() {
        let data = [1.0, 2.0, -3.0, 0.5];
        let input = Array::from_vec(data.to_vec(), Shape::d1(1, 2, 2).unwrap()).unwrap();
        let out = extrema_pool_indices_1d(input.view(), 2).unwrap();
        assert_eq!(out.as_slice(), &[0.0, 2.0, -3.0, 0.0]);
    }

    #[test]
    fn pool_remainder_policies() {
        let input = signal(&[1.2, 0.0, 2.9, 7.8, 0.0]);
        assert!(matches!(
            extrema_pool_indices_1d(input.view(), 3),
            Err(SparsifyError::InvalidArgument { .. })
        ));

        let truncated = ExtremaPoolIndices1D::new(3)
            .with_remainder(PoolRemainder::Truncate)
            .select(input.view())
            .unwrap();
        assert_eq!(truncated.as_slice(), &[0.0, 0.0, 2.9, 0.0, 0.0]);

        let partial = ExtremaPoolIndices1D::new(3)
            .with_remainder(PoolRemainder::Partial)
            .select(input.view())
            .unwrap();
        assert_eq!(partial.as_slice(), &[0.0, 0.0, 2.9, 7.8, 0.0]);
    }

    #[test]
    fn extrema_requires_single_channel() {
        let input = Array::from_vec(vec![0.0; 6], Shape::d1(1, 2, 3).unwrap()).unwrap();
        assert!(matches!(
            extrema_1d(input.view(), 1),
            Err(SparsifyError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn extrema_rejects_wrong_rank() {
        let input = signal(&[0.0, 1.0, 0.0]);
        assert!(matches!(
            extrema_2d(input.view(), (1, 1)),
            Err(SparsifyError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn primary_extrema_single_plane() {
        assert_eq!(
            primary_extrema_1d(&[0.0, 1.1, 0.0, 2.7, 3.2], 3),
            vec![0.0, 0.0, 0.0, 0.0, 3.2]
        );
        assert!(primary_extrema_2d(&[0.0; 3], 2, 2, (1, 1)).is_err());
    }

    #[test]
    fn extrema_all_zero_input_is_all_zero() {
        let input = signal(&[0.0; 6]);
        let out = extrema_1d(input.view(), 2).unwrap();
        assert!(out.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn selector_names_match_free_functions() {
        let boxed: Box<dyn Selector> = Box::new(Extrema2D::new((3, 3)));
        assert_eq!(boxed.name(), "extrema_2d");
        assert_eq!(TopKAbsolutes1D::new(1).name(), "topk_absolutes_1d");
    }
}

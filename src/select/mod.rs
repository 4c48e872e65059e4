//! Batch selectors: the public sparsification operations.
//!
//! Every selector maps an input array to a zero-filled array of the same
//! shape in which only the selected entries keep their original value.

use crate::array::{Array, ArrayView, Shape};
use crate::util::{SparsifyError, SparsifyResult};

pub(crate) mod batch;
pub mod ops;

pub use ops::{
    extrema_1d, extrema_2d, extrema_pool_indices_1d, extrema_pool_indices_2d, primary_extrema_1d,
    primary_extrema_2d, topk_absolutes_1d, topk_absolutes_2d, Extrema1D, Extrema2D,
    ExtremaPoolIndices1D, ExtremaPoolIndices2D, TopKAbsolutes1D, TopKAbsolutes2D,
};

/// Execution options shared by all selectors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectConfig {
    /// Process batch items on the rayon pool (requires the `rayon` feature;
    /// ignored otherwise).
    pub parallel: bool,
}

/// A shape-preserving sparsification operation.
pub trait Selector {
    /// Short operation name, used in traces and by the CLI.
    fn name(&self) -> &'static str;

    /// Returns a same-shaped array keeping only the selected entries.
    fn select(&self, input: ArrayView<'_, f32>) -> SparsifyResult<Array>;
}

impl<S: Selector + ?Sized> Selector for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn select(&self, input: ArrayView<'_, f32>) -> SparsifyResult<Array> {
        (**self).select(input)
    }
}

fn layout(ndim: usize) -> &'static str {
    if ndim == 3 {
        "(batch, channels, width)"
    } else {
        "(batch, channels, height, width)"
    }
}

pub(crate) fn expect_rank(shape: Shape, ndim: usize) -> SparsifyResult<()> {
    if shape.ndim() != ndim {
        return Err(SparsifyError::shape_mismatch(
            format!("rank {ndim} {}", layout(ndim)),
            format!("rank {} {:?}", shape.ndim(), shape.dims()),
        ));
    }
    Ok(())
}

pub(crate) fn expect_single_channel(shape: Shape) -> SparsifyResult<()> {
    if shape.channels() != 1 {
        return Err(SparsifyError::shape_mismatch(
            "1 channel per item",
            format!("{} channels", shape.channels()),
        ));
    }
    Ok(())
}

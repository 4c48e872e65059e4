//! Sparsify is a CPU library that sparsifies batched 1D signals and 2D images.
//!
//! Each selector returns an array of the input's shape in which only a few
//! salient entries keep their original value and everything else is zero:
//!
//! - [`Extrema1D`] / [`Extrema2D`]: local peaks and valleys found from discrete
//!   derivatives, then greedily suppressed in descending magnitude within a
//!   minimum-distance window.
//! - [`TopKAbsolutes1D`] / [`TopKAbsolutes2D`]: the `k` largest magnitudes per
//!   batch item.
//! - [`ExtremaPoolIndices1D`] / [`ExtremaPoolIndices2D`]: the largest magnitude
//!   of every non-overlapping window.
//!
//! Batch items are independent; with the `rayon` feature they can be processed
//! in parallel via [`SelectConfig::parallel`].

pub mod array;
mod candidate;
pub mod lowlevel;
pub mod select;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use array::io;
pub use array::{Array, ArrayView, Shape};
pub use candidate::pool::PoolRemainder;
pub use select::{
    extrema_1d, extrema_2d, extrema_pool_indices_1d, extrema_pool_indices_2d, topk_absolutes_1d,
    topk_absolutes_2d, Extrema1D, Extrema2D, ExtremaPoolIndices1D, ExtremaPoolIndices2D,
    SelectConfig, Selector, TopKAbsolutes1D, TopKAbsolutes2D,
};
pub use util::{SparsifyError, SparsifyResult};

//! Per-item dispatch over the batch axis.
//!
//! Items never share state, so with the `rayon` feature and
//! `SelectConfig::parallel` set they are processed on the rayon pool. The
//! result is identical either way.

use crate::array::{Array, ArrayView};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Runs `f` on every batch item and returns the zero-initialised output it
/// fills, along with the total number of entries `f` reported as kept.
///
/// `f` receives one item of the input and the matching zero-filled item of
/// the output.
pub(crate) fn map_items<F>(input: ArrayView<'_, f32>, parallel: bool, f: F) -> (Array, usize)
where
    F: Fn(&[f32], &mut [f32]) -> usize + Sync,
{
    let shape = input.shape();
    let item_len = shape.item_len();
    let mut output = Array::zeros(shape);
    let kept = run_items(input.as_slice(), output.as_mut_slice(), item_len, parallel, &f);
    (output, kept)
}

#[cfg(feature = "rayon")]
fn run_items<F>(
    input: &[f32],
    output: &mut [f32],
    item_len: usize,
    parallel: bool,
    f: &F,
) -> usize
where
    F: Fn(&[f32], &mut [f32]) -> usize + Sync,
{
    if parallel {
        input
            .par_chunks(item_len)
            .zip(output.par_chunks_mut(item_len))
            .map(|(src, dst)| f(src, dst))
            .sum()
    } else {
        run_items_seq(input, output, item_len, f)
    }
}

#[cfg(not(feature = "rayon"))]
fn run_items<F>(
    input: &[f32],
    output: &mut [f32],
    item_len: usize,
    _parallel: bool,
    f: &F,
) -> usize
where
    F: Fn(&[f32], &mut [f32]) -> usize + Sync,
{
    run_items_seq(input, output, item_len, f)
}

fn run_items_seq<F>(input: &[f32], output: &mut [f32], item_len: usize, f: &F) -> usize
where
    F: Fn(&[f32], &mut [f32]) -> usize,
{
    input
        .chunks(item_len)
        .zip(output.chunks_mut(item_len))
        .map(|(src, dst)| f(src, dst))
        .sum()
}

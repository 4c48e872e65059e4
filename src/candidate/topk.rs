//! Magnitude ranking and top-k selection.

use std::cmp::Ordering;

/// Entry ranked by absolute value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ranked {
    /// Linear index of the entry within its buffer.
    pub index: usize,
    /// Absolute value of the entry.
    pub magnitude: f32,
}

impl Ranked {
    pub(crate) fn new(index: usize, value: f32) -> Self {
        Self {
            index,
            magnitude: value.abs(),
        }
    }
}

/// Descending magnitude, lower index first on ties.
///
/// `total_cmp` keeps the order total even for NaN inputs, which rank above
/// every finite magnitude.
pub(crate) fn rank_cmp_desc(a: &Ranked, b: &Ranked) -> Ordering {
    b.magnitude
        .total_cmp(&a.magnitude)
        .then_with(|| a.index.cmp(&b.index))
}

/// Returns the indices of the `k` entries with the largest absolute value.
///
/// Indices are returned in rank order. Ties at the k-th boundary go to the
/// lower index, so exactly `min(k, values.len())` indices are returned.
pub fn topk_abs_indices(values: &[f32], k: usize) -> Vec<usize> {
    let k = k.min(values.len());
    if k == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<Ranked> = values
        .iter()
        .enumerate()
        .map(|(index, &value)| Ranked::new(index, value))
        .collect();
    if k < ranked.len() {
        ranked.select_nth_unstable_by(k - 1, rank_cmp_desc);
        ranked.truncate(k);
    }
    ranked.sort_unstable_by(rank_cmp_desc);
    ranked.into_iter().map(|entry| entry.index).collect()
}

/// Writes the `k` largest-magnitude entries of `input` into `output`.
///
/// `output` must be zero-filled and the same length as `input`.
pub(crate) fn topk_abs_into(input: &[f32], output: &mut [f32], k: usize) -> usize {
    let indices = topk_abs_indices(input, k);
    for &idx in &indices {
        output[idx] = input[idx];
    }
    indices.len()
}

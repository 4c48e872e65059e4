//! Greedy non-maximum suppression over extremum candidates.
//!
//! Candidates are ranked by descending absolute value (stable on row-major
//! position) and swept once in rank order. Every candidate that is still alive
//! when visited suppresses all lower-ranked candidates inside its window;
//! suppressed candidates never suppress. The sweep is O(m^2) in the candidate
//! count and strictly sequential.

use crate::candidate::mask::CandidateMask;
use crate::candidate::topk::{rank_cmp_desc, Ranked};

/// Position type with a suppression window.
pub trait Window: Copy {
    /// Window radius, per axis where applicable.
    type Radius: Copy;

    /// Returns whether `other` lies inside the window centred on `self`.
    fn contains(&self, other: &Self, radius: Self::Radius) -> bool;
}

/// Index into a 1D signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Sample(pub usize);

impl Window for Sample {
    type Radius = usize;

    fn contains(&self, other: &Self, radius: usize) -> bool {
        self.0.abs_diff(other.0) <= radius
    }
}

/// Row/column position in a 2D plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
}

impl Window for Cell {
    /// `(row radius, column radius)`.
    type Radius = (usize, usize);

    /// Rectangular window: each axis is tested on its own.
    fn contains(&self, other: &Self, (d_row, d_col): (usize, usize)) -> bool {
        self.row.abs_diff(other.row) <= d_row && self.col.abs_diff(other.col) <= d_col
    }
}

/// Candidate extremum with its position and signed value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extremum<P> {
    /// Position of the candidate.
    pub pos: P,
    /// Original signed value.
    pub value: f32,
}

/// Runs the greedy sweep and returns the primary extrema in rank order.
///
/// `candidates` must be given in row-major position order; that order is the
/// tie-break between equal magnitudes.
pub fn suppress<P: Window>(candidates: &[Extremum<P>], radius: P::Radius) -> Vec<Extremum<P>> {
    let mut ranked: Vec<Ranked> = candidates
        .iter()
        .enumerate()
        .map(|(idx, candidate)| Ranked::new(idx, candidate.value))
        .collect();
    ranked.sort_by(rank_cmp_desc);
    let order: Vec<Extremum<P>> = ranked.iter().map(|r| candidates[r.index]).collect();

    let mut suppressed = vec![false; order.len()];
    for (i, anchor) in order.iter().enumerate() {
        if suppressed[i] {
            continue;
        }
        // Higher-ranked alive candidates are outside this window already, so
        // only the tail needs marking; the anchor itself is never visited.
        for (j, other) in order.iter().enumerate().skip(i + 1) {
            if !suppressed[j] && anchor.pos.contains(&other.pos, radius) {
                suppressed[j] = true;
            }
        }
    }

    order
        .into_iter()
        .zip(suppressed)
        .filter_map(|(candidate, gone)| (!gone).then_some(candidate))
        .collect()
}

/// Collects the candidates of a 1D signal in position order.
pub fn extrema_from_mask_1d(signal: &[f32], mask: &CandidateMask) -> Vec<Extremum<Sample>> {
    mask.indices()
        .map(|idx| Extremum {
            pos: Sample(idx),
            value: signal[idx],
        })
        .collect()
}

/// Collects the candidates of a 2D plane in row-major order.
pub fn extrema_from_mask_2d(plane: &[f32], mask: &CandidateMask) -> Vec<Extremum<Cell>> {
    let width = mask.width();
    mask.indices()
        .map(|idx| Extremum {
            pos: Cell {
                row: idx / width,
                col: idx % width,
            },
            value: plane[idx],
        })
        .collect()
}

/// Suppresses 1D candidates with a minimum index distance.
pub fn suppress_1d(signal: &[f32], mask: &CandidateMask, min_distance: usize) -> Vec<usize> {
    let candidates = extrema_from_mask_1d(signal, mask);
    suppress(&candidates, min_distance)
        .into_iter()
        .map(|e| e.pos.0)
        .collect()
}

/// Suppresses 2D candidates with a `(row, column)` minimum distance.
pub fn suppress_2d(
    plane: &[f32],
    mask: &CandidateMask,
    min_distance: (usize, usize),
) -> Vec<(usize, usize)> {
    let candidates = extrema_from_mask_2d(plane, mask);
    suppress(&candidates, min_distance)
        .into_iter()
        .map(|e| (e.pos.row, e.pos.col))
        .collect()
}

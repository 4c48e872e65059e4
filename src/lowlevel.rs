//! Low-level building blocks for custom sparsification pipelines.
//!
//! These work on a single plane (one channel of one batch item) and expose
//! the intermediate products of the extrema selectors: derivative flags, the
//! candidate mask and the suppression result. Most users should prefer the
//! batch selectors at the crate root.

pub use crate::candidate::mask::{
    candidate_mask_1d, candidate_mask_2d, Axis, CandidateMask, DerivativeFlags,
};
pub use crate::candidate::nms::{
    extrema_from_mask_1d, extrema_from_mask_2d, suppress, suppress_1d, suppress_2d, Cell,
    Extremum, Sample, Window,
};
pub use crate::candidate::pool::pool_abs_indices;
pub use crate::candidate::topk::{topk_abs_indices, Ranked};
pub use crate::select::{primary_extrema_1d, primary_extrema_2d};

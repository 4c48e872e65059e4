//! Candidate selection and pruning utilities.
//!
//! Includes derivative-based extremum candidates, greedy suppression,
//! magnitude top-k and windowed pooling.

pub mod mask;
pub mod nms;
pub mod pool;
pub mod topk;

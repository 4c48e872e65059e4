//! Shared utility helpers.

pub mod error;

pub use error::{SparsifyError, SparsifyResult};

/// Converts a signed minimum distance from host configuration.
///
/// Negative distances are rejected rather than clamped to zero.
pub fn distance_from_signed(distance: i64) -> SparsifyResult<usize> {
    usize::try_from(distance).map_err(|_| {
        SparsifyError::invalid_argument(format!(
            "minimum distance must be non-negative, got {distance}"
        ))
    })
}

/// Converts a signed count (`k` or a window extent) from host configuration.
///
/// Only the sign is checked here; range checks against the input happen in
/// the selectors themselves.
pub fn count_from_signed(count: i64) -> SparsifyResult<usize> {
    usize::try_from(count).map_err(|_| {
        SparsifyError::invalid_argument(format!("count must be non-negative, got {count}"))
    })
}

//! Error types for sparsify.

use thiserror::Error;

/// Result alias for sparsify operations.
pub type SparsifyResult<T> = std::result::Result<T, SparsifyError>;

/// Errors that can occur when running sparsify selectors.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SparsifyError {
    /// A selector parameter is out of range for the given input.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },
    /// The input does not have the layout the selector expects.
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },
    /// One of the array extents is zero or overflows.
    #[error("invalid dimensions: {dims:?}")]
    InvalidDimensions { dims: Vec<usize> },
    /// The backing buffer length does not match the shape.
    #[error("buffer size mismatch: expected {expected} elements, got {got}")]
    BufferSizeMismatch { expected: usize, got: usize },
    /// Image decoding or encoding failed.
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
}

impl SparsifyError {
    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub(crate) fn shape_mismatch(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            expected: expected.into(),
            got: got.into(),
        }
    }
}

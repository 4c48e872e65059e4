//! Convenience helpers for moving grayscale images in and out of arrays via
//! the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Pixels map to `[0, 1]`.

use crate::array::{Array, ArrayView, Shape};
use crate::util::{SparsifyError, SparsifyResult};
use std::path::Path;

/// Converts a grayscale image into a `(1, 1, H, W)` array.
pub fn array_from_gray_image(img: &image::GrayImage) -> SparsifyResult<Array> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img
        .as_raw()
        .iter()
        .map(|&px| f32::from(px) / 255.0)
        .collect();
    Array::from_vec(data, Shape::d2(1, 1, height, width)?)
}

/// Renders channel 0 of batch item `b` as a grayscale image.
///
/// Values are clamped to `[0, 1]` before quantisation.
pub fn gray_image_from_plane(
    view: ArrayView<'_, f32>,
    b: usize,
) -> SparsifyResult<image::GrayImage> {
    let shape = view.shape();
    let plane = view.plane(b, 0).ok_or_else(|| SparsifyError::ShapeMismatch {
        expected: format!("batch index < {}", shape.batch()),
        got: b.to_string(),
    })?;
    let pixels = plane
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect();
    let width = u32::try_from(shape.width()).map_err(|_| SparsifyError::InvalidDimensions {
        dims: shape.dims(),
    })?;
    let height = u32::try_from(shape.height()).map_err(|_| SparsifyError::InvalidDimensions {
        dims: shape.dims(),
    })?;
    image::GrayImage::from_raw(width, height, pixels).ok_or(SparsifyError::BufferSizeMismatch {
        expected: shape.plane_len(),
        got: plane.len(),
    })
}

/// Loads an image from disk as a `(1, 1, H, W)` grayscale array.
pub fn load_gray_array<P: AsRef<Path>>(path: P) -> SparsifyResult<Array> {
    let img = image::open(path).map_err(|err| SparsifyError::ImageIo {
        reason: err.to_string(),
    })?;
    array_from_gray_image(&img.to_luma8())
}

/// Saves channel 0 of batch item 0 as a grayscale image.
pub fn save_gray_array<P: AsRef<Path>>(view: ArrayView<'_, f32>, path: P) -> SparsifyResult<()> {
    let img = gray_image_from_plane(view, 0)?;
    img.save(path).map_err(|err| SparsifyError::ImageIo {
        reason: err.to_string(),
    })
}

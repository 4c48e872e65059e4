//! Batched array containers.
//!
//! Arrays are laid out batch-major: `[batch][channel][row][column]`, with a
//! single implicit row for 1D signals. `ArrayView` borrows a contiguous
//! buffer, `Array` owns one. Both expose per-item and per-plane slices, which
//! is all the selectors need to run independently over the batch axis.

use crate::util::{SparsifyError, SparsifyResult};

#[cfg(feature = "image-io")]
pub mod io;

/// Extents of a batched 1D or 2D array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Shape {
    batch: usize,
    channels: usize,
    height: usize,
    width: usize,
    ndim: usize,
}

impl Shape {
    /// Creates a `(batch, channels, width)` signal shape.
    pub fn d1(batch: usize, channels: usize, width: usize) -> SparsifyResult<Self> {
        Self::checked(batch, channels, 1, width, 3)
    }

    /// Creates a `(batch, channels, height, width)` image shape.
    pub fn d2(batch: usize, channels: usize, height: usize, width: usize) -> SparsifyResult<Self> {
        Self::checked(batch, channels, height, width, 4)
    }

    /// Creates a shape from a dimension list of length 3 or 4.
    pub fn from_dims(dims: &[usize]) -> SparsifyResult<Self> {
        match *dims {
            [b, c, w] => Self::d1(b, c, w),
            [b, c, h, w] => Self::d2(b, c, h, w),
            _ => Err(SparsifyError::InvalidDimensions {
                dims: dims.to_vec(),
            }),
        }
    }

    fn checked(
        batch: usize,
        channels: usize,
        height: usize,
        width: usize,
        ndim: usize,
    ) -> SparsifyResult<Self> {
        let shape = Self {
            batch,
            channels,
            height,
            width,
            ndim,
        };
        let extents = [batch, channels, height, width];
        let total = extents
            .iter()
            .try_fold(1usize, |acc, &extent| acc.checked_mul(extent));
        if extents.contains(&0) || total.is_none() {
            return Err(SparsifyError::InvalidDimensions { dims: shape.dims() });
        }
        Ok(shape)
    }

    /// Number of batch items.
    pub fn batch(&self) -> usize {
        self.batch
    }

    /// Number of channels per item.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of rows per plane (1 for signals).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns per plane.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rank of the array: 3 for signals, 4 for images.
    pub fn ndim(&self) -> usize {
        self.ndim
    }

    /// Elements in one channel plane.
    pub fn plane_len(&self) -> usize {
        self.height * self.width
    }

    /// Elements in one batch item (all channels).
    pub fn item_len(&self) -> usize {
        self.channels * self.plane_len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.batch * self.item_len()
    }

    /// Always false; shapes with a zero extent are rejected at construction.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the dimension list, `[B, C, W]` or `[B, C, H, W]`.
    pub fn dims(&self) -> Vec<usize> {
        if self.ndim == 3 {
            vec![self.batch, self.channels, self.width]
        } else {
            vec![self.batch, self.channels, self.height, self.width]
        }
    }

    fn offset(&self, b: usize, c: usize, y: usize, x: usize) -> Option<usize> {
        if b >= self.batch || c >= self.channels || y >= self.height || x >= self.width {
            return None;
        }
        Some(((b * self.channels + c) * self.height + y) * self.width + x)
    }
}

/// Borrowed view of a contiguous batched array.
#[derive(Copy, Clone, Debug)]
pub struct ArrayView<'a, T = f32> {
    data: &'a [T],
    shape: Shape,
}

impl<'a, T> ArrayView<'a, T> {
    /// Creates a view; the slice length must equal `shape.len()`.
    pub fn new(data: &'a [T], shape: Shape) -> SparsifyResult<Self> {
        if data.len() != shape.len() {
            return Err(SparsifyError::BufferSizeMismatch {
                expected: shape.len(),
                got: data.len(),
            });
        }
        Ok(Self { data, shape })
    }

    /// Returns the shape of the view.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Returns the backing slice.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns all channels of batch item `b`.
    pub fn item(&self, b: usize) -> Option<&'a [T]> {
        let len = self.shape.item_len();
        let start = b.checked_mul(len)?;
        self.data.get(start..start.checked_add(len)?)
    }

    /// Returns channel `c` of batch item `b`.
    pub fn plane(&self, b: usize, c: usize) -> Option<&'a [T]> {
        if c >= self.shape.channels {
            return None;
        }
        let len = self.shape.plane_len();
        let item = self.item(b)?;
        item.get(c * len..(c + 1) * len)
    }

    /// Returns the element at `(b, c, y, x)`; use `y = 0` for signals.
    pub fn get(&self, b: usize, c: usize, y: usize, x: usize) -> Option<&'a T> {
        self.data.get(self.shape.offset(b, c, y, x)?)
    }
}

/// Owned contiguous batched array.
#[derive(Clone, Debug, PartialEq)]
pub struct Array<T = f32> {
    data: Vec<T>,
    shape: Shape,
}

impl<T> Array<T> {
    /// Takes ownership of `data`; its length must equal `shape.len()`.
    pub fn from_vec(data: Vec<T>, shape: Shape) -> SparsifyResult<Self> {
        if data.len() != shape.len() {
            return Err(SparsifyError::BufferSizeMismatch {
                expected: shape.len(),
                got: data.len(),
            });
        }
        Ok(Self { data, shape })
    }

    /// Returns a borrowed view of the array.
    pub fn view(&self) -> ArrayView<'_, T> {
        ArrayView {
            data: &self.data,
            shape: self.shape,
        }
    }

    /// Returns the shape of the array.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Returns the backing slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the backing slice mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the array and returns its buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Returns all channels of batch item `b`.
    pub fn item(&self, b: usize) -> Option<&[T]> {
        self.view().item(b)
    }

    /// Returns channel `c` of batch item `b`.
    pub fn plane(&self, b: usize, c: usize) -> Option<&[T]> {
        self.view().plane(b, c)
    }

    /// Returns the element at `(b, c, y, x)`; use `y = 0` for signals.
    pub fn get(&self, b: usize, c: usize, y: usize, x: usize) -> Option<&T> {
        self.data.get(self.shape.offset(b, c, y, x)?)
    }
}

impl<T: Clone + Default> Array<T> {
    /// Creates an array filled with `T::default()` (zero for floats).
    pub fn zeros(shape: Shape) -> Self {
        Self {
            data: vec![T::default(); shape.len()],
            shape,
        }
    }
}

impl<T: Copy> Array<T> {
    /// Copies a view into a new owned array.
    pub fn from_view(view: ArrayView<'_, T>) -> Self {
        Self {
            data: view.as_slice().to_vec(),
            shape: view.shape(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Array, ArrayView, Shape};
    use crate::SparsifyError;

    #[test]
    fn shape_reports_extents() {
        let shape = Shape::d2(2, 3, 4, 5).unwrap();
        assert_eq!(shape.ndim(), 4);
        assert_eq!(shape.plane_len(), 20);
        assert_eq!(shape.item_len(), 60);
        assert_eq!(shape.len(), 120);
        assert_eq!(shape.dims(), vec![2, 3, 4, 5]);

        let signal = Shape::d1(1, 1, 7).unwrap();
        assert_eq!(signal.height(), 1);
        assert_eq!(signal.dims(), vec![1, 1, 7]);
    }

    #[test]
    fn shape_rejects_zero_extent() {
        let err = Shape::d1(1, 0, 4).unwrap_err();
        assert_eq!(
            err,
            SparsifyError::InvalidDimensions {
                dims: vec![1, 0, 4]
            }
        );
        assert!(Shape::from_dims(&[1, 2]).is_err());
    }

    #[test]
    fn view_slices_items_and_planes() {
        let data: Vec<f32> = (0..12).map(|v| v as f32).collect();
        let view = ArrayView::new(&data, Shape::d1(2, 2, 3).unwrap()).unwrap();
        assert_eq!(view.item(1).unwrap(), &[6.0, 7.0, 8.0, 9.0, 10.0, 11.0]);
        assert_eq!(view.plane(1, 0).unwrap(), &[6.0, 7.0, 8.0]);
        assert_eq!(view.get(0, 1, 0, 2).copied(), Some(5.0));
        assert!(view.plane(0, 2).is_none());
        assert!(view.item(2).is_none());
    }

    #[test]
    fn array_rejects_wrong_buffer_length() {
        let err = Array::from_vec(vec![0.0f32; 5], Shape::d1(1, 1, 4).unwrap()).unwrap_err();
        assert_eq!(
            err,
            SparsifyError::BufferSizeMismatch {
                expected: 4,
                got: 5
            }
        );
    }
}

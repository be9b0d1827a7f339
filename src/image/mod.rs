//! Grayscale image views and owned buffers.
//!
//! `ImageView` is a borrowed 2D view into a 1D `u8` buffer with an explicit
//! stride (elements between row starts), so padded rows are representable.
//! `OwnedImage` is a contiguous owned buffer. Both matchers consume views
//! only; nothing in the core ever writes pixels.

use crate::util::{LogoLocError, LogoLocResult};

pub mod pyramid;
pub mod resize;

#[cfg(feature = "image-io")]
pub mod io;

/// Borrowed grayscale image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> ImageView<'a> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [u8], width: usize, height: usize) -> LogoLocResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [u8], width: usize, height: usize, stride: usize) -> LogoLocResult<Self> {
        if width == 0 || height == 0 {
            return Err(LogoLocError::InvalidDimensions { width, height });
        }
        if stride < width {
            return Err(LogoLocError::InvalidStride { width, stride });
        }
        let needed = (height - 1)
            .checked_mul(stride)
            .and_then(|v| v.checked_add(width))
            .ok_or(LogoLocError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(LogoLocError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.stride + x).copied()
    }

    /// Returns the pixel at signed coordinates, or `None` outside the image.
    pub fn get_signed(&self, x: isize, y: isize) -> Option<u8> {
        if x < 0 || y < 0 {
            return None;
        }
        self.get(x as usize, y as usize)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.stride;
        self.data.get(start..start + self.width)
    }

    /// Returns a zero-copy ROI view into the same backing buffer.
    pub fn roi(&self, x: usize, y: usize, width: usize, height: usize) -> LogoLocResult<Self> {
        if width == 0 || height == 0 {
            return Err(LogoLocError::InvalidDimensions { width, height });
        }
        let oob = LogoLocError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        let end_x = x.checked_add(width).ok_or(oob.clone())?;
        let end_y = y.checked_add(height).ok_or(oob.clone())?;
        if end_x > self.width || end_y > self.height {
            return Err(oob);
        }
        let start = y * self.stride + x;
        ImageView::new(&self.data[start..], width, height, self.stride)
    }
}

/// Owned contiguous grayscale image buffer.
#[derive(Clone)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Creates an owned image from a contiguous buffer of exactly
    /// `width * height` pixels.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> LogoLocResult<Self> {
        if width == 0 || height == 0 {
            return Err(LogoLocError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(LogoLocError::InvalidDimensions { width, height })?;
        if data.len() != needed {
            return Err(LogoLocError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Copies a (possibly strided) view into a contiguous owned image.
    pub fn from_view(view: ImageView<'_>) -> Self {
        let width = view.width();
        let height = view.height();
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            // Rows are in bounds for y < height.
            data.extend_from_slice(view.row(y).expect("row within view bounds"));
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the raw pixel buffer in row-major order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns a borrowed view of the whole image.
    pub fn view(&self) -> ImageView<'_> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}

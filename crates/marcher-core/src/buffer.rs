//! Non-owning view of an RGBA8 pixel buffer
//!
//! The buffer belongs to whoever presents the frame (a window, a texture
//! upload, an image file). The renderer only borrows it for one call.

use crate::{Error, Result};

/// Bytes per RGBA8 pixel
pub const BYTES_PER_PIXEL: usize = 4;

/// Mutable view of a row-major RGBA8 image with an explicit row stride
#[derive(Debug)]
pub struct PixelView<'a> {
    data: &'a mut [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> PixelView<'a> {
    /// Wrap `data` as a `width` x `height` image whose rows start every
    /// `stride` bytes.
    ///
    /// Fails if either dimension is zero, if `stride < width * 4`, or if
    /// `data` holds fewer than `height * stride` bytes.
    pub fn new(data: &'a mut [u8], width: usize, height: usize, stride: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions {
                width: width as i64,
                height: height as i64,
            });
        }

        let min = width
            .checked_mul(BYTES_PER_PIXEL)
            .ok_or_else(|| Error::InvalidParameter(format!("width {width} overflows")))?;
        if stride < min {
            return Err(Error::InvalidStride { stride, min });
        }

        let required = height
            .checked_mul(stride)
            .ok_or_else(|| Error::InvalidParameter(format!("{height} rows of {stride} bytes overflow")))?;
        if data.len() < required {
            return Err(Error::BufferTooSmall {
                len: data.len(),
                required,
            });
        }

        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Wrap a tightly packed buffer (`stride == width * 4`)
    pub fn packed(data: &'a mut [u8], width: usize, height: usize) -> Result<Self> {
        Self::new(data, width, height, width.saturating_mul(BYTES_PER_PIXEL))
    }

    /// Borrow an [`image::RgbaImage`] as a view
    pub fn from_image(image: &'a mut image::RgbaImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        Self::packed(image, width as usize, height as usize)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes between the starts of consecutive rows
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Width divided by height
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// The `height * stride` bytes covered by the image, row padding included
    pub fn rows_mut(&mut self) -> &mut [u8] {
        let len = self.height * self.stride;
        &mut self.data[..len]
    }
}

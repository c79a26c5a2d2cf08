//! RGBA pixel buffer view and rectangular regions.
//!
//! Filters never own pixel data. The host hands over a flat RGBA slice
//! (4 bytes per pixel, row-major) and gets the same slice back, mutated.

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// Number of samples per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Mutable view over caller-owned RGBA pixel data.
#[derive(Debug)]
pub struct PixelBuffer<'a> {
    data: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> PixelBuffer<'a> {
    /// Wrap an RGBA slice, checking that its length is `width * height * 4`.
    pub fn new(data: &'a mut [u8], width: u32, height: u32) -> Result<Self, FilterError> {
        let expected = (width as usize) * (height as usize) * CHANNELS;
        if data.len() != expected {
            return Err(FilterError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Borrow the pixels of an `image::RgbaImage`.
    pub fn from_rgba_image(img: &'a mut image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let len = (width as usize) * (height as usize) * CHANNELS;
        // The backing container may be longer than the image itself.
        let data: &'a mut [u8] = img;
        let data = &mut data[..len];
        Self {
            data,
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check if the buffer holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Region covering the whole buffer.
    pub fn full_region(&self) -> Region {
        Region::full(self.width, self.height)
    }

    /// Byte offset of pixel (x, y).
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * CHANNELS
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.data
    }

    /// Copy the red channel into a row-major plane of `width * height` bytes.
    pub fn red_plane(&self) -> Vec<u8> {
        self.data.chunks_exact(CHANNELS).map(|px| px[0]).collect()
    }
}

/// Half-open pixel rectangle: columns `x1..x2`, rows `y1..y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl Region {
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Region covering a whole `width` x `height` image.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Restrict the region to a `width` x `height` image.
    ///
    /// Inverted bounds collapse to an empty region instead of wrapping.
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        let x2 = self.x2.min(width);
        let y2 = self.y2.min(height);
        Self {
            x1: self.x1.min(x2),
            y1: self.y1.min(y2),
            x2,
            y2,
        }
    }

    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }

    pub fn pixel_count(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }

    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x1 && x < self.x2 && y >= self.y1 && y < self.y2
    }
}

//! Raster - single-channel 8-bit page image
//!
//! A `Raster` is the immutable grayscale input to every analysis stage.
//! Samples are stored row-major, one byte per pixel, 0 = black and
//! 255 = white. Drawing goes through [`RasterMut`].

use crate::box_::BoundingBox;
use crate::error::{Error, Result};

/// Sample value of a fully white (paper) pixel
pub const WHITE: u8 = 255;

/// Sample value of a fully black (ink) pixel
pub const BLACK: u8 = 0;

/// Single-channel 8-bit raster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// Wrap an existing row-major sample buffer
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if either dimension is zero and
    /// [`Error::BufferLength`] if `data.len() != width * height`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a raster with every sample set to `value`
    pub fn filled(width: u32, height: u32, value: u8) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        })
    }

    /// Create a raster by evaluating `f(x, y)` for every pixel
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> u8,
    {
        check_dimensions(width, height)?;
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build from parts whose dimensions are already known to be valid
    pub(crate) fn from_parts(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize);
        Self {
            width,
            height,
            data,
        }
    }

    /// Get the width
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels
    #[inline]
    pub fn area(&self) -> usize {
        self.data.len()
    }

    /// Raw row-major samples
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the sample at (x, y), or `None` if out of bounds
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[self.index(x, y)])
    }

    /// Get the sample at (x, y) without checking each axis separately
    ///
    /// Panics if the flattened index falls outside the buffer.
    #[inline]
    pub fn get_unchecked(&self, x: u32, y: u32) -> u8 {
        self.data[self.index(x, y)]
    }

    /// Borrow one row of samples
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        Some(&self.data[start..start + self.width as usize])
    }

    /// Count samples strictly darker than `value`
    ///
    /// With `value = 255` this counts every pixel that is not pure white.
    pub fn count_below(&self, value: u8) -> usize {
        self.data.iter().filter(|&&s| s < value).count()
    }

    /// Create a mutable copy of this raster
    pub fn to_mut(&self) -> RasterMut {
        RasterMut {
            inner: self.clone(),
        }
    }

    /// Convert into a mutable raster without copying the samples
    pub fn into_mut(self) -> RasterMut {
        RasterMut { inner: self }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Mutable raster
///
/// Used to draw fixtures and render components. Convert back to an
/// immutable [`Raster`] using `Into<Raster>` before analysis.
#[derive(Debug, Clone)]
pub struct RasterMut {
    inner: Raster,
}

impl RasterMut {
    /// Create a mutable raster with every sample set to `value`
    pub fn filled(width: u32, height: u32, value: u8) -> Result<Self> {
        Ok(Raster::filled(width, height, value)?.into_mut())
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the sample at (x, y), or `None` if out of bounds
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        self.inner.get(x, y)
    }

    /// Set the sample at (x, y)
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if (x, y) lies outside the raster.
    pub fn set(&mut self, x: u32, y: u32, value: u8) -> Result<()> {
        let (width, height) = (self.inner.width, self.inner.height);
        if x >= width || y >= height {
            return Err(Error::IndexOutOfBounds {
                index: y as usize * width as usize + x as usize,
                len: self.inner.data.len(),
            });
        }
        let idx = self.inner.index(x, y);
        self.inner.data[idx] = value;
        Ok(())
    }

    /// Fill an inclusive rectangle with `value`, clipped to the raster
    pub fn fill_rect(&mut self, rect: &BoundingBox, value: u8) {
        let Some(clipped) = rect.clip(self.inner.width, self.inner.height) else {
            return;
        };
        let w = self.inner.width as usize;
        for y in clipped.top..=clipped.bottom {
            let start = y as usize * w + clipped.left as usize;
            let end = y as usize * w + clipped.right as usize;
            self.inner.data[start..=end].fill(value);
        }
    }
}

impl From<RasterMut> for Raster {
    fn from(raster: RasterMut) -> Self {
        raster.inner
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimension { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_area() {
        assert!(matches!(
            Raster::new(0, 10, Vec::new()),
            Err(Error::InvalidDimension { .. })
        ));
        assert!(Raster::filled(10, 0, WHITE).is_err());
    }

    #[test]
    fn test_new_rejects_short_buffer() {
        let err = Raster::new(4, 4, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            Error::BufferLength {
                expected: 16,
                actual: 15
            }
        ));
    }

    #[test]
    fn test_from_fn_is_row_major() {
        let r = Raster::from_fn(3, 2, |x, y| (y * 3 + x) as u8).unwrap();
        assert_eq!(r.data(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(r.get(2, 1), Some(5));
        assert_eq!(r.get(3, 0), None);
        assert_eq!(r.row(1), Some(&[3u8, 4, 5][..]));
    }

    #[test]
    fn test_fill_rect_is_inclusive_and_clipped() {
        let mut r = RasterMut::filled(5, 5, WHITE).unwrap();
        r.fill_rect(&BoundingBox::new_unchecked(3, 3, 9, 9), BLACK);
        let r: Raster = r.into();
        assert_eq!(r.count_below(WHITE), 4);
        assert_eq!(r.get(4, 4), Some(BLACK));
        assert_eq!(r.get(2, 4), Some(WHITE));
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut r = RasterMut::filled(2, 2, WHITE).unwrap();
        assert!(r.set(1, 1, 7).is_ok());
        assert_eq!(r.get(1, 1), Some(7));
        assert!(r.set(2, 0, 7).is_err());
        assert!(RasterMut::filled(0, 2, WHITE).is_err());
    }

    #[test]
    fn test_to_mut_leaves_original_untouched() {
        let original = Raster::filled(3, 3, WHITE).unwrap();
        let mut copy = original.to_mut();
        copy.set(0, 0, BLACK).unwrap();
        assert_eq!((copy.width(), copy.height()), (3, 3));

        let edited: Raster = copy.into();
        assert_eq!(original.get(0, 0), Some(WHITE));
        assert_eq!(edited.get(0, 0), Some(BLACK));
        assert_eq!(edited.count_below(WHITE), 1);

        let moved = original.into_mut();
        assert_eq!(Raster::from(moved).count_below(WHITE), 0);
    }
}

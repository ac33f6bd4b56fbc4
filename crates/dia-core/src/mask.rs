//! BinaryMask - foreground/background classification of a raster
//!
//! Internally every pixel is either [`BACKGROUND`] (0) or [`FOREGROUND`]
//! (1). At the boundary with grayscale images the mask is rendered with
//! ink as black (0) and paper as white (255).

use crate::error::{Error, Result};
use crate::raster::{BLACK, Raster, WHITE};

/// Internal value of a background pixel
pub const BACKGROUND: u8 = 0;

/// Internal value of a foreground (ink) pixel
pub const FOREGROUND: u8 = 1;

/// Binary foreground/background image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl BinaryMask {
    /// Create an all-background mask
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        Ok(Self {
            width,
            height,
            data: vec![BACKGROUND; width as usize * height as usize],
        })
    }

    /// Wrap a buffer of internal {0, 1} values
    ///
    /// # Errors
    ///
    /// Fails on a zero-area mask, a buffer of the wrong length, or any
    /// value other than [`BACKGROUND`] / [`FOREGROUND`].
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        if let Some(bad) = data.iter().position(|&v| v > FOREGROUND) {
            return Err(Error::InvalidParameter(format!(
                "mask value {} at index {bad} is not 0 or 1",
                data[bad]
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a mask from a raster: samples darker than `cutoff` are foreground
    pub fn from_raster(raster: &Raster, cutoff: u8) -> Self {
        let data = raster
            .data()
            .iter()
            .map(|&s| if s < cutoff { FOREGROUND } else { BACKGROUND })
            .collect();
        Self {
            width: raster.width(),
            height: raster.height(),
            data,
        }
    }

    /// Parse a mask from rows of `'#'` (foreground) and `'.'` (background)
    ///
    /// Handy for small hand-drawn fixtures.
    pub fn from_ascii(rows: &[&str]) -> Result<Self> {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |r| r.len()) as u32;
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for (y, row) in rows.iter().enumerate() {
            if row.len() as u32 != width {
                return Err(Error::InvalidParameter(format!(
                    "row {y} has length {}, expected {width}",
                    row.len()
                )));
            }
            data.extend(
                row.bytes()
                    .map(|b| if b == b'#' { FOREGROUND } else { BACKGROUND }),
            );
        }
        Self::from_raw(width, height, data)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Internal {0, 1} values, row-major
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Check whether (x, y) is foreground; out-of-bounds pixels are background
    #[inline]
    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        x < self.width
            && y < self.height
            && self.data[y as usize * self.width as usize + x as usize] == FOREGROUND
    }

    /// Mark (x, y) as foreground or background
    pub fn set(&mut self, x: u32, y: u32, foreground: bool) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: y as usize * self.width as usize + x as usize,
                len: self.data.len(),
            });
        }
        self.data[y as usize * self.width as usize + x as usize] =
            if foreground { FOREGROUND } else { BACKGROUND };
        Ok(())
    }

    /// Number of foreground pixels
    pub fn foreground_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == FOREGROUND).count()
    }

    /// Number of background pixels
    pub fn background_count(&self) -> usize {
        self.data.len() - self.foreground_count()
    }

    /// Foreground pixels per row
    pub fn row_foreground_counts(&self) -> Vec<u32> {
        self.data
            .chunks_exact(self.width as usize)
            .map(|row| row.iter().filter(|&&v| v == FOREGROUND).count() as u32)
            .collect()
    }

    /// Render the mask as a raster: foreground black (0), background white (255)
    pub fn to_raster(&self) -> Raster {
        let data = self
            .data
            .iter()
            .map(|&v| if v == FOREGROUND { BLACK } else { WHITE })
            .collect();
        Raster::from_parts(self.width, self.height, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_rejects_bad_values() {
        assert!(BinaryMask::from_raw(2, 1, vec![0, 255]).is_err());
        assert!(BinaryMask::from_raw(2, 1, vec![0, 1]).is_ok());
        assert!(BinaryMask::from_raw(2, 2, vec![0, 1]).is_err());
    }

    #[test]
    fn test_from_ascii() {
        let m = BinaryMask::from_ascii(&["#..", ".##"]).unwrap();
        assert_eq!(m.width(), 3);
        assert_eq!(m.height(), 2);
        assert!(m.is_foreground(0, 0));
        assert!(!m.is_foreground(1, 0));
        assert!(m.is_foreground(2, 1));
        assert!(!m.is_foreground(3, 1));
        assert_eq!(m.foreground_count(), 3);
        assert_eq!(m.background_count(), 3);
        assert_eq!(m.row_foreground_counts(), vec![1, 2]);
    }

    #[test]
    fn test_to_raster_uses_0_and_255() {
        let m = BinaryMask::from_ascii(&["#.", ".#"]).unwrap();
        let r = m.to_raster();
        assert_eq!(r.data(), &[0, 255, 255, 0]);
    }

    #[test]
    fn test_from_raster_cutoff() {
        let r = Raster::new(4, 1, vec![0, 127, 128, 255]).unwrap();
        let m = BinaryMask::from_raster(&r, 128);
        assert_eq!(m.data(), &[1, 1, 0, 0]);
    }
}

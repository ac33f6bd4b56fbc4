//! Integral image (summed-area table)
//!
//! Stores, for every pixel (x, y), the sum and the sum of squares of all
//! samples in the rectangle `(0, 0)..=(x, y)`. Once built, the mean and
//! variance of any axis-aligned rectangle are available in O(1).
//!
//! The table is immutable after construction and is shared by reference
//! across worker threads without locking.

use crate::box_::BoundingBox;
use crate::error::{Error, Result};
use crate::raster::Raster;

/// Mean and variance of a rectangular region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionStats {
    /// Arithmetic mean of the samples
    pub mean: f64,
    /// Unbiased sample variance; 0 for single-pixel regions
    pub variance: f64,
}

impl RegionStats {
    /// Standard deviation (square root of the variance)
    #[inline]
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Summed-area tables of samples and squared samples
#[derive(Debug, Clone)]
pub struct IntegralImage {
    width: u32,
    height: u32,
    sum: Vec<u64>,
    sum_sq: Vec<u64>,
}

impl IntegralImage {
    /// Build the tables for a raster
    pub fn from_raster(raster: &Raster) -> Result<Self> {
        Self::from_samples(raster.width(), raster.height(), raster.data())
    }

    /// Build the tables from a row-major 8-bit sample buffer
    ///
    /// Construction makes two linear passes: per-row prefix sums into
    /// temporary buffers, then per-column accumulation of those row sums.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] for a zero-area image and
    /// [`Error::BufferLength`] if `samples` does not hold `width * height`
    /// values.
    pub fn from_samples(width: u32, height: u32, samples: &[u8]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let w = width as usize;
        let size = w * height as usize;
        if samples.len() != size {
            return Err(Error::BufferLength {
                expected: size,
                actual: samples.len(),
            });
        }

        // Pass 1: row prefix sums
        let mut row_sum = vec![0u64; size];
        let mut row_sum_sq = vec![0u64; size];
        for (y, row) in samples.chunks_exact(w).enumerate() {
            let offset = y * w;
            let mut acc = 0u64;
            let mut acc_sq = 0u64;
            for (x, &s) in row.iter().enumerate() {
                let v = s as u64;
                acc += v;
                acc_sq += v * v;
                row_sum[offset + x] = acc;
                row_sum_sq[offset + x] = acc_sq;
            }
        }

        // Pass 2: accumulate row sums down each column. The first row is
        // already complete, so the buffers are reused in place.
        let mut sum = row_sum;
        let mut sum_sq = row_sum_sq;
        for idx in w..size {
            sum[idx] += sum[idx - w];
            sum_sq[idx] += sum_sq[idx - w];
        }

        tracing::debug!(width, height, total = sum[size - 1], "built integral image");

        Ok(Self {
            width,
            height,
            sum,
            sum_sq,
        })
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

    /// Number of pixels covered by the table
    #[inline]
    pub fn area(&self) -> usize {
        self.sum.len()
    }

    /// Sum of samples in `(0, 0)..=(x, y)`
    pub fn get(&self, x: u32, y: u32) -> Option<u64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.sum[self.index(x, y)])
    }

    /// Sum of squared samples in `(0, 0)..=(x, y)`
    pub fn get_squared(&self, x: u32, y: u32) -> Option<u64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.sum_sq[self.index(x, y)])
    }

    /// Recover the original sample at (x, y)
    pub fn sample(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.sample_unchecked(x, y))
    }

    /// [`sample`](Self::sample) without the bounds check
    #[inline]
    pub fn sample_unchecked(&self, x: u32, y: u32) -> u8 {
        self.region_sums_unchecked(x, y, x, y).0 as u8
    }

    /// Sum and sum of squares over an inclusive rectangle
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegion`] if the rectangle is inverted or
    /// extends beyond the image.
    pub fn region_sums(&self, xmin: u32, ymin: u32, xmax: u32, ymax: u32) -> Result<(u64, u64)> {
        self.check_region(xmin, ymin, xmax, ymax)?;
        Ok(self.region_sums_unchecked(xmin, ymin, xmax, ymax))
    }

    /// Mean and variance over an inclusive rectangle
    ///
    /// The variance uses the unbiased estimator
    /// `(sum_sq - sum^2 / n) / (n - 1)`. A single-pixel region has no
    /// spread and reports a variance of 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegion`] if the rectangle is inverted or
    /// extends beyond the image.
    pub fn region_stats(&self, xmin: u32, ymin: u32, xmax: u32, ymax: u32) -> Result<RegionStats> {
        self.check_region(xmin, ymin, xmax, ymax)?;
        Ok(self.region_stats_unchecked(xmin, ymin, xmax, ymax))
    }

    /// Mean and variance over a bounding box
    pub fn box_stats(&self, rect: &BoundingBox) -> Result<RegionStats> {
        self.region_stats(rect.left, rect.top, rect.right, rect.bottom)
    }

    /// [`region_stats`](Self::region_stats) without the bounds check
    ///
    /// The caller must guarantee `xmin <= xmax < width` and
    /// `ymin <= ymax < height`; this is the per-pixel hot path of the
    /// thresholders, which clamp their windows beforehand.
    #[inline]
    pub fn region_stats_unchecked(&self, xmin: u32, ymin: u32, xmax: u32, ymax: u32) -> RegionStats {
        let (sum, sum_sq) = self.region_sums_unchecked(xmin, ymin, xmax, ymax);
        let n = (xmax - xmin + 1) as f64 * (ymax - ymin + 1) as f64;
        let sum = sum as f64;
        let mean = sum / n;
        let variance = if n > 1.0 {
            // Rounding can push a flat region slightly below zero
            ((sum_sq as f64 - sum * sum / n) / (n - 1.0)).max(0.0)
        } else {
            0.0
        };
        RegionStats { mean, variance }
    }

    /// Mean sample value of a horizontal band of `window` rows around `y`
    ///
    /// The band spans the full image width. It is centered on `y` and
    /// shifted (not shrunk) to stay inside the image; only when the image
    /// is shorter than `window` does the band cover fewer rows.
    ///
    /// # Errors
    ///
    /// Fails if `window == 0` or `y` is outside the image.
    pub fn horizontal_projection(&self, y: u32, window: u32) -> Result<f64> {
        if window == 0 {
            return Err(Error::InvalidParameter(
                "projection window must be positive".into(),
            ));
        }
        if y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: y as usize,
                len: self.height as usize,
            });
        }

        let band = window.min(self.height);
        let top = y.saturating_sub(window / 2).min(self.height - band);
        let bottom = top + band - 1;
        let (sum, _) = self.region_sums_unchecked(0, top, self.width - 1, bottom);
        Ok(sum as f64 / (band as f64 * self.width as f64))
    }

    fn check_region(&self, xmin: u32, ymin: u32, xmax: u32, ymax: u32) -> Result<()> {
        if xmin > xmax || ymin > ymax || xmax >= self.width || ymax >= self.height {
            return Err(Error::InvalidRegion {
                xmin,
                ymin,
                xmax,
                ymax,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Inclusion-exclusion over the four corners, skipping the corners
    /// that would fall at index -1.
    #[inline]
    fn region_sums_unchecked(&self, xmin: u32, ymin: u32, xmax: u32, ymax: u32) -> (u64, u64) {
        let br = self.index(xmax, ymax);
        match (xmin, ymin) {
            (0, 0) => (self.sum[br], self.sum_sq[br]),
            (0, _) => {
                let tr = self.index(xmax, ymin - 1);
                (self.sum[br] - self.sum[tr], self.sum_sq[br] - self.sum_sq[tr])
            }
            (_, 0) => {
                let bl = self.index(xmin - 1, ymax);
                (self.sum[br] - self.sum[bl], self.sum_sq[br] - self.sum_sq[bl])
            }
            _ => {
                let tl = self.index(xmin - 1, ymin - 1);
                let tr = self.index(xmax, ymin - 1);
                let bl = self.index(xmin - 1, ymax);
                (
                    self.sum[br] + self.sum[tl] - self.sum[tr] - self.sum[bl],
                    self.sum_sq[br] + self.sum_sq[tl] - self.sum_sq[tr] - self.sum_sq[bl],
                )
            }
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

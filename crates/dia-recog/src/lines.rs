//! Text line segmentation by projection profile
//!
//! # Algorithm Overview
//!
//! 1. **Horizontal Projection**: mean sample value of a band of rows
//!    centered on every row, read from the integral image
//! 2. **Differential Signal**: row-to-row differences of the projection
//! 3. **Candidates**: rows where the projection starts rising again after
//!    falling, i.e. the far edge of a dip in brightness
//! 4. **Pruning**: drop candidates that are too dark relative to the
//!    others, too close to white, or too close to the previous line

use dia_core::{BoundingBox, IntegralImage};
use tracing::instrument;

use crate::{RecogError, RecogResult};

/// Default height of the projection band in rows
pub const DEFAULT_PROJECTION_WINDOW: u32 = 30;

/// Default minimum distance between accepted lines in rows
pub const DEFAULT_MIN_LINE_SPACING: u32 = 20;

/// Default cap on the projection value of a line boundary
pub const DEFAULT_MAX_FOREGROUND_PROJECTION: f64 = 240.0;

/// Options for projection line segmentation
#[derive(Debug, Clone)]
pub struct LineSegmentOptions {
    /// Height of the projection band (default: 30)
    pub projection_window: u32,

    /// Minimum rows between accepted lines (default: 20)
    pub min_line_spacing: u32,

    /// Candidates whose projection exceeds this are nearly blank paper
    /// and are dropped (default: 240)
    pub max_foreground_projection: f64,
}

impl Default for LineSegmentOptions {
    fn default() -> Self {
        Self {
            projection_window: DEFAULT_PROJECTION_WINDOW,
            min_line_spacing: DEFAULT_MIN_LINE_SPACING,
            max_foreground_projection: DEFAULT_MAX_FOREGROUND_PROJECTION,
        }
    }
}

impl LineSegmentOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the projection band height
    pub fn with_projection_window(mut self, window: u32) -> Self {
        self.projection_window = window;
        self
    }

    /// Set the minimum line spacing
    pub fn with_min_line_spacing(mut self, spacing: u32) -> Self {
        self.min_line_spacing = spacing;
        self
    }

    /// Set the projection cap
    pub fn with_max_foreground_projection(mut self, cap: f64) -> Self {
        self.max_foreground_projection = cap;
        self
    }

    /// Validate options
    pub fn validate(&self) -> RecogResult<()> {
        if self.projection_window == 0 {
            return Err(RecogError::InvalidParameter(
                "projection_window must be positive".to_string(),
            ));
        }
        if !self.max_foreground_projection.is_finite() {
            return Err(RecogError::InvalidParameter(format!(
                "max_foreground_projection must be finite, got {}",
                self.max_foreground_projection
            )));
        }
        Ok(())
    }
}

/// Smoothed horizontal projection of a page and its boundary candidates
#[derive(Debug, Clone)]
pub struct ProjectionProfile {
    /// Projection value per row
    pub values: Vec<f64>,
    /// Unpruned candidate rows, ascending
    pub candidates: Vec<u32>,
}

impl ProjectionProfile {
    /// Compute the projection of every row and its candidates
    pub fn compute(integral: &IntegralImage, window: u32) -> RecogResult<Self> {
        if window == 0 {
            return Err(RecogError::InvalidParameter(
                "projection_window must be positive".to_string(),
            ));
        }
        let values = (0..integral.height())
            .map(|y| integral.horizontal_projection(y, window))
            .collect::<dia_core::Result<Vec<f64>>>()?;
        let candidates = find_candidates(&values);
        Ok(Self { values, candidates })
    }

    /// Row-to-row differences; the first entry is 0
    pub fn derivative(&self) -> Vec<f64> {
        compute_differential(&self.values)
    }

    /// Candidates that survive pruning
    pub fn lines(&self, options: &LineSegmentOptions) -> Vec<u32> {
        prune_candidates(&self.values, &self.candidates, options)
    }
}

/// Find text line boundaries in a page
///
/// Returns the boundary rows in increasing order. A page without any
/// dip in its projection yields no boundaries.
///
/// # Example
///
/// ```
/// use dia_core::{IntegralImage, Raster};
/// use dia_recog::{LineSegmentOptions, find_lines};
///
/// let blank = Raster::filled(50, 120, 255).unwrap();
/// let integral = IntegralImage::from_raster(&blank).unwrap();
/// let lines = find_lines(&integral, &LineSegmentOptions::default()).unwrap();
/// assert!(lines.is_empty());
/// ```
#[instrument(skip_all, fields(width = integral.width(), height = integral.height()))]
pub fn find_lines(integral: &IntegralImage, options: &LineSegmentOptions) -> RecogResult<Vec<u32>> {
    options.validate()?;

    let profile = ProjectionProfile::compute(integral, options.projection_window)?;
    let lines = profile.lines(options);

    tracing::debug!(
        candidates = profile.candidates.len(),
        lines = lines.len(),
        "pruned line candidates"
    );

    Ok(lines)
}

/// Rows where the profile turns from falling to rising
///
/// Flat stretches do not change direction, so a plateau at the bottom of
/// a dip reports the row where the rise actually starts.
pub fn find_candidates(values: &[f64]) -> Vec<u32> {
    let mut candidates = Vec::new();
    let mut increasing = false;

    for (y, pair) in values.windows(2).enumerate() {
        let d = pair[1] - pair[0];
        if (d > 0.0 && !increasing) || (d < 0.0 && increasing) {
            increasing = !increasing;
            if d > 0.0 {
                candidates.push(y as u32 + 1);
            }
        }
    }

    candidates
}

/// Drop implausible candidates
///
/// A candidate is removed when its projection value is above
/// `mean + stddev` of all candidate values, above
/// `max_foreground_projection`, or fewer than `min_line_spacing` rows
/// after the previously accepted candidate. The top of the page counts
/// as accepted, so a candidate closer than the spacing to row 0 is
/// dropped as well.
pub fn prune_candidates(values: &[f64], candidates: &[u32], options: &LineSegmentOptions) -> Vec<u32> {
    let stats = candidates
        .iter()
        .filter_map(|&y| values.get(y as usize))
        .fold(RunningStats::default(), |mut acc, &v| {
            acc.push(v);
            acc
        });
    let threshold = stats.mean + stats.std_dev();

    let mut accepted = Vec::new();
    let mut prev = 0u32;
    for &y in candidates {
        let Some(&v) = values.get(y as usize) else {
            continue;
        };
        let too_close = y.saturating_sub(prev) < options.min_line_spacing;
        if v > threshold || v > options.max_foreground_projection || too_close {
            continue;
        }
        accepted.push(y);
        prev = y;
    }

    accepted
}

/// Split a page into full-width bands at the given boundary rows
///
/// Every boundary starts a new band, so `n` boundaries produce up to
/// `n + 1` bands. A boundary at row 0 does not produce an empty band.
pub fn line_bands(boundaries: &[u32], width: u32, height: u32) -> RecogResult<Vec<BoundingBox>> {
    if width == 0 || height == 0 {
        return Err(RecogError::Core(dia_core::Error::InvalidDimension {
            width,
            height,
        }));
    }
    if let Some(pair) = boundaries.windows(2).find(|p| p[0] >= p[1]) {
        return Err(RecogError::InvalidParameter(format!(
            "boundaries must be strictly increasing, got {} then {}",
            pair[0], pair[1]
        )));
    }
    if let Some(&last) = boundaries.last().filter(|&&b| b >= height) {
        return Err(RecogError::InvalidParameter(format!(
            "boundary {last} is outside a page of height {height}"
        )));
    }

    let mut bands = Vec::with_capacity(boundaries.len() + 1);
    let mut top = 0u32;
    for &b in boundaries.iter().chain(std::iter::once(&height)) {
        if b > top {
            bands.push(BoundingBox::new(0, top, width - 1, b - 1)?);
        }
        top = b;
    }
    Ok(bands)
}

// ============================================================================
// Internal functions
// ============================================================================

/// Compute the row-to-row differential of a profile
fn compute_differential(values: &[f64]) -> Vec<f64> {
    let mut diff = vec![0.0; values.len()];
    for y in 1..values.len() {
        diff[y] = values[y] - values[y - 1];
    }
    diff
}

/// Single-pass mean and population variance (Welford)
#[derive(Debug, Default)]
struct RunningStats {
    n: usize,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    fn push(&mut self, v: f64) {
        self.n += 1;
        let delta = v - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (v - self.mean);
    }

    fn std_dev(&self) -> f64 {
        if self.n == 0 {
            0.0
        } else {
            (self.m2 / self.n as f64).sqrt()
        }
    }
}

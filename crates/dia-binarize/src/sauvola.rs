//! Sauvola adaptive binarization
//!
//! Every pixel is compared against a threshold derived from the mean and
//! standard deviation of its neighborhood:
//!
//! ```text
//! T = mean * (1 + k * (stddev / R - 1))
//! ```
//!
//! A pixel is background when its sample is strictly greater than `T`
//! and foreground otherwise. Neighborhood statistics come from an
//! [`IntegralImage`], so each threshold costs O(1) regardless of the
//! window size.
//!
//! # Parallelism
//!
//! The output buffer is cut into contiguous bands of rows, one per
//! worker of a fixed-size rayon pool. Each worker writes only its own
//! band and keeps its own foreground counter; the counters are summed
//! once all bands have joined, so the result does not depend on
//! scheduling. The integral image is shared read-only.
//!
//! Workers poll a [`CancelToken`] and an optional deadline between rows.
//! If either fires, the whole call fails and the partially written
//! buffer is dropped.

use std::time::{Duration, Instant};

use dia_core::{BACKGROUND, BinaryMask, FOREGROUND, IntegralImage, Raster};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cancel::CancelToken;
use crate::{BinarizeError, BinarizeResult};

/// Default sensitivity weight
pub const DEFAULT_K: f64 = 0.3;

/// Default dynamic range of the standard deviation for 8-bit samples
pub const DEFAULT_DYNAMIC_RANGE: u32 = 128;

/// Default number of pool workers
pub const DEFAULT_WORKER_COUNT: usize = 8;

/// When no tile size is given, it is the image width divided by this
pub const DEFAULT_TILE_DIVISOR: u32 = 15;

/// How the local statistics are gathered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdMethod {
    /// A window of `tile_size` centered on every pixel (clamped at the
    /// image edges); one threshold per pixel
    #[default]
    Windowed,
    /// Non-overlapping `tile_size x tile_size` tiles; one threshold per
    /// tile, shared by all of its pixels
    Tiled,
}

/// Options for Sauvola binarization
#[derive(Debug, Clone)]
pub struct SauvolaOptions {
    /// Weight of the standard deviation term (default: 0.3)
    /// Higher values move more pixels to the background
    pub k: f64,

    /// Window or tile size in pixels (default: image width / 15)
    /// The window half-width is `tile_size / 2`
    pub tile_size: Option<u32>,

    /// Dynamic range of the standard deviation, `R` (default: 128)
    pub dynamic_range: u32,

    /// Number of pool workers, one row band each (default: 8)
    pub worker_count: usize,

    /// Statistics gathering method (default: windowed)
    pub method: ThresholdMethod,

    /// Maximum wall-clock time for the whole call (default: none)
    pub timeout: Option<Duration>,
}

impl Default for SauvolaOptions {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            tile_size: None,
            dynamic_range: DEFAULT_DYNAMIC_RANGE,
            worker_count: DEFAULT_WORKER_COUNT,
            method: ThresholdMethod::Windowed,
            timeout: None,
        }
    }
}

impl SauvolaOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sensitivity weight
    pub fn with_k(mut self, k: f64) -> Self {
        self.k = k;
        self
    }

    /// Set an explicit window/tile size
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = Some(tile_size);
        self
    }

    /// Set the dynamic range `R`
    pub fn with_dynamic_range(mut self, range: u32) -> Self {
        self.dynamic_range = range;
        self
    }

    /// Set the number of workers
    pub fn with_worker_count(mut self, workers: usize) -> Self {
        self.worker_count = workers;
        self
    }

    /// Set the statistics gathering method
    pub fn with_method(mut self, method: ThresholdMethod) -> Self {
        self.method = method;
        self
    }

    /// Fail the call if it has not finished within `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate options
    pub fn validate(&self) -> BinarizeResult<()> {
        if !self.k.is_finite() || self.k < 0.0 {
            return Err(BinarizeError::InvalidParameter(format!(
                "k must be a non-negative number, got {}",
                self.k
            )));
        }
        if self.tile_size == Some(0) {
            return Err(BinarizeError::InvalidParameter(
                "tile_size must be positive".to_string(),
            ));
        }
        if self.dynamic_range == 0 {
            return Err(BinarizeError::InvalidParameter(
                "dynamic_range must be positive".to_string(),
            ));
        }
        if self.worker_count == 0 {
            return Err(BinarizeError::InvalidParameter(
                "worker_count must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Tile size used for an image of the given width
    ///
    /// Falls back to `width / 15`, but never below one pixel.
    pub fn resolve_tile_size(&self, width: u32) -> u32 {
        self.tile_size
            .unwrap_or_else(|| (width / DEFAULT_TILE_DIVISOR).max(1))
    }
}

/// Output of a completed binarization
#[derive(Debug, Clone)]
pub struct Binarization {
    /// Foreground/background mask with the input's dimensions
    pub mask: BinaryMask,
    /// Number of foreground pixels, merged from the per-band counters
    pub foreground_count: usize,
    /// Tile size actually used
    pub tile_size: u32,
}

impl Binarization {
    /// Number of background pixels
    pub fn background_count(&self) -> usize {
        self.mask.data().len() - self.foreground_count
    }
}

/// Sauvola threshold for a neighborhood with the given statistics
#[inline]
pub fn sauvola_threshold(mean: f64, std_dev: f64, k: f64, dynamic_range: f64) -> f64 {
    mean * (1.0 + k * (std_dev / dynamic_range - 1.0))
}

/// Binarize an image from its integral image
///
/// # Example
///
/// ```
/// use dia_binarize::{SauvolaOptions, sauvola_binarize};
/// use dia_core::{IntegralImage, Raster};
///
/// let raster = Raster::filled(40, 30, 255).unwrap();
/// let integral = IntegralImage::from_raster(&raster).unwrap();
/// let result = sauvola_binarize(&integral, &SauvolaOptions::default()).unwrap();
/// assert_eq!(result.foreground_count, 0);
/// ```
pub fn sauvola_binarize(
    integral: &IntegralImage,
    options: &SauvolaOptions,
) -> BinarizeResult<Binarization> {
    sauvola_binarize_with_cancel(integral, options, &CancelToken::new())
}

/// Build the integral image of `raster` and binarize it
///
/// Callers that also need the integral image for other stages should
/// build it once and use [`sauvola_binarize`] instead.
pub fn sauvola_binarize_raster(
    raster: &Raster,
    options: &SauvolaOptions,
) -> BinarizeResult<Binarization> {
    let integral = IntegralImage::from_raster(raster)?;
    sauvola_binarize(&integral, options)
}

/// Binarize an image, aborting when `cancel` fires or the timeout elapses
///
/// # Errors
///
/// * [`BinarizeError::InvalidParameter`] for invalid options
/// * [`BinarizeError::Cancelled`] if `cancel` was triggered before all
///   rows were processed
/// * [`BinarizeError::DeadlineExceeded`] if `options.timeout` elapsed
///   before all rows were processed
#[instrument(
    skip_all,
    fields(width = integral.width(), height = integral.height(), method = ?options.method)
)]
pub fn sauvola_binarize_with_cancel(
    integral: &IntegralImage,
    options: &SauvolaOptions,
    cancel: &CancelToken,
) -> BinarizeResult<Binarization> {
    options.validate()?;
    // an unrepresentable deadline is as good as none
    let deadline = options.timeout.and_then(|t| Instant::now().checked_add(t));
    if cancel.is_cancelled() {
        return Err(BinarizeError::Cancelled);
    }

    let width = integral.width();
    let height = integral.height();
    let params = ThresholdParams {
        k: options.k,
        range: options.dynamic_range as f64,
        tile_size: options.resolve_tile_size(width),
        method: options.method,
    };

    let workers = options.worker_count.min(height as usize);
    let rows_per_band = (height as usize).div_ceil(workers);
    let row_len = width as usize;

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| BinarizeError::ThreadPool(e.to_string()))?;

    tracing::debug!(
        workers,
        rows_per_band,
        tile_size = params.tile_size,
        "partitioned rows into bands"
    );

    let mut output = vec![BACKGROUND; row_len * height as usize];
    let bands: Vec<Result<BandOutcome, BandInterrupt>> = pool.install(|| {
        output
            .par_chunks_mut(rows_per_band * row_len)
            .enumerate()
            .map(|(band, chunk)| {
                let first_row = (band * rows_per_band) as u32;
                threshold_band(integral, &params, first_row, chunk, cancel, deadline)
            })
            .collect()
    });

    let foreground_count = merge_bands(bands, height)?;

    tracing::debug!(foreground_count, "binarization complete");

    Ok(Binarization {
        mask: BinaryMask::from_raw(width, height, output)?,
        foreground_count,
        tile_size: params.tile_size,
    })
}

// ============================================================================
// Internal functions
// ============================================================================

struct ThresholdParams {
    k: f64,
    range: f64,
    tile_size: u32,
    method: ThresholdMethod,
}

#[derive(Debug)]
struct BandOutcome {
    foreground: usize,
    rows: u32,
}

#[derive(Debug, Clone, Copy)]
enum Interrupt {
    Cancelled,
    Deadline,
}

#[derive(Debug)]
struct BandInterrupt {
    kind: Interrupt,
    rows_done: u32,
}

/// Sum the band counts, or report why the run stopped
///
/// A cancellation in any band outranks a deadline in another.
fn merge_bands(bands: Vec<Result<BandOutcome, BandInterrupt>>, total_rows: u32) -> BinarizeResult<usize> {
    let mut foreground_count = 0usize;
    let mut completed_rows = 0u32;
    let mut interrupt: Option<Interrupt> = None;
    for band in bands {
        match band {
            Ok(outcome) => {
                foreground_count += outcome.foreground;
                completed_rows += outcome.rows;
            }
            Err(stopped) => {
                completed_rows += stopped.rows_done;
                interrupt = Some(match (interrupt, stopped.kind) {
                    (Some(Interrupt::Cancelled), _) | (_, Interrupt::Cancelled) => {
                        Interrupt::Cancelled
                    }
                    _ => Interrupt::Deadline,
                });
            }
        }
    }

    match interrupt {
        None => Ok(foreground_count),
        Some(kind) => {
            tracing::debug!(completed_rows, total_rows, ?kind, "binarization interrupted");
            Err(match kind {
                Interrupt::Cancelled => BinarizeError::Cancelled,
                Interrupt::Deadline => BinarizeError::DeadlineExceeded {
                    completed_rows,
                    total_rows,
                },
            })
        }
    }
}

/// Threshold one contiguous band of rows into `chunk`
fn threshold_band(
    integral: &IntegralImage,
    params: &ThresholdParams,
    first_row: u32,
    chunk: &mut [u8],
    cancel: &CancelToken,
    deadline: Option<Instant>,
) -> Result<BandOutcome, BandInterrupt> {
    let row_len = integral.width() as usize;
    let mut foreground = 0usize;
    let mut rows = 0u32;

    for (i, row) in chunk.chunks_exact_mut(row_len).enumerate() {
        if cancel.is_cancelled() {
            return Err(BandInterrupt {
                kind: Interrupt::Cancelled,
                rows_done: rows,
            });
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(BandInterrupt {
                kind: Interrupt::Deadline,
                rows_done: rows,
            });
        }

        let y = first_row + i as u32;
        foreground += match params.method {
            ThresholdMethod::Windowed => windowed_row(integral, params, y, row),
            ThresholdMethod::Tiled => tiled_row(integral, params, y, row),
        };
        rows += 1;
    }

    Ok(BandOutcome { foreground, rows })
}

/// Per-pixel centered window, clamped at the image edges
fn windowed_row(integral: &IntegralImage, params: &ThresholdParams, y: u32, row: &mut [u8]) -> usize {
    let w = integral.width();
    let h = integral.height();
    let whalf = params.tile_size / 2;
    let ymin = y.saturating_sub(whalf);
    let ymax = y.saturating_add(whalf).min(h - 1);

    let mut foreground = 0;
    for (x, out) in (0..w).zip(row.iter_mut()) {
        let xmin = x.saturating_sub(whalf);
        let xmax = x.saturating_add(whalf).min(w - 1);
        let stats = integral.region_stats_unchecked(xmin, ymin, xmax, ymax);
        let threshold = sauvola_threshold(stats.mean, stats.std_dev(), params.k, params.range);
        foreground += classify(integral.sample_unchecked(x, y), threshold, out);
    }
    foreground
}

/// One threshold per non-overlapping tile
fn tiled_row(integral: &IntegralImage, params: &ThresholdParams, y: u32, row: &mut [u8]) -> usize {
    let w = integral.width();
    let h = integral.height();
    let ts = params.tile_size;
    let top = (y / ts) * ts;
    let bottom = top.saturating_add(ts - 1).min(h - 1);

    let mut foreground = 0;
    let mut left = 0u32;
    while left < w {
        let right = left.saturating_add(ts - 1).min(w - 1);
        let stats = integral.region_stats_unchecked(left, top, right, bottom);
        let threshold = sauvola_threshold(stats.mean, stats.std_dev(), params.k, params.range);
        for x in left..=right {
            foreground += classify(integral.sample_unchecked(x, y), threshold, &mut row[x as usize]);
        }
        left = right + 1;
    }
    foreground
}

/// Write the classification of one sample; returns 1 for foreground
#[inline]
fn classify(sample: u8, threshold: f64, out: &mut u8) -> usize {
    if sample as f64 > threshold {
        *out = BACKGROUND;
        0
    } else {
        *out = FOREGROUND;
        1
    }
}

//! dia-recog - Text line segmentation for document image analysis
//!
//! Finds the rows separating text lines from the horizontal projection
//! profile of a page, read in O(1) per row from an integral image.
//!
//! # Example
//!
//! ```
//! use dia_core::{BoundingBox, IntegralImage, Raster, RasterMut};
//! use dia_recog::{LineSegmentOptions, find_lines, line_bands};
//!
//! let mut page = RasterMut::filled(200, 150, 255).unwrap();
//! page.fill_rect(&BoundingBox::new(20, 30, 179, 41).unwrap(), 0);
//! page.fill_rect(&BoundingBox::new(20, 80, 179, 91).unwrap(), 0);
//! let page: Raster = page.into();
//!
//! let integral = IntegralImage::from_raster(&page).unwrap();
//! let lines = find_lines(&integral, &LineSegmentOptions::default()).unwrap();
//! assert_eq!(lines, vec![46, 96]);
//!
//! let bands = line_bands(&lines, page.width(), page.height()).unwrap();
//! assert_eq!(bands.len(), 3);
//! ```

pub mod error;
pub mod lines;

pub use dia_core;

pub use error::{RecogError, RecogResult};
pub use lines::{
    DEFAULT_MAX_FOREGROUND_PROJECTION, DEFAULT_MIN_LINE_SPACING, DEFAULT_PROJECTION_WINDOW,
    LineSegmentOptions, ProjectionProfile, find_candidates, find_lines, line_bands,
    prune_candidates,
};

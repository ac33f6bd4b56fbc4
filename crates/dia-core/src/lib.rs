//! dia-core - Basic data structures for document image analysis
//!
//! This crate provides the fundamental data structures shared by every
//! analysis stage:
//!
//! - [`Raster`] - Immutable single-channel 8-bit page image
//! - [`RasterMut`] - Drawable copy of a raster for fixtures and rendering
//! - [`IntegralImage`] - Summed-area tables for O(1) region statistics
//! - [`BinaryMask`] - Foreground/background classification
//! - [`BoundingBox`] - Inclusive rectangle regions
//!
//! # Example
//!
//! ```
//! use dia_core::{IntegralImage, Raster};
//!
//! let raster = Raster::filled(64, 48, 200).unwrap();
//! let integral = IntegralImage::from_raster(&raster).unwrap();
//! let stats = integral.region_stats(0, 0, 63, 47).unwrap();
//! assert_eq!(stats.mean, 200.0);
//! assert_eq!(stats.variance, 0.0);
//! ```

pub mod box_;
pub mod error;
pub mod integral;
pub mod mask;
pub mod raster;

pub use box_::BoundingBox;
pub use error::{Error, Result};
pub use integral::{IntegralImage, RegionStats};
pub use mask::{BACKGROUND, BinaryMask, FOREGROUND};
pub use raster::{BLACK, Raster, RasterMut, WHITE};

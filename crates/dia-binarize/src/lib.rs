//! dia-binarize - Adaptive binarization for document image analysis
//!
//! Turns a grayscale page into a foreground/background [`BinaryMask`]
//! with the Sauvola local threshold, computed from a shared
//! [`IntegralImage`] by a fixed pool of workers.
//!
//! # Example
//!
//! ```
//! use dia_binarize::{SauvolaOptions, ThresholdMethod, sauvola_binarize};
//! use dia_core::{BoundingBox, IntegralImage, Raster, RasterMut};
//!
//! let mut page = RasterMut::filled(10, 10, 255).unwrap();
//! page.fill_rect(&BoundingBox::new(2, 2, 4, 4).unwrap(), 0);
//! let raster: Raster = page.into();
//! let integral = IntegralImage::from_raster(&raster).unwrap();
//!
//! let options = SauvolaOptions::new()
//!     .with_tile_size(5)
//!     .with_method(ThresholdMethod::Windowed);
//! let result = sauvola_binarize(&integral, &options).unwrap();
//! assert_eq!(result.foreground_count, 9);
//! assert!(result.mask.is_foreground(3, 3));
//! ```
//!
//! [`BinaryMask`]: dia_core::BinaryMask
//! [`IntegralImage`]: dia_core::IntegralImage

pub mod cancel;
pub mod error;
pub mod sauvola;

pub use dia_core;

pub use cancel::CancelToken;
pub use error::{BinarizeError, BinarizeResult};
pub use sauvola::{
    Binarization, DEFAULT_DYNAMIC_RANGE, DEFAULT_K, DEFAULT_TILE_DIVISOR, DEFAULT_WORKER_COUNT,
    SauvolaOptions, ThresholdMethod, sauvola_binarize, sauvola_binarize_raster,
    sauvola_binarize_with_cancel, sauvola_threshold,
};

//! Error types for dia-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// dia-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Sample buffer does not match the declared dimensions
    #[error("buffer length mismatch: expected {expected} samples, got {actual}")]
    BufferLength { expected: usize, actual: usize },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Region query outside the image or with inverted corners
    #[error("invalid region: ({xmin}, {ymin})..=({xmax}, {ymax}) in {width}x{height} image")]
    InvalidRegion {
        xmin: u32,
        ymin: u32,
        xmax: u32,
        ymax: u32,
        width: u32,
        height: u32,
    },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for dia-core operations
pub type Result<T> = std::result::Result<T, Error>;

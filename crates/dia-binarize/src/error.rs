//! Error types for dia-binarize

use thiserror::Error;

/// Errors that can occur during binarization
#[derive(Debug, Error)]
pub enum BinarizeError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] dia_core::Error),

    /// Invalid parameter provided
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The caller cancelled the operation; no output was produced
    #[error("binarization cancelled")]
    Cancelled,

    /// Workers did not finish before the deadline; no output was produced
    #[error("binarization deadline exceeded after {completed_rows} of {total_rows} rows")]
    DeadlineExceeded { completed_rows: u32, total_rows: u32 },

    /// The worker pool could not be created
    #[error("worker pool error: {0}")]
    ThreadPool(String),
}

/// Result type for binarization operations
pub type BinarizeResult<T> = Result<T, BinarizeError>;

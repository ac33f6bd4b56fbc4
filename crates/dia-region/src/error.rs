//! Error types for dia-region

use thiserror::Error;

/// Errors that can occur during region processing operations
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] dia_core::Error),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// More provisional labels were needed than the configured capacity
    ///
    /// Not recoverable within the call: retry with a larger capacity or a
    /// smaller input.
    #[error("label capacity exceeded: more than {max_labels} provisional labels required")]
    CapacityExceeded { max_labels: u32 },
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;

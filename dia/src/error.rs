//! Error types for the analysis pipeline

use thiserror::Error;

/// Errors that can occur while analyzing a page
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] dia_core::Error),

    /// Binarization error
    #[error("binarization error: {0}")]
    Binarize(#[from] dia_binarize::BinarizeError),

    /// Region processing error
    #[error("region error: {0}")]
    Region(#[from] dia_region::RegionError),

    /// Line segmentation error
    #[error("line segmentation error: {0}")]
    Recog(#[from] dia_recog::RecogError),

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A stage was run before the artifact it depends on existed
    #[error("not ready: {0} has not been computed")]
    NotReady(&'static str),
}

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

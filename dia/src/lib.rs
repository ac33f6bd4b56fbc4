//! dia - Document image analysis for Rust
//!
//! # Overview
//!
//! Turns a grayscale page into structure a recognizer can use:
//!
//! - Summed-area tables for O(1) window statistics
//! - Sauvola adaptive binarization on a fixed worker pool
//! - Two-pass connected component labeling
//! - Text line segmentation from the horizontal projection profile
//!
//! # Example
//!
//! ```
//! use dia::{AnalysisConfig, Raster, analyze_page};
//!
//! let page = Raster::filled(10, 10, 255).unwrap();
//! let analysis = analyze_page(&page, &AnalysisConfig::default()).unwrap();
//! assert_eq!(analysis.binarization.foreground_count, 0);
//! assert!(analysis.components.is_empty());
//! ```

pub mod config;
pub mod error;
pub mod pipeline;

// Re-export core types (primary data structures used everywhere)
pub use dia_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use dia_binarize as binarize;
pub use dia_recog as recog;
pub use dia_region as region;

pub use config::AnalysisConfig;
pub use error::{AnalysisError, AnalysisResult};
pub use pipeline::{PageAnalysis, PageAnalyzer, analyze_page};

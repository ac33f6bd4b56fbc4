//! dia-region - Connected components for document image analysis
//!
//! This crate provides region processing functionality including:
//!
//! - **Union-find** - Disjoint sets over provisional labels with a hard capacity
//! - **Connected component labeling** - Two-pass 4- or 8-way labeling
//! - **Label maps** - Compaction, sizes, extraction and size filtering
//!
//! # Example
//!
//! ```
//! use dia_core::{BinaryMask, BoundingBox};
//! use dia_region::{LabelOptions, find_connected_components};
//!
//! let mask = BinaryMask::from_ascii(&[
//!     "##...",
//!     "##...",
//!     "..###",
//!     "..###",
//!     "..###",
//! ])
//! .unwrap();
//!
//! let components = find_connected_components(&mask, &LabelOptions::default()).unwrap();
//! assert_eq!(components.len(), 2);
//! assert_eq!(components[1].bounds, BoundingBox::new(2, 2, 4, 4).unwrap());
//! ```

pub mod conncomp;
pub mod error;
pub mod label;
pub mod unionfind;

pub use dia_core;

pub use conncomp::{
    ConnectedComponent, ConnectivityType, DEFAULT_MAX_LABELS, LabelOptions,
    find_connected_components, label_connected_components,
};
pub use error::{RegionError, RegionResult};
pub use label::LabelMap;
pub use unionfind::UnionFind;

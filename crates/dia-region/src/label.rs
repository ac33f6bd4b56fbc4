//! Label maps and label-based utilities
//!
//! A [`LabelMap`] stores one label per pixel: 0 for background, a
//! positive component identifier otherwise.

use std::collections::{BTreeMap, HashMap};

use dia_core::BinaryMask;

use crate::conncomp::{ConnectedComponent, ConnectivityType, aggregate_components};
use crate::error::{RegionError, RegionResult};

/// Per-pixel component labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    width: u32,
    height: u32,
    labels: Vec<u32>,
    connectivity: ConnectivityType,
}

impl LabelMap {
    pub(crate) fn from_parts(
        width: u32,
        height: u32,
        labels: Vec<u32>,
        connectivity: ConnectivityType,
    ) -> Self {
        Self {
            width,
            height,
            labels,
            connectivity,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Connectivity the labels were computed with
    pub fn connectivity(&self) -> ConnectivityType {
        self.connectivity
    }

    /// Raw labels, row-major
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Label at (x, y), or `None` if out of bounds
    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.labels[y as usize * self.width as usize + x as usize])
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.labels.chunks_exact(self.width as usize)
    }

    /// Largest label present (0 if there is no foreground)
    pub fn max_label(&self) -> u32 {
        self.labels.iter().copied().max().unwrap_or(0)
    }

    /// Number of distinct components
    pub fn component_count(&self) -> usize {
        self.component_sizes().len()
    }

    /// Aggregate every component: bounds, pixel count and points
    pub fn components(&self) -> Vec<ConnectedComponent> {
        aggregate_components(self)
    }

    /// Renumber labels to `1..=n` in row-major order of first appearance
    ///
    /// Returns `n`, the number of components.
    pub fn compact(&mut self) -> u32 {
        let mut remap: HashMap<u32, u32> = HashMap::new();
        let mut next = 0u32;
        for label in self.labels.iter_mut().filter(|l| **l != 0) {
            *label = *remap.entry(*label).or_insert_with(|| {
                next += 1;
                next
            });
        }
        tracing::debug!(components = next, "compacted labels");
        next
    }

    /// Pixel count for each label, as `(label, count)` sorted by label
    pub fn component_sizes(&self) -> Vec<(u32, u32)> {
        let mut counts: BTreeMap<u32, u32> = BTreeMap::new();
        for &label in self.labels.iter().filter(|&&l| l != 0) {
            *counts.entry(label).or_insert(0) += 1;
        }
        counts.into_iter().collect()
    }

    /// Mask containing only the pixels carrying `label`
    ///
    /// A label that does not occur yields an empty mask.
    pub fn extract_component(&self, label: u32) -> RegionResult<BinaryMask> {
        if label == 0 {
            return Err(RegionError::InvalidParameters(
                "label 0 is background, not a component".to_string(),
            ));
        }
        self.mask_where(|l| l == label)
    }

    /// Mask of all components whose pixel count lies in `min_size..=max_size`
    pub fn filter_components_by_size(&self, min_size: u32, max_size: u32) -> RegionResult<BinaryMask> {
        if min_size > max_size {
            return Err(RegionError::InvalidParameters(format!(
                "min_size ({min_size}) exceeds max_size ({max_size})"
            )));
        }
        let keep: HashMap<u32, bool> = self
            .component_sizes()
            .into_iter()
            .map(|(label, size)| (label, (min_size..=max_size).contains(&size)))
            .collect();
        self.mask_where(|l| keep.get(&l).copied().unwrap_or(false))
    }

    fn mask_where<F: Fn(u32) -> bool>(&self, pred: F) -> RegionResult<BinaryMask> {
        let data = self
            .labels
            .iter()
            .map(|&l| u8::from(l != 0 && pred(l)))
            .collect();
        Ok(BinaryMask::from_raw(self.width, self.height, data)?)
    }
}

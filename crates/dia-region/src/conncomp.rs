//! Connected component analysis
//!
//! Classic two-pass labeling. The first pass assigns provisional labels
//! in row-major order, looking only at neighbours that were already
//! visited, and records label equivalences in a [`UnionFind`]. The second
//! pass replaces every provisional label with its canonical
//! representative. Components are then aggregated in one more scan.

use std::collections::HashMap;

use dia_core::{BinaryMask, BoundingBox, FOREGROUND, RasterMut};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{RegionError, RegionResult};
use crate::label::LabelMap;
use crate::unionfind::UnionFind;

/// Default cap on provisional labels per call
pub const DEFAULT_MAX_LABELS: u32 = 100_000;

/// Connectivity type for component analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityType {
    /// 4-way connectivity (up, down, left, right)
    #[default]
    FourWay,
    /// 8-way connectivity (includes diagonals)
    EightWay,
}

/// Options for connected component labeling
#[derive(Debug, Clone)]
pub struct LabelOptions {
    /// Maximum number of provisional labels (default: 100000)
    pub max_labels: u32,
    /// Pixel adjacency (default: 4-way)
    pub connectivity: ConnectivityType,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            max_labels: DEFAULT_MAX_LABELS,
            connectivity: ConnectivityType::FourWay,
        }
    }
}

impl LabelOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the provisional label capacity
    pub fn with_max_labels(mut self, max_labels: u32) -> Self {
        self.max_labels = max_labels;
        self
    }

    /// Set the pixel adjacency
    pub fn with_connectivity(mut self, connectivity: ConnectivityType) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Validate options
    pub fn validate(&self) -> RegionResult<()> {
        if self.max_labels == 0 {
            return Err(RegionError::InvalidParameters(
                "max_labels must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// A connected component in an image
#[derive(Debug, Clone)]
pub struct ConnectedComponent {
    /// Label of this component in the label map it came from
    pub label: u32,
    /// Number of pixels in this component
    pub pixel_count: u32,
    /// Bounding box of this component
    pub bounds: BoundingBox,
    points: Vec<(u32, u32)>,
}

impl ConnectedComponent {
    /// Start a component from its first pixel
    pub fn new(label: u32, x: u32, y: u32) -> Self {
        Self {
            label,
            pixel_count: 1,
            bounds: BoundingBox::from_point(x, y),
            points: vec![(x, y)],
        }
    }

    /// Add a pixel, growing the bounding box to contain it
    pub fn add(&mut self, x: u32, y: u32) {
        self.bounds.expand_to_contain(x, y);
        self.pixel_count += 1;
        self.points.push((x, y));
    }

    /// Member pixels as `(x, y)`, in the order they were added
    pub fn points(&self) -> &[(u32, u32)] {
        &self.points
    }

    /// Paint every member pixel of this component into `raster`
    pub fn render_into(&self, raster: &mut RasterMut, value: u8) -> RegionResult<()> {
        for &(x, y) in &self.points {
            raster.set(x, y, value)?;
        }
        Ok(())
    }
}

/// Label all connected components of a binary mask
///
/// Every foreground pixel receives the positive canonical label of its
/// component; background stays 0. Labels are not consecutive; see
/// [`LabelMap::compact`].
///
/// # Errors
///
/// [`RegionError::CapacityExceeded`] if the first pass needs more than
/// `options.max_labels` provisional labels.
#[instrument(skip_all, fields(width = mask.width(), height = mask.height()))]
pub fn label_connected_components(
    mask: &BinaryMask,
    options: &LabelOptions,
) -> RegionResult<LabelMap> {
    options.validate()?;

    let w = mask.width() as usize;
    let h = mask.height() as usize;
    let data = mask.data();
    let mut labels = vec![0u32; w * h];
    let mut uf = UnionFind::new(options.max_labels);

    // First pass: provisional labels and equivalences
    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            if data[i] != FOREGROUND {
                continue;
            }

            let (found, n) = prior_neighbor_labels(&labels, w, x, y, options.connectivity);
            let label = match found[..n].iter().min() {
                Some(&min) => min,
                None => uf.increment()?,
            };
            labels[i] = label;
            for &other in &found[..n] {
                if other != label {
                    uf.union(label, other);
                }
            }
        }
    }

    // Second pass: canonical labels
    for label in labels.iter_mut().filter(|l| **l != 0) {
        *label = uf.find(*label);
    }

    tracing::debug!(
        provisional = uf.allocated(),
        components = uf.count(),
        "labeled connected components"
    );

    Ok(LabelMap::from_parts(
        mask.width(),
        mask.height(),
        labels,
        options.connectivity,
    ))
}

/// Find all connected components of a binary mask
///
/// Components are returned in the row-major order of their first pixel.
///
/// # Example
///
/// ```
/// use dia_core::BinaryMask;
/// use dia_region::{LabelOptions, find_connected_components};
///
/// let mask = BinaryMask::from_ascii(&["##..", "...#"]).unwrap();
/// let components = find_connected_components(&mask, &LabelOptions::default()).unwrap();
/// assert_eq!(components.len(), 2);
/// assert_eq!(components[0].pixel_count, 2);
/// ```
pub fn find_connected_components(
    mask: &BinaryMask,
    options: &LabelOptions,
) -> RegionResult<Vec<ConnectedComponent>> {
    let labels = label_connected_components(mask, options)?;
    Ok(labels.components())
}

/// Group the pixels of a label map into components
pub(crate) fn aggregate_components(labels: &LabelMap) -> Vec<ConnectedComponent> {
    let mut index: HashMap<u32, usize> = HashMap::new();
    let mut components: Vec<ConnectedComponent> = Vec::new();

    for (y, row) in labels.rows().enumerate() {
        for (x, &label) in row.iter().enumerate() {
            if label == 0 {
                continue;
            }
            let (x, y) = (x as u32, y as u32);
            match index.get(&label) {
                Some(&i) => components[i].add(x, y),
                None => {
                    index.insert(label, components.len());
                    components.push(ConnectedComponent::new(label, x, y));
                }
            }
        }
    }

    components
}

/// Labels of the already-visited neighbours of (x, y)
///
/// Only neighbours earlier in row-major order are inspected: left and up,
/// plus up-left and up-right for 8-way connectivity.
fn prior_neighbor_labels(
    labels: &[u32],
    w: usize,
    x: usize,
    y: usize,
    connectivity: ConnectivityType,
) -> ([u32; 4], usize) {
    let mut found = [0u32; 4];
    let mut n = 0;
    let mut visit = |idx: usize| {
        if labels[idx] != 0 {
            found[n] = labels[idx];
            n += 1;
        }
    };

    let i = y * w + x;
    if x > 0 {
        visit(i - 1);
    }
    if y > 0 {
        visit(i - w);
        if connectivity == ConnectivityType::EightWay {
            if x > 0 {
                visit(i - w - 1);
            }
            if x + 1 < w {
                visit(i - w + 1);
            }
        }
    }

    (found, n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> BinaryMask {
        BinaryMask::from_ascii(&[
            "##...", //
            "##...", //
            "..###", //
            "..###", //
            "..###", //
        ])
        .unwrap()
    }

    #[test]
    fn test_two_diagonal_blobs_four_way() {
        let comps = find_connected_components(&two_blobs(), &LabelOptions::default()).unwrap();
        assert_eq!(comps.len(), 2);
        assert_eq!(comps[0].bounds, BoundingBox::new_unchecked(0, 0, 1, 1));
        assert_eq!(comps[0].pixel_count, 4);
        assert_eq!(comps[1].bounds, BoundingBox::new_unchecked(2, 2, 4, 4));
        assert_eq!(comps[1].pixel_count, 9);
    }

    #[test]
    fn test_two_diagonal_blobs_eight_way() {
        let opts = LabelOptions::new().with_connectivity(ConnectivityType::EightWay);
        let comps = find_connected_components(&two_blobs(), &opts).unwrap();
        assert_eq!(comps.len(), 1);
        assert_eq!(comps[0].pixel_count, 13);
        assert_eq!(comps[0].bounds, BoundingBox::new_unchecked(0, 0, 4, 4));
    }

    #[test]
    fn test_u_shape_merges_equivalent_labels() {
        // the two arms get different provisional labels until the bottom row
        let mask = BinaryMask::from_ascii(&[
            "#...#", //
            "#...#", //
            "#####", //
        ])
        .unwrap();
        let map = label_connected_components(&mask, &LabelOptions::default()).unwrap();
        let comps = map.components();
        assert_eq!(comps.len(), 1);
        assert_eq!(comps[0].pixel_count, 9);
        assert_eq!(map.get(0, 0), map.get(4, 0));
    }

    #[test]
    fn test_empty_mask_has_no_components() {
        let mask = BinaryMask::new(10, 10).unwrap();
        let comps = find_connected_components(&mask, &LabelOptions::default()).unwrap();
        assert!(comps.is_empty());
    }

    #[test]
    fn test_capacity_exceeded() {
        // 8 isolated pixels under 4-way connectivity
        let mask = BinaryMask::from_ascii(&[
            "#.#.", //
            ".#.#", //
            "#.#.", //
            ".#.#", //
        ])
        .unwrap();
        let opts = LabelOptions::new().with_max_labels(7);
        assert!(matches!(
            label_connected_components(&mask, &opts),
            Err(RegionError::CapacityExceeded { max_labels: 7 })
        ));
        let opts = LabelOptions::new().with_max_labels(8);
        assert_eq!(find_connected_components(&mask, &opts).unwrap().len(), 8);
    }

    #[test]
    fn test_invalid_options() {
        let mask = BinaryMask::new(2, 2).unwrap();
        let opts = LabelOptions::new().with_max_labels(0);
        assert!(matches!(
            label_connected_components(&mask, &opts),
            Err(RegionError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_points_and_render() {
        let mask = BinaryMask::from_ascii(&[".#.", ".##"]).unwrap();
        let comps = find_connected_components(&mask, &LabelOptions::default()).unwrap();
        assert_eq!(comps[0].points(), &[(1, 0), (1, 1), (2, 1)]);

        let mut raster = RasterMut::filled(3, 2, 255).unwrap();
        comps[0].render_into(&mut raster, 0).unwrap();
        let raster: dia_core::Raster = raster.into();
        assert_eq!(raster.data(), &[255, 0, 255, 255, 0, 0]);

        let mut small = RasterMut::filled(2, 2, 255).unwrap();
        assert!(comps[0].render_into(&mut small, 0).is_err());
    }
}

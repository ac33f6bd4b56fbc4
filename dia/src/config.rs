//! Analysis configuration
//!
//! One explicit value carrying every tunable of the pipeline. It is
//! passed into each call; nothing is cached globally.

use std::time::Duration;

use dia_binarize::{DEFAULT_DYNAMIC_RANGE, DEFAULT_K, DEFAULT_WORKER_COUNT, SauvolaOptions, ThresholdMethod};
use dia_recog::{
    DEFAULT_MAX_FOREGROUND_PROJECTION, DEFAULT_MIN_LINE_SPACING, DEFAULT_PROJECTION_WINDOW,
    LineSegmentOptions,
};
use dia_region::{ConnectivityType, DEFAULT_MAX_LABELS, LabelOptions};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// Configuration of a full page analysis
///
/// Missing fields take their defaults when deserialized:
///
/// ```
/// use dia::AnalysisConfig;
///
/// let config: AnalysisConfig = serde_json::from_str(r#"{ "k": 0.5 }"#).unwrap();
/// assert_eq!(config.k, 0.5);
/// assert_eq!(config.max_labels, 100_000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Sauvola sensitivity weight
    pub k: f64,
    /// Window/tile size; `None` means width / 15
    pub tile_size: Option<u32>,
    /// Sauvola dynamic range `R`
    pub dynamic_range: u32,
    /// Binarization workers
    pub worker_count: usize,
    /// Windowed or tiled statistics
    pub method: ThresholdMethod,
    /// Binarization deadline in milliseconds
    pub timeout_ms: Option<u64>,
    /// Provisional label capacity
    pub max_labels: u32,
    /// Pixel adjacency for labeling
    pub connectivity: ConnectivityType,
    /// Projection band height
    pub projection_window: u32,
    /// Minimum rows between text lines
    pub min_line_spacing: u32,
    /// Cap on the projection value of a line boundary
    pub max_foreground_projection: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            tile_size: None,
            dynamic_range: DEFAULT_DYNAMIC_RANGE,
            worker_count: DEFAULT_WORKER_COUNT,
            method: ThresholdMethod::Windowed,
            timeout_ms: None,
            max_labels: DEFAULT_MAX_LABELS,
            connectivity: ConnectivityType::FourWay,
            projection_window: DEFAULT_PROJECTION_WINDOW,
            min_line_spacing: DEFAULT_MIN_LINE_SPACING,
            max_foreground_projection: DEFAULT_MAX_FOREGROUND_PROJECTION,
        }
    }
}

impl AnalysisConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Sauvola sensitivity weight
    pub fn with_k(mut self, k: f64) -> Self {
        self.k = k;
        self
    }

    /// Set an explicit window/tile size
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = Some(tile_size);
        self
    }

    /// Set the Sauvola dynamic range `R`
    pub fn with_dynamic_range(mut self, dynamic_range: u32) -> Self {
        self.dynamic_range = dynamic_range;
        self
    }

    /// Set the number of binarization workers
    pub fn with_worker_count(mut self, workers: usize) -> Self {
        self.worker_count = workers;
        self
    }

    /// Set windowed or tiled statistics
    pub fn with_method(mut self, method: ThresholdMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the binarization deadline, kept in whole milliseconds
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis().min(u64::MAX as u128) as u64);
        self
    }

    /// Set the provisional label capacity
    pub fn with_max_labels(mut self, max_labels: u32) -> Self {
        self.max_labels = max_labels;
        self
    }

    /// Set the labeling pixel adjacency
    pub fn with_connectivity(mut self, connectivity: ConnectivityType) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Set the projection band height
    pub fn with_projection_window(mut self, window: u32) -> Self {
        self.projection_window = window;
        self
    }

    /// Set the minimum rows between text lines
    pub fn with_min_line_spacing(mut self, spacing: u32) -> Self {
        self.min_line_spacing = spacing;
        self
    }

    /// Set the projection cap for line boundaries
    pub fn with_max_foreground_projection(mut self, cap: f64) -> Self {
        self.max_foreground_projection = cap;
        self
    }

    /// Options for the binarization stage
    pub fn sauvola_options(&self) -> SauvolaOptions {
        SauvolaOptions {
            k: self.k,
            tile_size: self.tile_size,
            dynamic_range: self.dynamic_range,
            worker_count: self.worker_count,
            method: self.method,
            timeout: self.timeout_ms.map(Duration::from_millis),
        }
    }

    /// Options for the labeling stage
    pub fn label_options(&self) -> LabelOptions {
        LabelOptions::new()
            .with_max_labels(self.max_labels)
            .with_connectivity(self.connectivity)
    }

    /// Options for the line segmentation stage
    pub fn line_options(&self) -> LineSegmentOptions {
        LineSegmentOptions::new()
            .with_projection_window(self.projection_window)
            .with_min_line_spacing(self.min_line_spacing)
            .with_max_foreground_projection(self.max_foreground_projection)
    }

    /// Check every value before any work is done
    pub fn validate(&self) -> AnalysisResult<()> {
        self.sauvola_options()
            .validate()
            .map_err(|e| AnalysisError::Config(e.to_string()))?;
        self.label_options()
            .validate()
            .map_err(|e| AnalysisError::Config(e.to_string()))?;
        self.line_options()
            .validate()
            .map_err(|e| AnalysisError::Config(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_components() {
        let config = AnalysisConfig::default();
        let s = config.sauvola_options();
        assert_eq!(s.k, 0.3);
        assert_eq!(s.dynamic_range, 128);
        assert_eq!(s.tile_size, None);
        assert_eq!(s.timeout, None);
        assert_eq!(config.label_options().max_labels, 100_000);
        assert_eq!(config.line_options().projection_window, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_reports_config_error() {
        let bad = [
            AnalysisConfig::new().with_k(-1.0),
            AnalysisConfig::new().with_tile_size(0),
            AnalysisConfig::new().with_worker_count(0),
            AnalysisConfig::new().with_max_labels(0),
            AnalysisConfig::new().with_projection_window(0),
            AnalysisConfig::new().with_dynamic_range(0),
            AnalysisConfig::new().with_max_foreground_projection(f64::INFINITY),
        ];
        for config in &bad {
            assert!(matches!(config.validate(), Err(AnalysisError::Config(_))));
        }
    }

    #[test]
    fn test_timeout_conversion() {
        let config = AnalysisConfig::new().with_timeout(Duration::from_millis(1500));
        assert_eq!(config.timeout_ms, Some(1500));
        assert_eq!(config.sauvola_options().timeout, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_setters_reach_stage_options() {
        let config = AnalysisConfig::new()
            .with_dynamic_range(100)
            .with_max_foreground_projection(200.0)
            .with_min_line_spacing(12);
        assert_eq!(config.sauvola_options().dynamic_range, 100);
        let lines = config.line_options();
        assert_eq!(lines.max_foreground_projection, 200.0);
        assert_eq!(lines.min_line_spacing, 12);
        assert!(config.validate().is_ok());
    }
}

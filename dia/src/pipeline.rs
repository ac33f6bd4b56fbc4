//! Page analysis pipeline
//!
//! The integral image is built once per page and shared by both
//! consumers: the binarizer (followed by labeling) and the line
//! segmenter.
//!
//! ```text
//! Raster -> IntegralImage -+-> sauvola_binarize -> BinaryMask -> labeling -> components
//!                          +-> find_lines -> boundaries -> line bands
//! ```

use dia_binarize::{Binarization, CancelToken, sauvola_binarize_with_cancel};
use dia_core::{BoundingBox, IntegralImage, Raster};
use dia_recog::{find_lines, line_bands};
use dia_region::{ConnectedComponent, LabelMap, label_connected_components};
use tracing::instrument;

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, AnalysisResult};

/// Everything computed for one page
#[derive(Debug, Clone)]
pub struct PageAnalysis {
    /// Thresholded page
    pub binarization: Binarization,
    /// Compacted component labels (`1..=n`)
    pub labels: LabelMap,
    /// Components in row-major order of their first pixel
    pub components: Vec<ConnectedComponent>,
    /// Text line boundary rows, ascending
    pub lines: Vec<u32>,
    /// Full-width bands between the boundaries
    pub line_bands: Vec<BoundingBox>,
}

/// Analyze one page with the given configuration
///
/// # Example
///
/// ```
/// use dia::{AnalysisConfig, BoundingBox, Raster, RasterMut, analyze_page};
///
/// let mut page = RasterMut::filled(10, 10, 255).unwrap();
/// page.fill_rect(&BoundingBox::new(2, 2, 4, 4).unwrap(), 0);
/// let page: Raster = page.into();
///
/// let analysis = analyze_page(&page, &AnalysisConfig::default()).unwrap();
/// assert_eq!(analysis.components.len(), 1);
/// assert_eq!(analysis.components[0].bounds, BoundingBox::new(2, 2, 4, 4).unwrap());
/// ```
#[instrument(skip_all, fields(width = raster.width(), height = raster.height()))]
pub fn analyze_page(raster: &Raster, config: &AnalysisConfig) -> AnalysisResult<PageAnalysis> {
    config.validate()?;
    let integral = IntegralImage::from_raster(raster)?;
    analyze_integral(&integral, config, &CancelToken::new())
}

fn analyze_integral(
    integral: &IntegralImage,
    config: &AnalysisConfig,
    cancel: &CancelToken,
) -> AnalysisResult<PageAnalysis> {
    let binarization = sauvola_binarize_with_cancel(integral, &config.sauvola_options(), cancel)?;
    label_and_segment(integral, binarization, config)
}

fn label_and_segment(
    integral: &IntegralImage,
    binarization: Binarization,
    config: &AnalysisConfig,
) -> AnalysisResult<PageAnalysis> {
    let mut labels = label_connected_components(&binarization.mask, &config.label_options())?;
    labels.compact();
    let components = labels.components();

    let lines = find_lines(integral, &config.line_options())?;
    let line_bands = line_bands(&lines, integral.width(), integral.height())?;

    tracing::debug!(
        foreground = binarization.foreground_count,
        components = components.len(),
        lines = lines.len(),
        "page analyzed"
    );

    Ok(PageAnalysis {
        binarization,
        labels,
        components,
        lines,
        line_bands,
    })
}

/// Stateful analyzer: load a page, then run stages on it
///
/// Loading a page replaces every artifact of the previous one. Running a
/// stage whose input has not been produced yet fails with
/// [`AnalysisError::NotReady`].
#[derive(Debug)]
pub struct PageAnalyzer {
    config: AnalysisConfig,
    cancel: CancelToken,
    integral: Option<IntegralImage>,
    binarization: Option<Binarization>,
}

impl PageAnalyzer {
    /// Create an analyzer; the configuration is validated up front
    pub fn new(config: AnalysisConfig) -> AnalysisResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cancel: CancelToken::new(),
            integral: None,
            binarization: None,
        })
    }

    /// Configuration every stage runs with
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Token that cancels binarization runs on the loaded page
    ///
    /// Each [`load`](Self::load) arms a fresh token, so a token taken for
    /// one page has no effect on the next.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Load a page, building its integral image
    pub fn load(&mut self, raster: &Raster) -> AnalysisResult<()> {
        self.binarization = None;
        self.integral = None;
        self.cancel = CancelToken::new();
        self.integral = Some(IntegralImage::from_raster(raster)?);
        Ok(())
    }

    /// Integral image of the loaded page
    pub fn integral(&self) -> Option<&IntegralImage> {
        self.integral.as_ref()
    }

    /// Binarize the loaded page, keeping the result for labeling
    pub fn binarize(&mut self) -> AnalysisResult<&Binarization> {
        let integral = self
            .integral
            .as_ref()
            .ok_or(AnalysisError::NotReady("integral image"))?;
        let result =
            sauvola_binarize_with_cancel(integral, &self.config.sauvola_options(), &self.cancel)?;
        Ok(self.binarization.insert(result))
    }

    /// Most recent binarization of the loaded page
    pub fn binarization(&self) -> Option<&Binarization> {
        self.binarization.as_ref()
    }

    /// Label the binarized page
    pub fn label(&self) -> AnalysisResult<LabelMap> {
        let binarization = self
            .binarization
            .as_ref()
            .ok_or(AnalysisError::NotReady("binary mask"))?;
        let mut labels =
            label_connected_components(&binarization.mask, &self.config.label_options())?;
        labels.compact();
        Ok(labels)
    }

    /// Find text line boundaries of the loaded page
    pub fn find_lines(&self) -> AnalysisResult<Vec<u32>> {
        let integral = self
            .integral
            .as_ref()
            .ok_or(AnalysisError::NotReady("integral image"))?;
        Ok(find_lines(integral, &self.config.line_options())?)
    }

    /// Run every stage on the loaded page
    pub fn run(&mut self) -> AnalysisResult<PageAnalysis> {
        let binarization = self.binarize()?.clone();
        let integral = self
            .integral
            .as_ref()
            .ok_or(AnalysisError::NotReady("integral image"))?;
        label_and_segment(integral, binarization, &self.config)
    }
}

//! End-to-end page analysis regression test
//!
//! Run with:
//! ```
//! cargo test -p dia --test pipeline_reg
//! ```

use std::time::Duration;

use dia::binarize::{BinarizeError, ThresholdMethod};
use dia::region::ConnectivityType;
use dia::{AnalysisConfig, AnalysisError, BinaryMask, BoundingBox, PageAnalyzer, analyze_page};
use dia_test::{RegParams, fixtures};

#[test]
fn pipeline_blank_reg() {
    let mut rp = RegParams::new("pipeline_blank");

    let page = fixtures::blank_page(10, 10).unwrap();
    let analysis = analyze_page(&page, &AnalysisConfig::default()).unwrap();

    rp.compare_values(0.0, analysis.binarization.foreground_count as f64, 0.0);
    rp.compare_values(0.0, analysis.binarization.mask.foreground_count() as f64, 0.0);
    rp.compare_values(0.0, analysis.components.len() as f64, 0.0);
    rp.compare_values(0.0, analysis.lines.len() as f64, 0.0);
    rp.compare_rasters(&page, &analysis.binarization.mask.to_raster());

    assert!(rp.cleanup(), "pipeline_blank regression test failed");
}

#[test]
fn pipeline_square_reg() {
    let mut rp = RegParams::new("pipeline_square");

    let square = BoundingBox::new_unchecked(2, 2, 4, 4);
    let page = fixtures::page_with_box(10, 10, square).unwrap();
    let analysis = analyze_page(&page, &AnalysisConfig::default()).unwrap();

    rp.compare_values(9.0, analysis.binarization.foreground_count as f64, 0.0);
    rp.compare_masks(&BinaryMask::from_raster(&page, 128), &analysis.binarization.mask);
    // mask rendered back at the 0/255 boundary is the page itself
    rp.compare_rasters(&page, &analysis.binarization.mask.to_raster());

    rp.compare_values(1.0, analysis.components.len() as f64, 0.0);
    let comp = &analysis.components[0];
    rp.compare_values(9.0, comp.pixel_count as f64, 0.0);
    assert_eq!(comp.bounds, square);
    assert_eq!(comp.label, 1);

    assert!(rp.cleanup(), "pipeline_square regression test failed");
}

#[test]
fn pipeline_text_page_reg() {
    let mut rp = RegParams::new("pipeline_text");

    let page = fixtures::text_page(200, 200, &[(30, 12), (80, 12), (130, 12)], 4).unwrap();
    for method in [ThresholdMethod::Windowed, ThresholdMethod::Tiled] {
        let config = AnalysisConfig::new().with_method(method);
        let analysis = analyze_page(&page, &config).unwrap();
        eprintln!(
            "{method:?}: {} components, lines {:?}",
            analysis.components.len(),
            analysis.lines
        );

        // 160 text columns in 4-pixel glyphs and gaps: 20 glyphs per line
        rp.compare_values(60.0, analysis.components.len() as f64, 0.0);
        rp.compare_values(60.0, analysis.labels.max_label() as f64, 0.0);
        rp.compare_values(3.0, analysis.lines.len() as f64, 0.0);
        rp.compare_values(4.0, analysis.line_bands.len() as f64, 0.0);

        // Each glyph lies inside exactly one line band
        for comp in &analysis.components {
            let holders = analysis
                .line_bands
                .iter()
                .filter(|band| band.contains(&comp.bounds))
                .count();
            assert_eq!(holders, 1, "glyph {} at {}", comp.label, comp.bounds);
        }
    }

    assert!(rp.cleanup(), "pipeline_text regression test failed");
}

#[test]
fn analyzer_reg() {
    let mut rp = RegParams::new("analyzer");

    let mut analyzer = PageAnalyzer::new(AnalysisConfig::default()).unwrap();
    assert!(matches!(analyzer.run(), Err(AnalysisError::NotReady(_))));

    let page = fixtures::text_page(200, 200, &[(30, 12), (80, 12), (130, 12)], 4).unwrap();
    analyzer.load(&page).unwrap();
    let direct = analyze_page(&page, analyzer.config()).unwrap();
    let staged = analyzer.run().unwrap();
    rp.compare_strings(
        direct.binarization.mask.data(),
        staged.binarization.mask.data(),
    );
    rp.compare_values(direct.components.len() as f64, staged.components.len() as f64, 0.0);
    assert_eq!(direct.lines, staged.lines);
    assert_eq!(analyzer.find_lines().unwrap(), staged.lines);
    assert_eq!(analyzer.label().unwrap(), staged.labels);

    // Cancelling through the analyzer's token fails the next binarization
    analyzer.cancel_token().cancel();
    match analyzer.binarize() {
        Err(AnalysisError::Binarize(BinarizeError::Cancelled)) => {}
        other => panic!("expected cancellation, got {other:?}"),
    }
    assert!(matches!(
        analyzer.run(),
        Err(AnalysisError::Binarize(BinarizeError::Cancelled))
    ));

    // Loading the next page arms a new token
    let next = fixtures::blank_page(20, 20).unwrap();
    analyzer.load(&next).unwrap();
    let analysis = analyzer.run().unwrap();
    rp.compare_values(0.0, analysis.binarization.foreground_count as f64, 0.0);
    rp.compare_values(400.0, analysis.binarization.background_count() as f64, 0.0);

    assert!(rp.cleanup(), "analyzer regression test failed");
}

#[test]
fn config_reg() {
    let config: AnalysisConfig = serde_json::from_str(
        r#"{
            "k": 0.5,
            "tile_size": 25,
            "method": "tiled",
            "connectivity": "eight_way",
            "timeout_ms": 2000
        }"#,
    )
    .unwrap();
    assert_eq!(config.k, 0.5);
    assert_eq!(config.tile_size, Some(25));
    assert_eq!(config.method, ThresholdMethod::Tiled);
    assert_eq!(config.connectivity, ConnectivityType::EightWay);
    assert_eq!(config.sauvola_options().timeout, Some(Duration::from_secs(2)));
    assert_eq!(config.projection_window, 30);
    assert_eq!(config.min_line_spacing, 20);

    let json = serde_json::to_string(&config).unwrap();
    let back: AnalysisConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);

    let bad: AnalysisConfig = serde_json::from_str(r#"{ "dynamic_range": 0 }"#).unwrap();
    let page = fixtures::blank_page(10, 10).unwrap();
    assert!(matches!(analyze_page(&page, &bad), Err(AnalysisError::Config(_))));
}

#[test]
fn deadline_reg() {
    let page = fixtures::text_page(100, 100, &[(20, 10)], 4).unwrap();
    let config = AnalysisConfig::new().with_timeout(Duration::ZERO);
    match analyze_page(&page, &config) {
        Err(AnalysisError::Binarize(BinarizeError::DeadlineExceeded { total_rows, .. })) => {
            assert_eq!(total_rows, 100)
        }
        other => panic!("expected deadline error, got {other:?}"),
    }
}

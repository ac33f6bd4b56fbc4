//! Projection line segmentation regression test
//!
//! Run with:
//! ```
//! cargo test -p dia-recog --test lines_reg
//! ```

use dia_core::{BoundingBox, IntegralImage};
use dia_recog::{LineSegmentOptions, ProjectionProfile, find_lines, line_bands};
use dia_test::{RegParams, fixtures};

#[test]
fn lines_reg() {
    let mut rp = RegParams::new("lines");

    // Three text lines, 12 rows tall, 50 rows apart
    let page = fixtures::text_page(200, 200, &[(30, 12), (80, 12), (130, 12)], 4).unwrap();
    let integral = IntegralImage::from_raster(&page).unwrap();
    let options = LineSegmentOptions::default();

    let profile = ProjectionProfile::compute(&integral, options.projection_window).unwrap();
    eprintln!("candidates: {:?}", profile.candidates);
    rp.compare_values(200.0, profile.values.len() as f64, 0.0); // 1
    rp.compare_values(255.0, profile.values[0], 0.0); // 2

    // The profile bottoms out while the band covers a whole line
    let line_mean = 255.0 * 120.0 / 200.0;
    let plateau = (12.0 * line_mean + 18.0 * 255.0) / 30.0;
    rp.compare_values(plateau, profile.values[36], 1e-9); // 3

    let lines = find_lines(&integral, &options).unwrap();
    eprintln!("lines: {:?}", lines);
    rp.compare_values(3.0, lines.len() as f64, 0.0); // 4
    for (&want, &got) in [46u32, 96, 146].iter().zip(&lines) {
        rp.compare_values(want as f64, got as f64, 0.0); // 5 - 7
    }
    assert_eq!(lines, vec![46, 96, 146]);

    // Every text line sits in its own band above its boundary
    let bands = line_bands(&lines, page.width(), page.height()).unwrap();
    rp.compare_values(4.0, bands.len() as f64, 0.0); // 8
    for (band, &(top, height)) in bands.iter().zip(&[(30u32, 12u32), (80, 12), (130, 12)]) {
        let text = BoundingBox::new_unchecked(0, top, 199, top + height - 1);
        assert!(band.contains(&text), "band {band} misses text at row {top}");
    }

    if rp.display() {
        for (y, v) in profile.values.iter().enumerate() {
            eprintln!("{y:4} {v:8.2}");
        }
    }

    assert!(rp.cleanup(), "lines regression test failed");
}

#[test]
fn lines_blank_page_reg() {
    let mut rp = RegParams::new("lines_blank");

    let page = fixtures::blank_page(120, 90).unwrap();
    let integral = IntegralImage::from_raster(&page).unwrap();
    let lines = find_lines(&integral, &LineSegmentOptions::default()).unwrap();
    rp.compare_values(0.0, lines.len() as f64, 0.0);

    let bands = line_bands(&lines, 120, 90).unwrap();
    rp.compare_values(1.0, bands.len() as f64, 0.0);
    assert_eq!(bands[0], BoundingBox::from_size(120, 90));

    assert!(rp.cleanup(), "lines_blank regression test failed");
}

#[test]
fn lines_spacing_reg() {
    // Lines 24 rows apart: boundaries at 26 and 50 with a 10-row window
    let page = fixtures::text_page(100, 100, &[(20, 10), (44, 10)], 4).unwrap();
    let integral = IntegralImage::from_raster(&page).unwrap();

    let options = LineSegmentOptions::new().with_projection_window(10);
    let lines = find_lines(&integral, &options).unwrap();
    assert_eq!(lines, vec![26, 50]);

    // A larger minimum spacing measured from the page top swallows the first
    let options = options.with_min_line_spacing(30);
    let lines = find_lines(&integral, &options).unwrap();
    assert_eq!(lines, vec![50]);

    assert!(find_lines(&integral, &LineSegmentOptions::new().with_projection_window(0)).is_err());
}

#[test]
fn lines_page_top_reg() {
    // Text starting at row 0: the dip below the first line is too close
    // to the page top to count as a boundary
    let page = fixtures::text_page(100, 100, &[(0, 8), (40, 8), (70, 8)], 4).unwrap();
    let integral = IntegralImage::from_raster(&page).unwrap();
    let options = LineSegmentOptions::new().with_projection_window(6);

    let profile = ProjectionProfile::compute(&integral, options.projection_window).unwrap();
    assert_eq!(profile.candidates, vec![6, 46, 76]);
    assert_eq!(find_lines(&integral, &options).unwrap(), vec![46, 76]);

    // Without a spacing rule the top boundary survives
    let options = options.with_min_line_spacing(0);
    assert_eq!(find_lines(&integral, &options).unwrap(), vec![6, 46, 76]);
}

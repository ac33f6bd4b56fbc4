//! Synthetic page fixtures
//!
//! Small generated rasters standing in for scanned pages.

use crate::error::{TestError, TestResult};
use dia_core::{BLACK, BoundingBox, Raster, RasterMut, WHITE};

/// An all-white page
pub fn blank_page(width: u32, height: u32) -> TestResult<Raster> {
    Ok(Raster::filled(width, height, WHITE)?)
}

/// A white page with one black rectangle (inclusive corners)
pub fn page_with_box(width: u32, height: u32, rect: BoundingBox) -> TestResult<Raster> {
    if rect.right >= width || rect.bottom >= height {
        return Err(TestError::InvalidFixture(format!(
            "box {rect} does not fit a {width}x{height} page"
        )));
    }
    let mut raster = RasterMut::filled(width, height, WHITE)?;
    raster.fill_rect(&rect, BLACK);
    Ok(raster.into())
}

/// A white page with horizontal text-like bands
///
/// Each `(top, height)` pair becomes a band of short black "glyphs"
/// (`glyph` pixels wide, separated by `glyph` pixels of paper) between
/// a left and right margin of `width / 10`.
pub fn text_page(width: u32, height: u32, lines: &[(u32, u32)], glyph: u32) -> TestResult<Raster> {
    if glyph == 0 {
        return Err(TestError::InvalidFixture("glyph width must be positive".into()));
    }
    for &(top, h) in lines {
        if h == 0 || top + h > height {
            return Err(TestError::InvalidFixture(format!(
                "line at row {top} with height {h} does not fit a page of height {height}"
            )));
        }
    }

    let margin = width / 10;
    Ok(Raster::from_fn(width, height, |x, y| {
        let in_line = lines.iter().any(|&(top, h)| y >= top && y < top + h);
        let in_text = x >= margin && x < width - margin;
        let in_glyph = (x.saturating_sub(margin) / glyph) % 2 == 0;
        if in_line && in_text && in_glyph {
            BLACK
        } else {
            WHITE
        }
    })?)
}

/// A uniform `base` page with every `period`-th pixel (in both axes) set to `ink`
pub fn speckled_page(width: u32, height: u32, base: u8, ink: u8, period: u32) -> TestResult<Raster> {
    if period == 0 {
        return Err(TestError::InvalidFixture("period must be positive".into()));
    }
    Ok(Raster::from_fn(width, height, |x, y| {
        if x % period == 0 && y % period == 0 {
            ink
        } else {
            base
        }
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_with_box() {
        let r = page_with_box(10, 10, BoundingBox::new_unchecked(2, 2, 4, 4)).unwrap();
        assert_eq!(r.count_below(WHITE), 9);
        assert!(page_with_box(4, 4, BoundingBox::new_unchecked(2, 2, 4, 4)).is_err());
    }

    #[test]
    fn test_text_page_bands() {
        let r = text_page(100, 60, &[(10, 8), (40, 8)], 4).unwrap();
        assert_eq!(r.row(5).unwrap().iter().filter(|&&s| s == BLACK).count(), 0);
        assert!(r.row(12).unwrap().iter().any(|&s| s == BLACK));
        assert!(r.row(44).unwrap().iter().any(|&s| s == BLACK));
        assert!(text_page(100, 60, &[(55, 8)], 4).is_err());
    }

    #[test]
    fn test_speckled_page() {
        let r = speckled_page(8, 8, 200, 100, 4).unwrap();
        assert_eq!(r.count_below(200), 4);
    }
}

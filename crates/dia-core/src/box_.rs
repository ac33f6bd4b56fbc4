//! BoundingBox - inclusive rectangle regions
//!
//! Coordinates are inclusive on all four sides: a single pixel at (x, y)
//! is the box `(x, y, x, y)` with width and height 1.

use crate::error::{Error, Result};

/// An axis-aligned rectangle with inclusive corners
///
/// Invariant: `left <= right` and `top <= bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    /// Left x coordinate
    pub left: u32,
    /// Top y coordinate
    pub top: u32,
    /// Right x coordinate (inclusive)
    pub right: u32,
    /// Bottom y coordinate (inclusive)
    pub bottom: u32,
}

impl BoundingBox {
    /// Create a new box
    ///
    /// # Errors
    ///
    /// Returns an error if the corners are inverted.
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Result<Self> {
        if left > right || top > bottom {
            return Err(Error::InvalidParameter(format!(
                "box corners inverted: ({left}, {top})..=({right}, {bottom})"
            )));
        }
        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    /// Create a box without validation
    pub const fn new_unchecked(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Box covering exactly one pixel
    pub const fn from_point(x: u32, y: u32) -> Self {
        Self::new_unchecked(x, y, x, y)
    }

    /// Box covering a whole `width x height` image
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new_unchecked(0, 0, width.saturating_sub(1), height.saturating_sub(1))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.right - self.left + 1
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.bottom - self.top + 1
    }

    /// Number of pixels covered
    #[inline]
    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Grow the box so it covers (x, y)
    #[inline]
    pub fn expand_to_contain(&mut self, x: u32, y: u32) {
        self.left = self.left.min(x);
        self.top = self.top.min(y);
        self.right = self.right.max(x);
        self.bottom = self.bottom.max(y);
    }

    /// Check if a point is inside the box
    #[inline]
    pub fn contains_point(&self, x: u32, y: u32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    /// Check if `other` lies within (or coincides with) this box
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.top <= other.top
            && self.bottom >= other.bottom
            && self.left <= other.left
            && self.right >= other.right
    }

    /// Check if the two boxes share at least one pixel
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.intersection(other).is_some()
    }

    /// Compute the overlap of two boxes, `None` if they are disjoint
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);

        if left > right || top > bottom {
            None
        } else {
            Some(BoundingBox::new_unchecked(left, top, right, bottom))
        }
    }

    /// Smallest box covering both boxes
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new_unchecked(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// Clip the box to a `width x height` image
    pub fn clip(&self, width: u32, height: u32) -> Option<BoundingBox> {
        if width == 0 || height == 0 {
            return None;
        }
        self.intersection(&BoundingBox::from_size(width, height))
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_inverted() {
        assert!(BoundingBox::new(5, 0, 4, 0).is_err());
        assert!(BoundingBox::new(0, 5, 0, 4).is_err());
        assert!(BoundingBox::new(4, 4, 4, 4).is_ok());
    }

    #[test]
    fn test_dimensions_are_inclusive() {
        let b = BoundingBox::new_unchecked(2, 2, 4, 4);
        assert_eq!(b.width(), 3);
        assert_eq!(b.height(), 3);
        assert_eq!(b.area(), 9);
        assert_eq!(BoundingBox::from_point(7, 1).area(), 1);
    }

    #[test]
    fn test_expand_to_contain() {
        let mut b = BoundingBox::from_point(3, 3);
        b.expand_to_contain(1, 5);
        b.expand_to_contain(4, 2);
        assert_eq!(b, BoundingBox::new_unchecked(1, 2, 4, 5));
    }

    #[test]
    fn test_intersection_and_union() {
        let a = BoundingBox::new_unchecked(0, 0, 4, 4);
        let b = BoundingBox::new_unchecked(4, 2, 8, 9);
        let c = BoundingBox::new_unchecked(6, 6, 7, 7);

        assert!(a.intersects(&b));
        assert_eq!(a.intersection(&b), Some(BoundingBox::new_unchecked(4, 2, 4, 4)));
        assert!(!a.intersects(&c));
        assert_eq!(a.intersection(&c), None);
        assert_eq!(a.union(&c), BoundingBox::new_unchecked(0, 0, 7, 7));
    }

    #[test]
    fn test_contains() {
        let outer = BoundingBox::new_unchecked(0, 0, 9, 9);
        let inner = BoundingBox::new_unchecked(2, 3, 9, 4);
        assert!(outer.contains(&inner));
        assert!(outer.contains(&outer));
        assert!(!inner.contains(&outer));
    }

    #[test]
    fn test_clip() {
        let b = BoundingBox::new_unchecked(3, 3, 20, 20);
        assert_eq!(b.clip(5, 6), Some(BoundingBox::new_unchecked(3, 3, 4, 5)));
        assert_eq!(BoundingBox::new_unchecked(10, 10, 12, 12).clip(5, 5), None);
    }
}

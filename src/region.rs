//! Integer rectangles in original-image pixel coordinates.
//!
//! All tile arithmetic happens in the coordinate space of the full-resolution
//! (level 0) image, regardless of which pyramid level is being requested.
//! A [`Region`] is a half-open rectangle `[left, right) x [top, bottom)` in
//! that space. Coordinates are `i64` so that a want-region computed as
//! `x + (tile_size << level) + (border_size << level)` cannot overflow for
//! any level below 32.

use std::fmt;

/// An axis-aligned rectangle in original-image pixel coordinates.
///
/// Half-open on both axes: a pixel `(px, py)` is inside the region iff
/// `left <= px < right` and `top <= py < bottom`. A region with
/// `right <= left` or `bottom <= top` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Leftmost column (inclusive)
    pub left: i64,

    /// Topmost row (inclusive)
    pub top: i64,

    /// Rightmost column (exclusive)
    pub right: i64,

    /// Bottommost row (exclusive)
    pub bottom: i64,
}

impl Region {
    /// Create a region from its edges.
    pub fn new(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a region from an origin and a size.
    pub fn from_size(left: i64, top: i64, width: i64, height: i64) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    /// Width in pixels. Zero for empty regions.
    pub fn width(&self) -> i64 {
        (self.right - self.left).max(0)
    }

    /// Height in pixels. Zero for empty regions.
    pub fn height(&self) -> i64 {
        (self.bottom - self.top).max(0)
    }

    /// Whether the region contains no pixels.
    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Intersect two regions.
    ///
    /// Returns `None` when the regions share no pixels, including the case
    /// where they merely touch along an edge (half-open rectangles).
    pub fn intersect(&self, other: &Region) -> Option<Region> {
        let clipped = Region {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        };
        if clipped.is_empty() {
            None
        } else {
            Some(clipped)
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})x[{}, {})",
            self.left, self.right, self.top, self.bottom
        )
    }
}

// =============================================================================
// Tests
// =============================================================================

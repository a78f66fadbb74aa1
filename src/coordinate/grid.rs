//! Integer rectangles in pixel and tile space
//!
//! Unlike an extraction region, a grid range may start at negative
//! coordinates and may have a non-positive extent, which the query planner
//! uses to mean "nothing matched".

use std::fmt;

/// Rectangle in pixel (or tile index) coordinates, (0,0) at the upper-left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridRange {
    /// X-coordinate of the upper-left corner
    pub x: i64,
    /// Y-coordinate of the upper-left corner
    pub y: i64,
    /// Width in cells
    pub width: i64,
    /// Height in cells
    pub height: i64,
}

impl GridRange {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        GridRange { x, y, width, height }
    }

    /// Build from exclusive corner coordinates
    pub fn from_corners(min_x: i64, min_y: i64, max_x: i64, max_y: i64) -> Self {
        GridRange::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// X-coordinate immediately to the right of the range (exclusive)
    pub fn end_x(&self) -> i64 {
        self.x + self.width
    }

    /// Y-coordinate immediately below the range (exclusive)
    pub fn end_y(&self) -> i64 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Number of cells, zero for empty ranges
    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width * self.height
        }
    }

    pub fn contains(&self, other: &GridRange) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.end_x() <= self.end_x()
            && other.end_y() <= self.end_y()
    }

    /// Overlap of both ranges; the result may be empty
    pub fn intersection(&self, other: &GridRange) -> GridRange {
        let min_x = self.x.max(other.x);
        let min_y = self.y.max(other.y);
        let max_x = self.end_x().min(other.end_x()).max(min_x);
        let max_y = self.end_y().min(other.end_y()).max(min_y);
        GridRange::from_corners(min_x, min_y, max_x, max_y)
    }

    /// Same size, shifted by (dx, dy)
    pub fn translate(&self, dx: i64, dy: i64) -> GridRange {
        GridRange::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

impl fmt::Display for GridRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {}x{}", self.x, self.y, self.width, self.height)
    }
}

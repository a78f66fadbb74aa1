//! Point structure for representing coordinates

/// A point in model or pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate (easting or longitude, or pixel column)
    pub x: f64,
    /// Y coordinate (northing or latitude, or pixel row)
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

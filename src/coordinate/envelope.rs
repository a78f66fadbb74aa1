//! Geographic envelopes

use std::fmt;

use super::point::Point;

/// An axis-aligned rectangle in model (geographic or projected) space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    /// Minimum X coordinate
    pub min_x: f64,
    /// Minimum Y coordinate
    pub min_y: f64,
    /// Maximum X coordinate
    pub max_x: f64,
    /// Maximum Y coordinate
    pub max_y: f64,
}

impl Envelope {
    /// Create a new envelope
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Envelope { min_x, min_y, max_x, max_y }
    }

    /// Parse an envelope from a string (format: "minx,miny,maxx,maxy")
    pub fn from_string(bbox_str: &str) -> Result<Self, String> {
        let parts: Vec<&str> = bbox_str.split(',').collect();
        if parts.len() != 4 {
            return Err("Envelope must have 4 comma-separated values".to_string());
        }

        let mut values = [0.0f64; 4];
        for (i, (part, name)) in parts.iter().zip(["min_x", "min_y", "max_x", "max_y"]).enumerate() {
            values[i] = part
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("Invalid {} value: {}", name, part.trim()))?;
        }

        let envelope = Envelope::new(values[0], values[1], values[2], values[3]);
        if envelope.width() < 0.0 || envelope.height() < 0.0 {
            return Err(format!("Envelope has inverted corners: {}", bbox_str));
        }
        Ok(envelope)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.min_x + self.width() / 2.0,
            self.min_y + self.height() / 2.0,
        )
    }

    /// True if the envelope has no area
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Edge-inclusive intersection test
    ///
    /// Envelopes that only touch along an edge or corner intersect.
    pub fn intersects(&self, other: &Envelope) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// Edge-inclusive containment of another envelope
    pub fn contains_envelope(&self, other: &Envelope) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.min_x && point.x <= self.max_x &&
            point.y >= self.min_y && point.y <= self.max_y
    }

    /// Smallest envelope covering both
    pub fn union(&self, other: &Envelope) -> Envelope {
        Envelope::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Overlap of both envelopes, `None` when disjoint
    pub fn intersection(&self, other: &Envelope) -> Option<Envelope> {
        if !self.intersects(other) {
            return None;
        }
        Some(Envelope::new(
            self.min_x.max(other.min_x),
            self.min_y.max(other.min_y),
            self.max_x.min(other.max_x),
            self.max_y.min(other.max_y),
        ))
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {} : {}, {}]", self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

//! Colour maps for palette rasters

use std::collections::BTreeMap;

use crate::raster::errors::{MosaicError, MosaicResult};

/// Simple RGBA color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RgbaColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl RgbaColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        RgbaColor { r, g, b, a }
    }

    /// Create from hex string, `#RRGGBB` or `#RRGGBBAA`
    pub fn from_hex(hex: &str) -> MosaicResult<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 && digits.len() != 8 {
            return Err(MosaicError::InvalidConfig(format!(
                "Invalid hex color code: {} - must be 6 or 8 hexadecimal digits", hex
            )));
        }

        let component = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| MosaicError::InvalidConfig(format!("Invalid hex color: {}", hex)))
        };
        let alpha = if digits.len() == 8 { component(6..8)? } else { 255 };

        Ok(RgbaColor::new(component(0..2)?, component(2..4)?, component(4..6)?, alpha))
    }

    pub fn to_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Sample value to colour lookup
///
/// Values without an entry render fully transparent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorMap {
    entries: BTreeMap<u32, RgbaColor>,
}

impl ColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: u32, color: RgbaColor) {
        self.entries.insert(value, color);
    }

    pub fn with_entry(mut self, value: u32, color: RgbaColor) -> Self {
        self.insert(value, color);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, value: u32) -> RgbaColor {
        self.entries
            .get(&value)
            .copied()
            .unwrap_or(RgbaColor::new(0, 0, 0, 0))
    }

    /// True when every entry is opaque, so RGB output loses nothing
    pub fn is_opaque(&self) -> bool {
        self.entries.values().all(|c| c.a == 255)
    }
}

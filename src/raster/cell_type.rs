//! Sample encodings of stored rasters
//!
//! A cell type fixes the bit depth and value range of every sample in a
//! raster. When a band's no-data value falls outside the native range the
//! raster is read with a wider target type, following a fixed promotion
//! chain that ends at 64-bit real.

use std::fmt;
use std::str::FromStr;

use crate::raster::errors::{MosaicError, MosaicResult};

/// Sample encoding of a raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellType {
    OneBit,
    FourBit,
    EightBitSigned,
    EightBitUnsigned,
    SixteenBitSigned,
    SixteenBitUnsigned,
    ThirtyTwoBitSigned,
    ThirtyTwoBitUnsigned,
    ThirtyTwoBitReal,
    SixtyFourBitReal,
}

impl CellType {
    /// All cell types, narrowest first
    pub const ALL: [CellType; 10] = [
        CellType::OneBit,
        CellType::FourBit,
        CellType::EightBitSigned,
        CellType::EightBitUnsigned,
        CellType::SixteenBitSigned,
        CellType::SixteenBitUnsigned,
        CellType::ThirtyTwoBitSigned,
        CellType::ThirtyTwoBitUnsigned,
        CellType::ThirtyTwoBitReal,
        CellType::SixtyFourBitReal,
    ];

    pub fn bits_per_sample(&self) -> usize {
        match self {
            CellType::OneBit => 1,
            CellType::FourBit => 4,
            CellType::EightBitSigned | CellType::EightBitUnsigned => 8,
            CellType::SixteenBitSigned | CellType::SixteenBitUnsigned => 16,
            CellType::ThirtyTwoBitSigned
            | CellType::ThirtyTwoBitUnsigned
            | CellType::ThirtyTwoBitReal => 32,
            CellType::SixtyFourBitReal => 64,
        }
    }

    /// Bytes needed to hold one sample, sub-byte types rounding up to one
    pub fn bytes_per_sample(&self) -> usize {
        (self.bits_per_sample() + 7) / 8
    }

    /// True for types that pack several samples into one byte
    pub fn is_sub_byte(&self) -> bool {
        self.bits_per_sample() < 8
    }

    pub fn is_real(&self) -> bool {
        matches!(self, CellType::ThirtyTwoBitReal | CellType::SixtyFourBitReal)
    }

    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            CellType::EightBitSigned | CellType::SixteenBitSigned | CellType::ThirtyTwoBitSigned
        ) || self.is_real()
    }

    /// Inclusive range of values representable by this type
    pub fn value_range(&self) -> (f64, f64) {
        match self {
            CellType::OneBit => (0.0, 1.0),
            CellType::FourBit => (0.0, 15.0),
            CellType::EightBitSigned => (i8::MIN as f64, i8::MAX as f64),
            CellType::EightBitUnsigned => (0.0, u8::MAX as f64),
            CellType::SixteenBitSigned => (i16::MIN as f64, i16::MAX as f64),
            CellType::SixteenBitUnsigned => (0.0, u16::MAX as f64),
            CellType::ThirtyTwoBitSigned => (i32::MIN as f64, i32::MAX as f64),
            CellType::ThirtyTwoBitUnsigned => (0.0, u32::MAX as f64),
            CellType::ThirtyTwoBitReal => (f32::MIN as f64, f32::MAX as f64),
            CellType::SixtyFourBitReal => (f64::MIN, f64::MAX),
        }
    }

    /// Whether `value` can be stored without loss
    pub fn can_represent(&self, value: f64) -> bool {
        if value.is_nan() {
            return self.is_real();
        }
        let (min, max) = self.value_range();
        if value < min || value > max {
            return false;
        }
        self.is_real() || value.fract() == 0.0
    }

    /// Next wider type in the promotion chain, `None` at 64-bit real
    pub fn promoted(&self) -> Option<CellType> {
        match self {
            CellType::OneBit | CellType::FourBit => Some(CellType::EightBitUnsigned),
            CellType::EightBitSigned => Some(CellType::SixteenBitSigned),
            CellType::EightBitUnsigned => Some(CellType::SixteenBitUnsigned),
            CellType::SixteenBitSigned => Some(CellType::ThirtyTwoBitSigned),
            CellType::SixteenBitUnsigned => Some(CellType::ThirtyTwoBitUnsigned),
            CellType::ThirtyTwoBitSigned
            | CellType::ThirtyTwoBitUnsigned
            | CellType::ThirtyTwoBitReal => Some(CellType::SixtyFourBitReal),
            CellType::SixtyFourBitReal => None,
        }
    }

    /// Name used in dataset configuration files
    pub fn name(&self) -> &'static str {
        match self {
            CellType::OneBit => "1bit",
            CellType::FourBit => "4bit",
            CellType::EightBitSigned => "8bit_s",
            CellType::EightBitUnsigned => "8bit_u",
            CellType::SixteenBitSigned => "16bit_s",
            CellType::SixteenBitUnsigned => "16bit_u",
            CellType::ThirtyTwoBitSigned => "32bit_s",
            CellType::ThirtyTwoBitUnsigned => "32bit_u",
            CellType::ThirtyTwoBitReal => "32bit_real",
            CellType::SixtyFourBitReal => "64bit_real",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CellType {
    type Err = MosaicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        CellType::ALL
            .iter()
            .find(|ct| ct.name() == wanted)
            .copied()
            .ok_or_else(|| MosaicError::InvalidConfig(format!("Unknown cell type: {}", s)))
    }
}

/// Widen `native` until every no-data value is representable
///
/// Returns `native` itself when no promotion is needed.
pub fn determine_target_cell_type(native: CellType, no_data_values: &[f64]) -> MosaicResult<CellType> {
    let mut target = native;
    while let Some(unrepresentable) = no_data_values.iter().copied().find(|v| !target.can_represent(*v)) {
        let current = target;
        target = current.promoted().ok_or(MosaicError::InvalidNoData {
            cell_type: current,
            value: unrepresentable,
        })?;
    }
    Ok(target)
}

/// Pick a no-data value for a band from its observed statistics
///
/// Prefers a value just below the observed minimum, then just above the
/// maximum, so the native type can be kept. When the statistics span the
/// whole native range the value lands in the promoted type's range.
pub fn suggest_no_data_value(cell_type: CellType, stats_min: f64, stats_max: f64) -> f64 {
    if cell_type.is_real() {
        return if cell_type == CellType::ThirtyTwoBitReal {
            f32::MIN as f64
        } else {
            f64::MIN
        };
    }

    let (type_min, type_max) = cell_type.value_range();
    let below = stats_min.floor() - 1.0;
    if below >= type_min {
        return below;
    }
    let above = stats_max.ceil() + 1.0;
    if above <= type_max {
        return above;
    }

    // full range in use, leave it to promotion
    if cell_type.is_signed() {
        type_min - 1.0
    } else {
        type_max + 1.0
    }
}

//! Sample depth promotion rules
//!
//! Each rule widens sample `i` of a native-depth tile into sample `i` of a
//! target-depth tile. Rules exist only for the fixed (source, target) pairs
//! of the promotion chain; asking for any other pair is a configuration
//! error. Multi-byte samples are big-endian on both sides.

use std::collections::HashMap;

use byteorder::{BigEndian, ByteOrder};
use lazy_static::lazy_static;

use crate::raster::cell_type::CellType;
use crate::raster::errors::{MosaicError, MosaicResult};

/// Widens one sample from `source` into `target`
pub type PromotionRule = fn(source: &[u8], sample_index: usize, target: &mut [u8]);

fn one_bit_to_u8(source: &[u8], i: usize, target: &mut [u8]) {
    target[i] = (source[i / 8] >> (7 - (i % 8))) & 0x01;
}

fn four_bit_to_u8(source: &[u8], i: usize, target: &mut [u8]) {
    let shift = if i % 2 == 0 { 4 } else { 0 };
    target[i] = (source[i / 2] >> shift) & 0x0F;
}

fn u8_to_u16(source: &[u8], i: usize, target: &mut [u8]) {
    BigEndian::write_u16(&mut target[i * 2..], source[i] as u16);
}

fn i8_to_i16(source: &[u8], i: usize, target: &mut [u8]) {
    BigEndian::write_i16(&mut target[i * 2..], source[i] as i8 as i16);
}

fn u16_to_u32(source: &[u8], i: usize, target: &mut [u8]) {
    let value = BigEndian::read_u16(&source[i * 2..]);
    BigEndian::write_u32(&mut target[i * 4..], value as u32);
}

fn i16_to_i32(source: &[u8], i: usize, target: &mut [u8]) {
    let value = BigEndian::read_i16(&source[i * 2..]);
    BigEndian::write_i32(&mut target[i * 4..], value as i32);
}

fn u32_to_f64(source: &[u8], i: usize, target: &mut [u8]) {
    let value = BigEndian::read_u32(&source[i * 4..]);
    BigEndian::write_f64(&mut target[i * 8..], value as f64);
}

fn i32_to_f64(source: &[u8], i: usize, target: &mut [u8]) {
    let value = BigEndian::read_i32(&source[i * 4..]);
    BigEndian::write_f64(&mut target[i * 8..], value as f64);
}

fn f32_to_f64(source: &[u8], i: usize, target: &mut [u8]) {
    let value = BigEndian::read_f32(&source[i * 4..]);
    BigEndian::write_f64(&mut target[i * 8..], value as f64);
}

lazy_static! {
    static ref PROMOTION_RULES: HashMap<(CellType, CellType), PromotionRule> = {
        let mut rules: HashMap<(CellType, CellType), PromotionRule> = HashMap::new();
        rules.insert((CellType::OneBit, CellType::EightBitUnsigned), one_bit_to_u8);
        rules.insert((CellType::FourBit, CellType::EightBitUnsigned), four_bit_to_u8);
        rules.insert((CellType::EightBitUnsigned, CellType::SixteenBitUnsigned), u8_to_u16);
        rules.insert((CellType::EightBitSigned, CellType::SixteenBitSigned), i8_to_i16);
        rules.insert((CellType::SixteenBitUnsigned, CellType::ThirtyTwoBitUnsigned), u16_to_u32);
        rules.insert((CellType::SixteenBitSigned, CellType::ThirtyTwoBitSigned), i16_to_i32);
        rules.insert((CellType::ThirtyTwoBitUnsigned, CellType::SixtyFourBitReal), u32_to_f64);
        rules.insert((CellType::ThirtyTwoBitSigned, CellType::SixtyFourBitReal), i32_to_f64);
        rules.insert((CellType::ThirtyTwoBitReal, CellType::SixtyFourBitReal), f32_to_f64);
        rules
    };
}

/// Look up the rule widening `from` into `to`
pub fn promotion_rule(from: CellType, to: CellType) -> MosaicResult<PromotionRule> {
    PROMOTION_RULES
        .get(&(from, to))
        .copied()
        .ok_or(MosaicError::UnsupportedPromotion { from, to })
}

//! Byte order handling for raw sample data
//!
//! Multi-byte samples travel through the pipeline in big-endian order. This
//! module implements the Strategy pattern for encoding and decoding sample
//! values in either order, and for normalising tiles a store wrote in
//! little-endian order.

use byteorder::{BigEndian, ByteOrder as _, LittleEndian, WriteBytesExt};

use crate::raster::cell_type::CellType;
use crate::raster::errors::{MosaicError, MosaicResult};

/// Byte order of packed samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Least significant byte first
    LittleEndian,
    /// Most significant byte first
    BigEndian,
}

/// Order in which samples are laid out in tile buffers and images
pub const SAMPLE_BYTE_ORDER: ByteOrder = ByteOrder::BigEndian;

impl ByteOrder {
    /// Returns a string representation of this byte order
    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "little",
            ByteOrder::BigEndian => "big",
        }
    }

    /// Parse "little"/"big" as used in dataset configuration
    pub fn from_name(name: &str) -> MosaicResult<Self> {
        match name.trim().to_lowercase().as_str() {
            "little" | "le" | "little_endian" => Ok(ByteOrder::LittleEndian),
            "big" | "be" | "big_endian" => Ok(ByteOrder::BigEndian),
            other => Err(MosaicError::InvalidConfig(format!("Unknown byte order: {}", other))),
        }
    }

    /// Creates the appropriate handler for this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler),
            ByteOrder::BigEndian => Box::new(BigEndianHandler),
        }
    }

    /// Rewrite samples of `bytes_per_sample` bytes from this order into
    /// [`SAMPLE_BYTE_ORDER`]
    pub fn normalize(&self, data: &mut [u8], bytes_per_sample: usize) {
        if *self == SAMPLE_BYTE_ORDER || bytes_per_sample < 2 {
            return;
        }
        for sample in data.chunks_exact_mut(bytes_per_sample) {
            sample.reverse();
        }
    }
}

/// Trait for byte order handling strategies
pub trait ByteOrderHandler: Send + Sync {
    /// Append `value` encoded as one `cell_type` sample
    ///
    /// Sub-byte types are written as a single byte holding the value in its
    /// low bits.
    fn write_sample(&self, cell_type: CellType, value: f64, out: &mut Vec<u8>) -> MosaicResult<()>;

    /// Decode one `cell_type` sample from the start of `bytes`
    fn read_sample(&self, cell_type: CellType, bytes: &[u8]) -> f64;
}

fn check_representable(cell_type: CellType, value: f64) -> MosaicResult<()> {
    if cell_type.can_represent(value) {
        Ok(())
    } else {
        Err(MosaicError::InvalidNoData { cell_type, value })
    }
}

macro_rules! byte_order_handler {
    ($handler:ident, $order:ty) => {
        impl ByteOrderHandler for $handler {
            fn write_sample(&self, cell_type: CellType, value: f64, out: &mut Vec<u8>) -> MosaicResult<()> {
                check_representable(cell_type, value)?;
                match cell_type {
                    CellType::OneBit | CellType::FourBit | CellType::EightBitUnsigned => out.write_u8(value as u8)?,
                    CellType::EightBitSigned => out.write_i8(value as i8)?,
                    CellType::SixteenBitSigned => out.write_i16::<$order>(value as i16)?,
                    CellType::SixteenBitUnsigned => out.write_u16::<$order>(value as u16)?,
                    CellType::ThirtyTwoBitSigned => out.write_i32::<$order>(value as i32)?,
                    CellType::ThirtyTwoBitUnsigned => out.write_u32::<$order>(value as u32)?,
                    CellType::ThirtyTwoBitReal => out.write_f32::<$order>(value as f32)?,
                    CellType::SixtyFourBitReal => out.write_f64::<$order>(value)?,
                }
                Ok(())
            }

            fn read_sample(&self, cell_type: CellType, bytes: &[u8]) -> f64 {
                match cell_type {
                    CellType::OneBit | CellType::FourBit | CellType::EightBitUnsigned => bytes[0] as f64,
                    CellType::EightBitSigned => bytes[0] as i8 as f64,
                    CellType::SixteenBitSigned => <$order>::read_i16(bytes) as f64,
                    CellType::SixteenBitUnsigned => <$order>::read_u16(bytes) as f64,
                    CellType::ThirtyTwoBitSigned => <$order>::read_i32(bytes) as f64,
                    CellType::ThirtyTwoBitUnsigned => <$order>::read_u32(bytes) as f64,
                    CellType::ThirtyTwoBitReal => <$order>::read_f32(bytes) as f64,
                    CellType::SixtyFourBitReal => <$order>::read_f64(bytes),
                }
            }
        }
    };
}

/// Little-endian byte order handler
pub struct LittleEndianHandler;

/// Big-endian byte order handler
pub struct BigEndianHandler;

byte_order_handler!(LittleEndianHandler, LittleEndian);
byte_order_handler!(BigEndianHandler, BigEndian);

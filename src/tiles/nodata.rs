//! No-data stamping for tile buffers
//!
//! A converter knows, per band, the byte pattern of that band's no-data
//! value and writes it over samples a tile's validity bitmask marks as
//! invalid, or over the whole buffer when the store returned nothing for a
//! tile. Validity bits are read MSB-first: bit 7 of byte 0 is sample 0, and a
//! cleared bit means "no data".

use std::collections::HashMap;

use log::debug;

use crate::io::byte_order::SAMPLE_BYTE_ORDER;
use crate::raster::catalog::RasterCatalog;
use crate::raster::cell_type::CellType;
use crate::raster::errors::MosaicResult;

/// True when sample `sample_index` is flagged invalid in `bitmask`
///
/// Samples past the end of the mask are treated as valid.
pub fn bitmask_is_no_data(sample_index: usize, bitmask: &[u8]) -> bool {
    match bitmask.get(sample_index / 8) {
        Some(byte) => (byte >> (7 - (sample_index % 8))) & 1 == 0,
        None => false,
    }
}

/// True when the first `pixel_count` samples are all flagged valid
pub fn bitmask_is_full(bitmask: &[u8], pixel_count: usize) -> bool {
    let full_bytes = pixel_count / 8;
    if bitmask.len() < (pixel_count + 7) / 8 {
        return false;
    }
    if bitmask[..full_bytes].iter().any(|b| *b != 0xFF) {
        return false;
    }
    let remaining = pixel_count % 8;
    if remaining == 0 {
        return true;
    }
    let wanted = 0xFFu8 << (8 - remaining);
    bitmask[full_bytes] & wanted == wanted
}

/// Strategy for writing no-data samples into a tile buffer
pub trait NoDataConverter {
    /// Bit test on the tile's validity mask
    fn is_no_data(&self, sample_index: usize, bitmask: &[u8]) -> bool {
        bitmask_is_no_data(sample_index, bitmask)
    }

    /// Write the band's no-data pattern over one sample
    fn set_no_data(&self, band_id: u64, sample_index: usize, buffer: &mut [u8]);

    /// Samples per tile this converter was built for
    fn pixels_per_tile(&self) -> usize;

    /// Stamp every sample of the tile
    fn set_all(&self, band_id: u64, buffer: &mut [u8]) {
        for sample_index in 0..self.pixels_per_tile() {
            self.set_no_data(band_id, sample_index, buffer);
        }
    }

    /// Stamp only the samples flagged invalid in `bitmask`
    fn set_no_data_masked(&self, band_id: u64, buffer: &mut [u8], bitmask: &[u8]) {
        for sample_index in 0..self.pixels_per_tile() {
            if self.is_no_data(sample_index, bitmask) {
                self.set_no_data(band_id, sample_index, buffer);
            }
        }
    }
}

/// Converter for any cell type, using per-band precomputed byte patterns
pub struct BitmaskNoDataConverter {
    cell_type: CellType,
    pixels_per_tile: usize,
    patterns: HashMap<u64, Vec<u8>>,
}

impl BitmaskNoDataConverter {
    /// `no_data` pairs each band id with its no-data value; bands without
    /// one are filled with zero
    pub fn new(cell_type: CellType, pixels_per_tile: usize, no_data: &[(u64, Option<f64>)]) -> MosaicResult<Self> {
        let handler = SAMPLE_BYTE_ORDER.create_handler();
        let mut patterns = HashMap::with_capacity(no_data.len());
        for (band_id, value) in no_data {
            let mut pattern = Vec::with_capacity(cell_type.bytes_per_sample());
            handler.write_sample(cell_type, value.unwrap_or(0.0), &mut pattern)?;
            patterns.insert(*band_id, pattern);
        }

        Ok(BitmaskNoDataConverter {
            cell_type,
            pixels_per_tile,
            patterns,
        })
    }

    /// Byte pattern stamped for `band_id`
    pub fn pattern(&self, band_id: u64) -> &[u8] {
        self.patterns.get(&band_id).map(|p| p.as_slice()).unwrap_or(&[0])
    }
}

impl NoDataConverter for BitmaskNoDataConverter {
    fn set_no_data(&self, band_id: u64, sample_index: usize, buffer: &mut [u8]) {
        let pattern = self.pattern(band_id);
        let bits = self.cell_type.bits_per_sample();
        let bit_offset = sample_index * bits;
        let offset = bit_offset / 8;

        if self.cell_type.is_sub_byte() {
            // only touch this sample's bits, neighbours share the byte
            let shift = 8 - bits - (bit_offset % 8);
            let mask = (((1u16 << bits) - 1) as u8) << shift;
            buffer[offset] = (buffer[offset] & !mask) | ((pattern[0] << shift) & mask);
        } else {
            buffer[offset..offset + pattern.len()].copy_from_slice(pattern);
        }
    }

    fn pixels_per_tile(&self) -> usize {
        self.pixels_per_tile
    }
}

/// 8-bit unsigned converter that fills whole tiles in one pass
pub struct EightBitNoDataConverter {
    pixels_per_tile: usize,
    values: HashMap<u64, u8>,
}

impl EightBitNoDataConverter {
    pub fn new(pixels_per_tile: usize, no_data: &[(u64, Option<f64>)]) -> MosaicResult<Self> {
        let generic = BitmaskNoDataConverter::new(CellType::EightBitUnsigned, pixels_per_tile, no_data)?;
        let values = no_data
            .iter()
            .map(|(band_id, _)| (*band_id, generic.pattern(*band_id)[0]))
            .collect();
        Ok(EightBitNoDataConverter { pixels_per_tile, values })
    }
}

impl NoDataConverter for EightBitNoDataConverter {
    fn set_no_data(&self, band_id: u64, sample_index: usize, buffer: &mut [u8]) {
        buffer[sample_index] = self.values.get(&band_id).copied().unwrap_or(0);
    }

    fn pixels_per_tile(&self) -> usize {
        self.pixels_per_tile
    }

    fn set_all(&self, band_id: u64, buffer: &mut [u8]) {
        let value = self.values.get(&band_id).copied().unwrap_or(0);
        buffer[..self.pixels_per_tile].fill(value);
    }
}

/// Converter that leaves buffers untouched
///
/// Used under a promoting reader, which stamps no-data itself while widening.
pub struct NoOpConverter {
    pixels_per_tile: usize,
}

impl NoOpConverter {
    pub fn new(pixels_per_tile: usize) -> Self {
        NoOpConverter { pixels_per_tile }
    }
}

impl NoDataConverter for NoOpConverter {
    fn set_no_data(&self, _band_id: u64, _sample_index: usize, _buffer: &mut [u8]) {}

    fn pixels_per_tile(&self) -> usize {
        self.pixels_per_tile
    }

    fn set_all(&self, _band_id: u64, _buffer: &mut [u8]) {}

    fn set_no_data_masked(&self, _band_id: u64, _buffer: &mut [u8], _bitmask: &[u8]) {}
}

/// Build the converter for one raster read as `cell_type`
pub fn create_converter(
    catalog: &dyn RasterCatalog,
    raster_index: usize,
    cell_type: CellType,
    pixels_per_tile: usize,
) -> MosaicResult<Box<dyn NoDataConverter>> {
    let no_data: Vec<(u64, Option<f64>)> = catalog
        .band_ids(raster_index)
        .into_iter()
        .enumerate()
        .map(|(band, band_id)| (band_id, catalog.no_data_value(raster_index, band)))
        .collect();

    debug!("No-data converter for raster {} as {}: {:?}",
           catalog.raster_id(raster_index), cell_type, no_data);

    if cell_type == CellType::EightBitUnsigned {
        Ok(Box::new(EightBitNoDataConverter::new(pixels_per_tile, &no_data)?))
    } else {
        Ok(Box::new(BitmaskNoDataConverter::new(cell_type, pixels_per_tile, &no_data)?))
    }
}

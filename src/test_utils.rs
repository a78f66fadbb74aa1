//! Shared fixtures for unit tests

use crate::coordinate::{CoordinateSystem, Envelope};
use crate::io::byte_order::SAMPLE_BYTE_ORDER;
use crate::raster::{CellType, DatasetInfo, PyramidLevel, RasterCatalog, RasterInfo};
use crate::store::{InMemoryTileStore, StoredTile, TileKey};

/// Raster with one level per `(width, height, envelope)`, finest first
pub fn raster(raster_id: u64, tile: (usize, usize), bands: usize, levels: &[(i64, i64, Envelope)]) -> RasterInfo {
    let mut info = RasterInfo::new(raster_id, tile.0, tile.1, bands);
    for (width, height, envelope) in levels {
        info = info.with_level(PyramidLevel::new(*width, *height, *envelope));
    }
    info
}

/// Dataset in Web Mercator holding `rasters`
pub fn catalog(cell_type: CellType, bands: usize, rasters: Vec<RasterInfo>) -> DatasetInfo {
    let mut catalog = DatasetInfo::new("test", cell_type, bands, CoordinateSystem::WebMercator);
    for raster in rasters {
        catalog.add_raster(raster).unwrap();
    }
    catalog
}

/// Pack `values` as big-endian samples, sub-byte types MSB-first
pub fn encode(cell_type: CellType, values: &[f64]) -> Vec<u8> {
    if cell_type.is_sub_byte() {
        let bits = cell_type.bits_per_sample();
        let mut out = vec![0u8; (values.len() * bits + 7) / 8];
        for (i, value) in values.iter().enumerate() {
            let bit_offset = i * bits;
            out[bit_offset / 8] |= (*value as u8) << (8 - bits - bit_offset % 8);
        }
        return out;
    }

    let handler = SAMPLE_BYTE_ORDER.create_handler();
    let mut out = Vec::with_capacity(values.len() * cell_type.bytes_per_sample());
    for value in values {
        handler.write_sample(cell_type, *value, &mut out).unwrap();
    }
    out
}

/// Store every tile of a level, sample value given by `value(band, x, y)`
/// in tile-grid pixel coordinates
pub fn fill_level(
    store: &mut InMemoryTileStore,
    catalog: &DatasetInfo,
    raster_index: usize,
    level: usize,
    value: impl Fn(usize, i64, i64) -> f64,
) {
    let raster_id = catalog.raster_id(raster_index);
    let (tile_width, tile_height) = catalog.tile_dimension(raster_index);
    let cell_type = catalog.native_cell_type();

    for row in 0..catalog.num_tiles_high(raster_index, level) {
        for column in 0..catalog.num_tiles_wide(raster_index, level) {
            for (band, band_id) in catalog.band_ids(raster_index).into_iter().enumerate() {
                let mut samples = Vec::with_capacity(tile_width * tile_height);
                for py in 0..tile_height as i64 {
                    for px in 0..tile_width as i64 {
                        samples.push(value(band, column * tile_width as i64 + px, row * tile_height as i64 + py));
                    }
                }
                store.insert(
                    TileKey::new(raster_id, level, band_id, column, row),
                    StoredTile::new(encode(cell_type, &samples), tile_width * tile_height),
                );
            }
        }
    }
}

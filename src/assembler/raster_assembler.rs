//! Decoding one raster's tiles into an image
//!
//! The tile byte stream is read to the end into a tile-aligned image, which
//! is then cropped to the planned pixel window. Tiles arrive in store order:
//! row-major tile positions, and for each position every band in turn.

use std::io::{self, Read};

use log::{debug, trace};

use crate::coordinate::GridRange;
use crate::io::TileByteStream;
use crate::planner::QueryInfo;
use crate::raster::catalog::RasterCatalog;
use crate::raster::errors::{MosaicError, MosaicResult};
use crate::tiles::TileReader;

use super::raster_image::RasterImage;
use super::image_ops::crop;

/// Builds per-raster images from tile readers
pub struct RasterImageAssembler<'a> {
    catalog: &'a dyn RasterCatalog,
}

impl<'a> RasterImageAssembler<'a> {
    /// Creates an assembler reading image metadata from `catalog`
    pub fn new(catalog: &'a dyn RasterCatalog) -> Self {
        RasterImageAssembler { catalog }
    }

    /// Read every tile of `reader` and crop to the query's pixel window
    ///
    /// The reader is consumed; it is disposed when the stream over it is
    /// dropped, whether decoding succeeded or not.
    ///
    /// # Arguments
    /// * `reader` - Reader over the query's matching tiles
    /// * `query` - Fitted query of the raster being read
    ///
    /// # Returns
    /// The image of the query's pixel window, positioned at its origin in
    /// the level grid, or the error that stopped the tile stream
    pub fn assemble(&self, reader: Box<dyn TileReader>, query: &QueryInfo) -> MosaicResult<RasterImage> {
        let tiled = self.decode_tiles(reader, query)?;

        let full = GridRange::new(0, 0, tiled.width as i64, tiled.height as i64);
        if query.window_in_tiled_image == full {
            debug!("Raster {} tile-aligned image matches the window, no crop", query.raster_id);
            return Ok(tiled);
        }

        debug!("Cropping raster {} image {}x{} to {}",
               query.raster_id, tiled.width, tiled.height, query.window_in_tiled_image);
        crop(&tiled, &query.window_in_tiled_image)
    }

    fn decode_tiles(&self, reader: Box<dyn TileReader>, query: &QueryInfo) -> MosaicResult<RasterImage> {
        let tile_range = reader.tile_range();
        let tile_width = reader.tile_width();
        let tile_height = reader.tile_height();
        let bands = reader.num_bands();
        let cell_type = reader.cell_type();
        let bytes_per_tile = reader.bytes_per_tile();
        let tiles_wide = tile_range.width.max(0) as usize;
        let tiles_high = tile_range.height.max(0) as usize;

        let no_data = (0..bands)
            .map(|band| self.catalog.no_data_value(query.raster_index, band))
            .collect();
        let mut image = RasterImage::new(tiles_wide * tile_width, tiles_high * tile_height, bands, cell_type)
            .with_origin(query.tiled_image_range.x, query.tiled_image_range.y)
            .with_color_map(self.catalog.color_map(query.raster_index).cloned())
            .with_no_data(no_data);

        let mut stream = TileByteStream::new(reader);
        let mut tile = vec![0u8; bytes_per_tile];

        for position in 0..tiles_wide * tiles_high {
            let tile_x = position % tiles_wide;
            let tile_y = position / tiles_wide;
            for band in 0..bands {
                stream.read_exact(&mut tile).map_err(|e| match e.kind() {
                    io::ErrorKind::UnexpectedEof => MosaicError::store(
                        query.raster_id,
                        tile_range.x + tile_x as i64,
                        tile_range.y + tile_y as i64,
                        format!("tile stream ended before band {}", band),
                    ),
                    _ => MosaicError::from(e),
                })?;
                trace!("Raster {} tile ({},{}) band {} decoded",
                       query.raster_id, tile_x, tile_y, band);
                write_tile(&mut image, &tile, (tile_x * tile_width, tile_y * tile_height),
                           (tile_width, tile_height), band);
            }
        }

        debug!("Raster {} decoded {} tiles into {}x{} image at ({}, {})",
               query.raster_id, stream.tiles_read(), image.width, image.height, image.x, image.y);
        Ok(image)
    }
}

/// Unpack one band of one tile into the interleaved image
fn write_tile(
    image: &mut RasterImage,
    tile: &[u8],
    (origin_x, origin_y): (usize, usize),
    (tile_width, tile_height): (usize, usize),
    band: usize,
) {
    let cell_type = image.cell_type;
    let sample_size = image.sample_size();
    let band_offset = band * sample_size;
    let bits = cell_type.bits_per_sample();

    for row in 0..tile_height {
        for col in 0..tile_width {
            let sample_index = row * tile_width + col;
            let pixel = image.pixel_mut(origin_x + col, origin_y + row);
            if cell_type.is_sub_byte() {
                let bit_offset = sample_index * bits;
                let shift = 8 - bits - (bit_offset % 8);
                let mask = ((1u16 << bits) - 1) as u8;
                pixel[band_offset] = (tile[bit_offset / 8] >> shift) & mask;
            } else {
                let start = sample_index * sample_size;
                pixel[band_offset..band_offset + sample_size].copy_from_slice(&tile[start..start + sample_size]);
            }
        }
    }
}

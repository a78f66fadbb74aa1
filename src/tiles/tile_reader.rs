//! Forward-only readers over the tiles of one raster
//!
//! A reader walks a rectangle of tiles at one pyramid level and hands out
//! each tile's packed samples in store order. Two variants exist: the
//! native reader drives a store cursor directly; the promoting reader wraps
//! a native reader and widens samples to the raster's target cell type.
//! [`TileReaderFactory`] picks between them once, at construction.

use log::{debug, warn};

use crate::coordinate::GridRange;
use crate::raster::catalog::RasterCatalog;
use crate::raster::cell_type::CellType;
use crate::raster::errors::{MosaicError, MosaicResult};
use crate::store::{RawTile, TileCursor, TileQuery, TileStore};

use super::nodata::{bitmask_is_full, create_converter, NoDataConverter, NoOpConverter};
use super::promotion::{promotion_rule, PromotionRule};

/// Per-tile record returned alongside the sample bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileInfo {
    pub band_id: u64,
    pub column: i64,
    pub row: i64,
    /// Validity bitmask as returned by the store; empty means fully valid
    pub bitmask: Vec<u8>,
    /// Pixels the store returned; 0 for a missing tile
    pub pixel_count: usize,
}

impl TileInfo {
    fn from_raw(tile: &RawTile) -> Self {
        TileInfo {
            band_id: tile.band_id,
            column: tile.column,
            row: tile.row,
            bitmask: tile.bitmask.clone(),
            pixel_count: tile.pixel_count,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.pixel_count == 0
    }
}

/// Bytes needed for one tile of `pixels` samples at `bits_per_sample`
pub fn bytes_per_tile(pixels: usize, bits_per_sample: usize) -> usize {
    (pixels * bits_per_sample + 7) / 8
}

/// Capability shared by all tile reader variants
pub trait TileReader {
    /// Fetches the first tile lazily; true while a tile is pending
    fn has_next(&mut self) -> MosaicResult<bool>;

    /// Write the pending tile's samples into `buffer`
    ///
    /// Fails with a protocol error when no tile is pending.
    fn next(&mut self, buffer: &mut [u8]) -> MosaicResult<TileInfo>;

    fn raster_id(&self) -> u64;

    fn tile_width(&self) -> usize;

    fn tile_height(&self) -> usize;

    fn num_bands(&self) -> usize;

    /// Rectangle of tile indices being read
    fn tile_range(&self) -> GridRange;

    fn cell_type(&self) -> CellType;

    fn pixels_per_tile(&self) -> usize {
        self.tile_width() * self.tile_height()
    }

    fn bits_per_sample(&self) -> usize {
        self.cell_type().bits_per_sample()
    }

    fn bytes_per_tile(&self) -> usize {
        bytes_per_tile(self.pixels_per_tile(), self.bits_per_sample())
    }

    /// Release the store cursor. Further reads fail.
    fn dispose(&mut self);
}

enum ReaderState {
    NotStarted,
    Pending(RawTile),
    AwaitingFetch,
    Exhausted,
    Disposed,
}

/// Reader that pulls tiles straight from a store cursor
pub struct NativeTileReader {
    cursor: Box<dyn TileCursor>,
    converter: Box<dyn NoDataConverter>,
    state: ReaderState,
    raster_id: u64,
    cell_type: CellType,
    tile_width: usize,
    tile_height: usize,
    num_bands: usize,
    tile_range: GridRange,
}

impl NativeTileReader {
    /// Creates a reader over an open store cursor
    ///
    /// # Arguments
    /// * `cursor` - Cursor yielding the tiles in store order; released on dispose
    /// * `converter` - No-data stamping for missing tiles and masked samples
    /// * `raster_id` - Raster being read, for logs and errors
    /// * `cell_type` - Cell type of the stored samples
    /// * `tile_dimension` - Tile width and height in pixels
    /// * `num_bands` - Bands returned per tile position
    /// * `tile_range` - Rectangle of tile indices covered by the cursor
    pub fn new(
        cursor: Box<dyn TileCursor>,
        converter: Box<dyn NoDataConverter>,
        raster_id: u64,
        cell_type: CellType,
        tile_dimension: (usize, usize),
        num_bands: usize,
        tile_range: GridRange,
    ) -> Self {
        NativeTileReader {
            cursor,
            converter,
            state: ReaderState::NotStarted,
            raster_id,
            cell_type,
            tile_width: tile_dimension.0,
            tile_height: tile_dimension.1,
            num_bands,
            tile_range,
        }
    }

    fn fetch(&mut self) -> MosaicResult<()> {
        self.state = match self.cursor.fetch()? {
            Some(tile) => ReaderState::Pending(tile),
            None => {
                debug!("Tile cursor of raster {} exhausted", self.raster_id);
                ReaderState::Exhausted
            }
        };
        Ok(())
    }
}

impl TileReader for NativeTileReader {
    fn has_next(&mut self) -> MosaicResult<bool> {
        if matches!(self.state, ReaderState::NotStarted | ReaderState::AwaitingFetch) {
            self.fetch()?;
        }
        match self.state {
            ReaderState::Pending(_) => Ok(true),
            ReaderState::Disposed => Err(MosaicError::ReaderDisposed),
            _ => Ok(false),
        }
    }

    fn next(&mut self, buffer: &mut [u8]) -> MosaicResult<TileInfo> {
        let tile = match std::mem::replace(&mut self.state, ReaderState::AwaitingFetch) {
            ReaderState::Pending(tile) => tile,
            ReaderState::Disposed => {
                self.state = ReaderState::Disposed;
                return Err(MosaicError::ReaderDisposed);
            }
            other => {
                self.state = other;
                return Err(MosaicError::NoPendingTile);
            }
        };

        let bytes_per_tile = self.bytes_per_tile();
        let pixels_per_tile = self.pixels_per_tile();
        if buffer.len() < bytes_per_tile {
            return Err(MosaicError::GenericError(format!(
                "Tile buffer holds {} bytes, {} needed", buffer.len(), bytes_per_tile
            )));
        }

        if tile.pixel_count == 0 {
            self.converter.set_all(tile.band_id, buffer);
            return Ok(TileInfo::from_raw(&tile));
        }
        if tile.pixel_count != pixels_per_tile {
            return Err(MosaicError::PixelCountMismatch {
                expected: pixels_per_tile,
                actual: tile.pixel_count,
            });
        }
        if tile.data.len() < bytes_per_tile {
            return Err(MosaicError::store(
                self.raster_id,
                tile.column,
                tile.row,
                format!("tile holds {} bytes, {} expected", tile.data.len(), bytes_per_tile),
            ));
        }

        buffer[..bytes_per_tile].copy_from_slice(&tile.data[..bytes_per_tile]);
        if !tile.bitmask.is_empty() && !bitmask_is_full(&tile.bitmask, pixels_per_tile) {
            self.converter.set_no_data_masked(tile.band_id, buffer, &tile.bitmask);
        }

        Ok(TileInfo::from_raw(&tile))
    }

    fn raster_id(&self) -> u64 {
        self.raster_id
    }

    fn tile_width(&self) -> usize {
        self.tile_width
    }

    fn tile_height(&self) -> usize {
        self.tile_height
    }

    fn num_bands(&self) -> usize {
        self.num_bands
    }

    fn tile_range(&self) -> GridRange {
        self.tile_range
    }

    fn cell_type(&self) -> CellType {
        self.cell_type
    }

    fn dispose(&mut self) {
        if matches!(self.state, ReaderState::Disposed) {
            return;
        }
        self.state = ReaderState::Disposed;
        if let Err(e) = self.cursor.dispose() {
            warn!("Failed to release tile cursor of raster {}: {}", self.raster_id, e);
        }
    }
}

impl Drop for NativeTileReader {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Reader that widens native samples to the raster's target cell type
///
/// The wrapped native reader runs with a no-op converter; no-data is
/// stamped here, in the target depth, for missing tiles and for samples the
/// bitmask flags invalid.
pub struct PromotingTileReader {
    native: NativeTileReader,
    scratch: Vec<u8>,
    rule: PromotionRule,
    target_cell_type: CellType,
    target_converter: Box<dyn NoDataConverter>,
}

impl PromotingTileReader {
    /// Wraps `native` so samples come out as `target_cell_type`
    ///
    /// # Arguments
    /// * `native` - Reader of native samples, built with a no-op converter
    /// * `target_cell_type` - Cell type handed to callers
    /// * `target_converter` - No-data stamping in the target cell type
    ///
    /// # Returns
    /// The reader, or `UnsupportedPromotion` for a pair without a rule
    pub fn new(
        native: NativeTileReader,
        target_cell_type: CellType,
        target_converter: Box<dyn NoDataConverter>,
    ) -> MosaicResult<Self> {
        let rule = promotion_rule(native.cell_type(), target_cell_type)?;
        let scratch = vec![0u8; native.bytes_per_tile()];
        Ok(PromotingTileReader {
            native,
            scratch,
            rule,
            target_cell_type,
            target_converter,
        })
    }
}

impl TileReader for PromotingTileReader {
    fn has_next(&mut self) -> MosaicResult<bool> {
        self.native.has_next()
    }

    fn next(&mut self, buffer: &mut [u8]) -> MosaicResult<TileInfo> {
        let bytes_per_tile = self.bytes_per_tile();
        if buffer.len() < bytes_per_tile {
            return Err(MosaicError::GenericError(format!(
                "Tile buffer holds {} bytes, {} needed", buffer.len(), bytes_per_tile
            )));
        }

        let info = self.native.next(&mut self.scratch)?;
        if info.is_missing() {
            self.target_converter.set_all(info.band_id, buffer);
            return Ok(info);
        }

        let check_mask = !info.bitmask.is_empty() && !bitmask_is_full(&info.bitmask, info.pixel_count);
        for sample_index in 0..self.pixels_per_tile() {
            if check_mask && self.target_converter.is_no_data(sample_index, &info.bitmask) {
                self.target_converter.set_no_data(info.band_id, sample_index, buffer);
            } else {
                (self.rule)(&self.scratch, sample_index, buffer);
            }
        }
        Ok(info)
    }

    fn raster_id(&self) -> u64 {
        self.native.raster_id()
    }

    fn tile_width(&self) -> usize {
        self.native.tile_width()
    }

    fn tile_height(&self) -> usize {
        self.native.tile_height()
    }

    fn num_bands(&self) -> usize {
        self.native.num_bands()
    }

    fn tile_range(&self) -> GridRange {
        self.native.tile_range()
    }

    fn cell_type(&self) -> CellType {
        self.target_cell_type
    }

    fn dispose(&mut self) {
        self.native.dispose();
    }
}

/// Chooses and builds the reader variant for one raster
pub struct TileReaderFactory;

impl TileReaderFactory {
    /// Open a store cursor over `tile_range` and wrap it in a reader that
    /// yields samples in the raster's target cell type
    ///
    /// A plain native reader is built when the native and target cell
    /// types agree; otherwise a promoting reader wraps a native reader whose
    /// no-data handling is switched off.
    ///
    /// # Arguments
    /// * `store` - Store holding the raster's tiles
    /// * `catalog` - Metadata of the dataset
    /// * `raster_index` - Index of the raster in `catalog`
    /// * `pyramid_level` - Level to read, 0 being the finest
    /// * `tile_range` - Rectangle of tile indices to read
    ///
    /// # Returns
    /// The reader, or a configuration error for an unsupported promotion or
    /// an unencodable no-data value. No cursor stays open on failure.
    pub fn create(
        store: &dyn TileStore,
        catalog: &dyn RasterCatalog,
        raster_index: usize,
        pyramid_level: usize,
        tile_range: GridRange,
    ) -> MosaicResult<Box<dyn TileReader>> {
        let raster_id = catalog.raster_id(raster_index);
        let native_type = catalog.native_cell_type();
        let target_type = catalog.target_cell_type(raster_index);
        let tile_dimension = catalog.tile_dimension(raster_index);
        let pixels_per_tile = tile_dimension.0 * tile_dimension.1;
        let num_bands = catalog.num_bands();

        // everything that can fail on metadata runs before a cursor is opened
        if native_type != target_type {
            promotion_rule(native_type, target_type)?;
        }
        let converter = create_converter(catalog, raster_index, target_type, pixels_per_tile)?;

        let query = TileQuery::new(raster_id, pyramid_level, tile_range, catalog.band_ids(raster_index));
        let cursor = store.open_cursor(&query)?;

        if native_type == target_type {
            debug!("Native tile reader for raster {} ({})", raster_id, native_type);
            let reader = NativeTileReader::new(
                cursor, converter, raster_id, native_type, tile_dimension, num_bands, tile_range,
            );
            return Ok(Box::new(reader));
        }

        debug!("Promoting tile reader for raster {} ({} -> {})", raster_id, native_type, target_type);
        let native = NativeTileReader::new(
            cursor,
            Box::new(NoOpConverter::new(pixels_per_tile)),
            raster_id,
            native_type,
            tile_dimension,
            num_bands,
            tile_range,
        );
        Ok(Box::new(PromotingTileReader::new(native, target_type, converter)?))
    }
}

//! Backing store interface
//!
//! The store hands out raw tiles for one raster, one pyramid level and a
//! rectangle of tile indices. Tiles come back in row-major order and, within
//! one tile position, in the order of the requested band ids. A tile the
//! store has no data for is still reported, with a pixel count of zero.

use crate::coordinate::GridRange;
use crate::raster::errors::MosaicResult;

/// Immutable description of a tile fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileQuery {
    pub raster_id: u64,
    pub pyramid_level: usize,
    /// Rectangle in tile index space, end exclusive
    pub tile_range: GridRange,
    /// Bands to return, in output order
    pub band_ids: Vec<u64>,
}

impl TileQuery {
    /// Creates a query for every band of `tile_range` at one level
    ///
    /// # Arguments
    /// * `raster_id` - Raster to read
    /// * `pyramid_level` - Level to read, 0 being the finest
    /// * `tile_range` - Rectangle of tile indices
    /// * `band_ids` - Store-side band identifiers, in output band order
    pub fn new(raster_id: u64, pyramid_level: usize, tile_range: GridRange, band_ids: Vec<u64>) -> Self {
        TileQuery {
            raster_id,
            pyramid_level,
            tile_range,
            band_ids,
        }
    }

    /// Every (band, column, row) the cursor must yield, in store order
    pub fn tile_positions(&self) -> Vec<(u64, i64, i64)> {
        let range = &self.tile_range;
        let mut positions = Vec::with_capacity(range.area() as usize * self.band_ids.len());
        for row in range.y..range.end_y() {
            for column in range.x..range.end_x() {
                for band_id in &self.band_ids {
                    positions.push((*band_id, column, row));
                }
            }
        }
        positions
    }
}

/// One tile as returned by the store
#[derive(Debug, Clone, Default)]
pub struct RawTile {
    pub band_id: u64,
    pub column: i64,
    pub row: i64,
    /// Pixels the store actually returned; 0 means the tile is missing
    pub pixel_count: usize,
    /// Validity bits, MSB-first, set bit = valid sample; empty = all valid
    pub bitmask: Vec<u8>,
    /// Packed sample bytes
    pub data: Vec<u8>,
}

impl RawTile {
    /// A tile the store holds no data for
    pub fn missing(band_id: u64, column: i64, row: i64) -> Self {
        RawTile {
            band_id,
            column,
            row,
            ..Default::default()
        }
    }
}

/// Forward-only cursor over the tiles of one [`TileQuery`]
pub trait TileCursor {
    /// Next tile, or `None` once the query is exhausted
    fn fetch(&mut self) -> MosaicResult<Option<RawTile>>;

    /// Release store-side resources. Must be safe to call more than once.
    fn dispose(&mut self) -> MosaicResult<()>;
}

/// Source of raw tiles
pub trait TileStore {
    fn open_cursor(&self, query: &TileQuery) -> MosaicResult<Box<dyn TileCursor>>;
}

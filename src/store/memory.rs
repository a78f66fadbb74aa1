//! In-memory tile store
//!
//! Holds tiles in a shared map. Cursors snapshot the map through an `Arc`,
//! so a store can be read while cursors from earlier reads are still alive.
//! The store counts cursors that were opened but not yet disposed, and can
//! be told to fail on a given tile, which makes it the workhorse of the
//! pipeline tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::debug;

use crate::raster::errors::{MosaicError, MosaicResult};

use super::tile_store::{RawTile, TileCursor, TileQuery, TileStore};

/// Address of one stored tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKey {
    pub raster_id: u64,
    pub pyramid_level: usize,
    pub band_id: u64,
    pub column: i64,
    pub row: i64,
}

impl TileKey {
    pub fn new(raster_id: u64, pyramid_level: usize, band_id: u64, column: i64, row: i64) -> Self {
        TileKey {
            raster_id,
            pyramid_level,
            band_id,
            column,
            row,
        }
    }
}

/// Payload of one stored tile
#[derive(Debug, Clone)]
pub struct StoredTile {
    pub data: Vec<u8>,
    pub bitmask: Vec<u8>,
    pub pixel_count: usize,
}

impl StoredTile {
    /// A fully valid tile of `pixel_count` pixels
    pub fn new(data: Vec<u8>, pixel_count: usize) -> Self {
        StoredTile {
            data,
            bitmask: Vec::new(),
            pixel_count,
        }
    }

    /// Attach a validity bitmask (MSB-first, set bit = valid)
    pub fn with_bitmask(mut self, bitmask: Vec<u8>) -> Self {
        self.bitmask = bitmask;
        self
    }
}

/// Tile store backed by a hash map
#[derive(Default)]
pub struct InMemoryTileStore {
    tiles: Arc<HashMap<TileKey, StoredTile>>,
    failing: Arc<HashSet<TileKey>>,
    open_cursors: Arc<AtomicUsize>,
}

impl InMemoryTileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a tile
    pub fn insert(&mut self, key: TileKey, tile: StoredTile) {
        Arc::make_mut(&mut self.tiles).insert(key, tile);
    }

    /// Make every fetch of `key` fail with a store error
    pub fn fail_on(&mut self, key: TileKey) {
        Arc::make_mut(&mut self.failing).insert(key);
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Cursors opened and not yet disposed
    pub fn open_cursor_count(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }
}

impl TileStore for InMemoryTileStore {
    fn open_cursor(&self, query: &TileQuery) -> MosaicResult<Box<dyn TileCursor>> {
        debug!("Opening in-memory cursor for raster {} level {} tiles {}",
               query.raster_id, query.pyramid_level, query.tile_range);

        self.open_cursors.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(InMemoryCursor {
            tiles: Arc::clone(&self.tiles),
            failing: Arc::clone(&self.failing),
            open_cursors: Arc::clone(&self.open_cursors),
            raster_id: query.raster_id,
            pyramid_level: query.pyramid_level,
            positions: query.tile_positions(),
            next_position: 0,
            disposed: false,
        }))
    }
}

struct InMemoryCursor {
    tiles: Arc<HashMap<TileKey, StoredTile>>,
    failing: Arc<HashSet<TileKey>>,
    open_cursors: Arc<AtomicUsize>,
    raster_id: u64,
    pyramid_level: usize,
    positions: Vec<(u64, i64, i64)>,
    next_position: usize,
    disposed: bool,
}

impl TileCursor for InMemoryCursor {
    fn fetch(&mut self) -> MosaicResult<Option<RawTile>> {
        if self.disposed {
            return Err(MosaicError::ReaderDisposed);
        }
        let Some(&(band_id, column, row)) = self.positions.get(self.next_position) else {
            return Ok(None);
        };
        self.next_position += 1;

        let key = TileKey::new(self.raster_id, self.pyramid_level, band_id, column, row);
        if self.failing.contains(&key) {
            return Err(MosaicError::store(self.raster_id, column, row, "injected store failure"));
        }

        Ok(Some(match self.tiles.get(&key) {
            Some(stored) => RawTile {
                band_id,
                column,
                row,
                pixel_count: stored.pixel_count,
                bitmask: stored.bitmask.clone(),
                data: stored.data.clone(),
            },
            None => RawTile::missing(band_id, column, row),
        }))
    }

    fn dispose(&mut self) -> MosaicResult<()> {
        if !self.disposed {
            self.disposed = true;
            self.open_cursors.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

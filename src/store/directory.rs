//! File-backed tile store
//!
//! Each raster owns a directory laid out as
//! `<root>/L<level>/B<band>/<row>_<column>.tile`, with an optional
//! uncompressed validity bitmask next to it as `<row>_<column>.mask`.
//! A tile file that does not exist is reported as a missing tile.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, warn};

use crate::io::byte_order::ByteOrder;
use crate::raster::errors::{MosaicError, MosaicResult};

use super::compression::{CompressionFactory, CompressionHandler};
use super::tile_store::{RawTile, TileCursor, TileQuery, TileStore};

/// Where and how one raster's tiles are stored
pub struct RasterTileDirectory {
    pub root: PathBuf,
    pub compression: Arc<dyn CompressionHandler>,
    pub byte_order: ByteOrder,
    pub bytes_per_sample: usize,
    pub pixels_per_tile: usize,
}

impl RasterTileDirectory {
    pub fn new(root: impl Into<PathBuf>, compression: &str, pixels_per_tile: usize) -> MosaicResult<Self> {
        Ok(RasterTileDirectory {
            root: root.into(),
            compression: Arc::from(CompressionFactory::get_handler_by_name(compression)?),
            byte_order: ByteOrder::BigEndian,
            bytes_per_sample: 1,
            pixels_per_tile,
        })
    }

    /// Samples on disk use `byte_order` with `bytes_per_sample` bytes each
    pub fn with_byte_order(mut self, byte_order: ByteOrder, bytes_per_sample: usize) -> Self {
        self.byte_order = byte_order;
        self.bytes_per_sample = bytes_per_sample;
        self
    }

    fn tile_path(&self, level: usize, band_id: u64, column: i64, row: i64, extension: &str) -> PathBuf {
        self.root
            .join(format!("L{}", level))
            .join(format!("B{}", band_id))
            .join(format!("{}_{}.{}", row, column, extension))
    }

    /// Write a tile (and optional bitmask), compressing it on the way
    pub fn write_tile(
        &self,
        level: usize,
        band_id: u64,
        column: i64,
        row: i64,
        data: &[u8],
        bitmask: Option<&[u8]>,
    ) -> MosaicResult<()> {
        let path = self.tile_path(level, band_id, column, row, "tile");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, self.compression.compress(data)?)?;
        if let Some(mask) = bitmask {
            fs::write(self.tile_path(level, band_id, column, row, "mask"), mask)?;
        }
        Ok(())
    }

    fn read_tile(&self, level: usize, band_id: u64, column: i64, row: i64) -> io::Result<Option<RawTile>> {
        let path = self.tile_path(level, band_id, column, row, "tile");
        let compressed = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        let mut data = self
            .compression
            .decompress(&compressed)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        self.byte_order.normalize(&mut data, self.bytes_per_sample);

        let bitmask = match fs::read(self.tile_path(level, band_id, column, row, "mask")) {
            Ok(mask) => mask,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e),
        };

        Ok(Some(RawTile {
            band_id,
            column,
            row,
            pixel_count: self.pixels_per_tile,
            bitmask,
            data,
        }))
    }
}

/// Tile store over one directory per raster
#[derive(Default)]
pub struct DirectoryTileStore {
    rasters: HashMap<u64, Arc<RasterTileDirectory>>,
}

impl DirectoryTileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_raster(&mut self, raster_id: u64, directory: RasterTileDirectory) {
        self.rasters.insert(raster_id, Arc::new(directory));
    }

    pub fn raster_directory(&self, raster_id: u64) -> Option<&RasterTileDirectory> {
        self.rasters.get(&raster_id).map(|d| d.as_ref())
    }

    pub fn root_of(&self, raster_id: u64) -> Option<&Path> {
        self.rasters.get(&raster_id).map(|d| d.root.as_path())
    }
}

impl TileStore for DirectoryTileStore {
    fn open_cursor(&self, query: &TileQuery) -> MosaicResult<Box<dyn TileCursor>> {
        let directory = self.rasters.get(&query.raster_id).ok_or_else(|| {
            MosaicError::store(query.raster_id, query.tile_range.x, query.tile_range.y,
                               "raster has no tile directory")
        })?;

        if !directory.root.is_dir() {
            warn!("Tile directory {} does not exist, every tile will be missing",
                  directory.root.display());
        }
        debug!("Opening directory cursor on {} for level {} tiles {}",
               directory.root.display(), query.pyramid_level, query.tile_range);

        Ok(Box::new(DirectoryCursor {
            directory: Arc::clone(directory),
            raster_id: query.raster_id,
            pyramid_level: query.pyramid_level,
            positions: query.tile_positions().into_iter(),
        }))
    }
}

struct DirectoryCursor {
    directory: Arc<RasterTileDirectory>,
    raster_id: u64,
    pyramid_level: usize,
    positions: std::vec::IntoIter<(u64, i64, i64)>,
}

impl TileCursor for DirectoryCursor {
    fn fetch(&mut self) -> MosaicResult<Option<RawTile>> {
        let Some((band_id, column, row)) = self.positions.next() else {
            return Ok(None);
        };

        match self.directory.read_tile(self.pyramid_level, band_id, column, row) {
            Ok(Some(tile)) => Ok(Some(tile)),
            Ok(None) => Ok(Some(RawTile::missing(band_id, column, row))),
            Err(e) => Err(MosaicError::store(self.raster_id, column, row, e.to_string())),
        }
    }

    fn dispose(&mut self) -> MosaicResult<()> {
        // drain so a disposed cursor reports exhaustion
        self.positions = Vec::new().into_iter();
        Ok(())
    }
}

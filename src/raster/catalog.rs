//! Raster dataset metadata
//!
//! [`RasterCatalog`] is the read-only view the pipeline needs of a dataset:
//! for every raster, its pyramid levels (grid range and envelope per level),
//! tile size, bands, cell types and no-data values. [`DatasetInfo`] is the
//! in-memory implementation used by configuration files and tests.

use log::debug;

use crate::coordinate::{CoordinateSystem, Envelope, GridRange};
use crate::raster::cell_type::{determine_target_cell_type, CellType};
use crate::raster::colormap::ColorMap;
use crate::raster::errors::{MosaicError, MosaicResult};

/// Metadata interface consumed by the planners and tile readers
pub trait RasterCatalog {
    fn num_rasters(&self) -> usize;

    fn raster_id(&self, raster_index: usize) -> u64;

    fn num_pyramid_levels(&self, raster_index: usize) -> usize;

    /// Pixel rectangle of a level, in the level's tile-grid pixel space
    fn grid_range(&self, raster_index: usize, level: usize) -> GridRange;

    fn grid_envelope(&self, raster_index: usize, level: usize) -> Envelope;

    /// Tile width and height in pixels
    fn tile_dimension(&self, raster_index: usize) -> (usize, usize);

    fn num_tiles_wide(&self, raster_index: usize, level: usize) -> i64 {
        let (tile_width, _) = self.tile_dimension(raster_index);
        let grid = self.grid_range(raster_index, level);
        div_ceil(grid.end_x(), tile_width as i64)
    }

    fn num_tiles_high(&self, raster_index: usize, level: usize) -> i64 {
        let (_, tile_height) = self.tile_dimension(raster_index);
        let grid = self.grid_range(raster_index, level);
        div_ceil(grid.end_y(), tile_height as i64)
    }

    /// Pixel position of the level's data within its tile grid
    fn tile_offset(&self, raster_index: usize, level: usize) -> (i64, i64) {
        let grid = self.grid_range(raster_index, level);
        (grid.x, grid.y)
    }

    fn native_cell_type(&self) -> CellType;

    fn target_cell_type(&self, raster_index: usize) -> CellType;

    fn num_bands(&self) -> usize;

    /// Store-side band identifiers, in output band order
    fn band_ids(&self, raster_index: usize) -> Vec<u64>;

    fn no_data_value(&self, raster_index: usize, band: usize) -> Option<f64>;

    fn is_color_mapped(&self) -> bool;

    fn color_map(&self, raster_index: usize) -> Option<&ColorMap>;

    fn crs(&self) -> CoordinateSystem;
}

pub(crate) fn div_ceil(value: i64, divisor: i64) -> i64 {
    -((-value).div_euclid(divisor))
}

/// One pyramid level of a raster
#[derive(Debug, Clone, PartialEq)]
pub struct PyramidLevel {
    pub width: i64,
    pub height: i64,
    /// Offset of pixel (0,0) inside the level's tile grid
    pub offset_x: i64,
    pub offset_y: i64,
    pub envelope: Envelope,
}

impl PyramidLevel {
    pub fn new(width: i64, height: i64, envelope: Envelope) -> Self {
        PyramidLevel {
            width,
            height,
            offset_x: 0,
            offset_y: 0,
            envelope,
        }
    }

    pub fn with_offset(mut self, offset_x: i64, offset_y: i64) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }

    pub fn grid_range(&self) -> GridRange {
        GridRange::new(self.offset_x, self.offset_y, self.width, self.height)
    }

    /// Model units per pixel along X and Y
    pub fn resolution(&self) -> (f64, f64) {
        (
            self.envelope.width() / self.width as f64,
            self.envelope.height() / self.height as f64,
        )
    }
}

/// Metadata of one raster in a dataset
#[derive(Debug, Clone)]
pub struct RasterInfo {
    pub raster_id: u64,
    pub tile_width: usize,
    pub tile_height: usize,
    /// Finest level first
    pub levels: Vec<PyramidLevel>,
    pub band_ids: Vec<u64>,
    /// Per band; `None` for bands without a no-data value
    pub no_data: Vec<Option<f64>>,
    pub target_cell_type: CellType,
    pub color_map: Option<ColorMap>,
}

impl RasterInfo {
    /// Raster with bands numbered from 1 and no no-data values
    pub fn new(raster_id: u64, tile_width: usize, tile_height: usize, num_bands: usize) -> Self {
        RasterInfo {
            raster_id,
            tile_width,
            tile_height,
            levels: Vec::new(),
            band_ids: (1..=num_bands as u64).collect(),
            no_data: vec![None; num_bands],
            target_cell_type: CellType::EightBitUnsigned,
            color_map: None,
        }
    }

    pub fn with_level(mut self, level: PyramidLevel) -> Self {
        self.levels.push(level);
        self
    }

    pub fn with_no_data(mut self, no_data: Vec<Option<f64>>) -> Self {
        self.no_data = no_data;
        self
    }

    pub fn with_band_ids(mut self, band_ids: Vec<u64>) -> Self {
        self.band_ids = band_ids;
        self
    }

    pub fn with_color_map(mut self, color_map: ColorMap) -> Self {
        self.color_map = Some(color_map);
        self
    }
}

/// In-memory catalog of a tiled pyramid dataset
#[derive(Debug, Clone)]
pub struct DatasetInfo {
    pub name: String,
    pub native_cell_type: CellType,
    pub num_bands: usize,
    pub crs: CoordinateSystem,
    pub color_mapped: bool,
    rasters: Vec<RasterInfo>,
}

impl DatasetInfo {
    pub fn new(name: &str, native_cell_type: CellType, num_bands: usize, crs: CoordinateSystem) -> Self {
        DatasetInfo {
            name: name.to_string(),
            native_cell_type,
            num_bands,
            crs,
            color_mapped: false,
            rasters: Vec::new(),
        }
    }

    /// Validate and add a raster, computing its target cell type
    pub fn add_raster(&mut self, mut raster: RasterInfo) -> MosaicResult<()> {
        validate_raster(&raster, self.num_bands)?;

        let no_data: Vec<f64> = raster.no_data.iter().flatten().copied().collect();
        raster.target_cell_type = determine_target_cell_type(self.native_cell_type, &no_data)?;
        if raster.color_map.is_some() {
            self.color_mapped = true;
        }

        debug!("Raster {} in {}: {} levels, {}x{} tiles, target cell type {}",
               raster.raster_id, self.name, raster.levels.len(),
               raster.tile_width, raster.tile_height, raster.target_cell_type);

        self.rasters.push(raster);
        Ok(())
    }

    pub fn rasters(&self) -> &[RasterInfo] {
        &self.rasters
    }

    fn raster(&self, raster_index: usize) -> &RasterInfo {
        &self.rasters[raster_index]
    }
}

fn validate_raster(raster: &RasterInfo, num_bands: usize) -> MosaicResult<()> {
    let fail = |msg: String| Err(MosaicError::InvalidConfig(format!("raster {}: {}", raster.raster_id, msg)));

    if raster.tile_width == 0 || raster.tile_height == 0 {
        return fail("tile dimension must be positive".to_string());
    }
    if raster.levels.is_empty() {
        return fail("at least one pyramid level is required".to_string());
    }
    if raster.band_ids.len() != num_bands || raster.no_data.len() != num_bands {
        return fail(format!("expected {} bands", num_bands));
    }

    let mut previous: Option<&PyramidLevel> = None;
    for (index, level) in raster.levels.iter().enumerate() {
        if level.width <= 0 || level.height <= 0 || level.envelope.is_empty() {
            return fail(format!("level {} has an empty grid or envelope", index));
        }
        if level.offset_x < 0 || level.offset_y < 0 {
            return fail(format!("level {} has a negative tile offset", index));
        }
        if let Some(finer) = previous {
            let (fine_x, _) = finer.resolution();
            let (coarse_x, _) = level.resolution();
            if coarse_x < fine_x {
                return fail(format!("level {} is finer than level {}", index, index - 1));
            }
        }
        previous = Some(level);
    }
    Ok(())
}

impl RasterCatalog for DatasetInfo {
    fn num_rasters(&self) -> usize {
        self.rasters.len()
    }

    fn raster_id(&self, raster_index: usize) -> u64 {
        self.raster(raster_index).raster_id
    }

    fn num_pyramid_levels(&self, raster_index: usize) -> usize {
        self.raster(raster_index).levels.len()
    }

    fn grid_range(&self, raster_index: usize, level: usize) -> GridRange {
        self.raster(raster_index).levels[level].grid_range()
    }

    fn grid_envelope(&self, raster_index: usize, level: usize) -> Envelope {
        self.raster(raster_index).levels[level].envelope
    }

    fn tile_dimension(&self, raster_index: usize) -> (usize, usize) {
        let raster = self.raster(raster_index);
        (raster.tile_width, raster.tile_height)
    }

    fn native_cell_type(&self) -> CellType {
        self.native_cell_type
    }

    fn target_cell_type(&self, raster_index: usize) -> CellType {
        self.raster(raster_index).target_cell_type
    }

    fn num_bands(&self) -> usize {
        self.num_bands
    }

    fn band_ids(&self, raster_index: usize) -> Vec<u64> {
        self.raster(raster_index).band_ids.clone()
    }

    fn no_data_value(&self, raster_index: usize, band: usize) -> Option<f64> {
        self.raster(raster_index).no_data.get(band).copied().flatten()
    }

    fn is_color_mapped(&self) -> bool {
        self.color_mapped
    }

    fn color_map(&self, raster_index: usize) -> Option<&ColorMap> {
        self.raster(raster_index).color_map.as_ref()
    }

    fn crs(&self) -> CoordinateSystem {
        self.crs
    }
}

//! Per-raster query state and overview policies

use std::fmt;
use std::str::FromStr;

use crate::assembler::RasterImage;
use crate::coordinate::{Envelope, GridRange};
use crate::raster::errors::MosaicError;

/// Rule for choosing a pyramid level against the requested resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverviewPolicy {
    /// Coarsest level that is still at least as fine as requested
    #[default]
    Quality,
    /// Finest level that is at least as coarse as requested
    Speed,
    /// Level whose resolution is closest to the request
    Nearest,
    /// Always the full resolution level
    Ignore,
}

impl OverviewPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            OverviewPolicy::Quality => "quality",
            OverviewPolicy::Speed => "speed",
            OverviewPolicy::Nearest => "nearest",
            OverviewPolicy::Ignore => "ignore",
        }
    }
}

impl fmt::Display for OverviewPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for OverviewPolicy {
    type Err = MosaicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quality" => Ok(OverviewPolicy::Quality),
            "speed" => Ok(OverviewPolicy::Speed),
            "nearest" => Ok(OverviewPolicy::Nearest),
            "ignore" => Ok(OverviewPolicy::Ignore),
            other => Err(MosaicError::InvalidConfig(format!("Unknown overview policy: {}", other))),
        }
    }
}

/// Planning state for one raster of one read request
///
/// Created by the query planner, completed by `fit_request_to_raster` and
/// the mosaic planner, and finally given the raster's assembled image.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryInfo {
    /// Index of the raster in the catalog
    pub raster_index: usize,
    /// Store-side raster identifier
    pub raster_id: u64,
    /// Envelope of the request, in the catalog's CRS
    pub requested_envelope: Envelope,
    /// Requested output width and height in pixels
    pub requested_dimension: (i64, i64),
    /// Chosen pyramid level, 0 being the finest
    pub pyramid_level: usize,
    /// Model units per pixel of the chosen level
    pub resolution: (f64, f64),
    /// Pixel grid of the chosen level
    pub level_grid_range: GridRange,
    /// Envelope of the chosen level
    pub level_envelope: Envelope,
    /// All tiles of the chosen level, in tile index space
    pub level_tile_range: GridRange,
    /// Tiles to fetch; empty when nothing of the raster is needed
    pub matching_tiles: GridRange,
    /// Pixel rectangle covered by `matching_tiles`
    pub tiled_image_range: GridRange,
    /// Pixel window of the level covering the request
    pub result_window: GridRange,
    /// `result_window` relative to the tile-aligned image
    pub window_in_tiled_image: GridRange,
    /// Envelope of `result_window`, aligned to native pixel edges
    pub result_envelope: Envelope,
    /// Where the raster lands in the mosaic grid
    pub placement: GridRange,
    /// Assembled image, set once the raster's tiles have been read
    pub image: Option<RasterImage>,
}

impl QueryInfo {
    /// Creates an unfitted query for one raster
    ///
    /// # Arguments
    /// * `raster_index` - Index of the raster in the catalog
    /// * `raster_id` - Store-side raster identifier
    /// * `requested_envelope` - Envelope of the request
    /// * `requested_dimension` - Requested output width and height in pixels
    pub fn new(raster_index: usize, raster_id: u64, requested_envelope: Envelope, requested_dimension: (i64, i64)) -> Self {
        QueryInfo {
            raster_index,
            raster_id,
            requested_envelope,
            requested_dimension,
            pyramid_level: 0,
            resolution: (0.0, 0.0),
            level_grid_range: GridRange::default(),
            level_envelope: requested_envelope,
            level_tile_range: GridRange::default(),
            matching_tiles: GridRange::default(),
            tiled_image_range: GridRange::default(),
            result_window: GridRange::default(),
            window_in_tiled_image: GridRange::default(),
            result_envelope: requested_envelope,
            placement: GridRange::default(),
            image: None,
        }
    }

    /// False once fitting found nothing to read from this raster
    pub fn has_tiles(&self) -> bool {
        !self.matching_tiles.is_empty()
    }
}

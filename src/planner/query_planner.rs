//! Matching a request against the rasters of a catalog
//!
//! Planning happens in two steps. `match_rasters` picks a pyramid level per
//! raster and keeps the rasters whose level envelope touches the request.
//! `fit_request_to_raster` then computes, for one match, the pixel window,
//! the tiles covering it and the envelope those pixels actually cover.

use log::{debug, info};

use crate::coordinate::{snap_to_pixel, Envelope, GridRange, GridTransform, Point};
use crate::raster::catalog::{div_ceil, RasterCatalog};
use crate::raster::errors::{MosaicError, MosaicResult};

use super::query::{OverviewPolicy, QueryInfo};

/// Relative tolerance when comparing resolutions
const RESOLUTION_EPSILON: f64 = 1e-9;

/// Plans per-raster queries against a catalog
pub struct QueryPlanner<'a> {
    catalog: &'a dyn RasterCatalog,
}

impl<'a> QueryPlanner<'a> {
    /// Creates a planner over `catalog`
    ///
    /// # Arguments
    /// * `catalog` - Metadata of the dataset, read-only for the planner's lifetime
    pub fn new(catalog: &'a dyn RasterCatalog) -> Self {
        QueryPlanner { catalog }
    }

    /// Match and fit every raster, dropping those left without tiles
    ///
    /// # Arguments
    /// * `envelope` - Requested envelope in the catalog's CRS
    /// * `width` - Requested output width in pixels
    /// * `height` - Requested output height in pixels
    /// * `policy` - How a pyramid level is chosen per raster
    ///
    /// # Returns
    /// One fitted query per raster with at least one tile to read, or a
    /// planning error when the size is not positive or nothing intersects
    pub fn plan(
        &self,
        envelope: &Envelope,
        width: i64,
        height: i64,
        policy: OverviewPolicy,
    ) -> MosaicResult<Vec<QueryInfo>> {
        let mut queries = self.match_rasters(envelope, width, height, policy)?;
        for query in queries.iter_mut() {
            self.fit_request_to_raster(envelope, query);
        }

        queries.retain(|q| {
            if !q.has_tiles() {
                debug!("Raster {} only touches the request on an edge, skipped", q.raster_id);
            }
            q.has_tiles()
        });
        if queries.is_empty() {
            return Err(MosaicError::NoIntersection(*envelope));
        }

        info!("Planned {} raster queries for {} at {}x{}", queries.len(), envelope, width, height);
        Ok(queries)
    }

    /// Select a pyramid level per raster and keep the intersecting ones
    ///
    /// Intersection is edge-inclusive, so rasters only touching the request
    /// are still matched here.
    ///
    /// # Arguments
    /// * `envelope` - Requested envelope in the catalog's CRS
    /// * `width` - Requested output width in pixels
    /// * `height` - Requested output height in pixels
    /// * `policy` - How a pyramid level is chosen per raster
    ///
    /// # Returns
    /// Unfitted queries carrying the level, its resolution, envelope and grid
    pub fn match_rasters(
        &self,
        envelope: &Envelope,
        width: i64,
        height: i64,
        policy: OverviewPolicy,
    ) -> MosaicResult<Vec<QueryInfo>> {
        if width <= 0 || height <= 0 {
            return Err(MosaicError::InvalidDimension { width, height });
        }
        if envelope.is_empty() {
            return Err(MosaicError::NoIntersection(*envelope));
        }

        let requested_resolution = envelope.width() / width as f64;
        let mut matches = Vec::new();

        for raster_index in 0..self.catalog.num_rasters() {
            let raster_id = self.catalog.raster_id(raster_index);
            let level = self.select_level(raster_index, requested_resolution, policy);
            let level_envelope = self.catalog.grid_envelope(raster_index, level);

            if !level_envelope.intersects(envelope) {
                debug!("Raster {} level {} envelope {} misses the request", raster_id, level, level_envelope);
                continue;
            }

            let mut query = QueryInfo::new(raster_index, raster_id, *envelope, (width, height));
            query.pyramid_level = level;
            query.resolution = self.level_resolution(raster_index, level);
            query.level_envelope = level_envelope;
            query.level_grid_range = self.catalog.grid_range(raster_index, level);
            query.level_tile_range = GridRange::new(
                0,
                0,
                self.catalog.num_tiles_wide(raster_index, level),
                self.catalog.num_tiles_high(raster_index, level),
            );

            debug!("Raster {} matched at level {} (resolution {:?}, requested {})",
                   raster_id, level, query.resolution, requested_resolution);
            matches.push(query);
        }

        if matches.is_empty() {
            return Err(MosaicError::NoIntersection(*envelope));
        }
        Ok(matches)
    }

    /// Compute the pixel window, tile range and result envelope of a match
    ///
    /// The window is rounded outwards and clamped to the level's grid. The
    /// result envelope is recovered from the clamped window so that it lies
    /// on native pixel edges. A request touching the raster only on an
    /// edge yields an empty tile range.
    ///
    /// # Arguments
    /// * `envelope` - Requested envelope in the catalog's CRS
    /// * `query` - A match from [`QueryPlanner::match_rasters`]; its window,
    ///   tile range, tile-aligned image range and result envelope are set
    pub fn fit_request_to_raster(&self, envelope: &Envelope, query: &mut QueryInfo) {
        let raster_index = query.raster_index;
        let grid = query.level_grid_range;
        let transform = GridTransform::from_grid(&grid, &query.level_envelope);

        let upper_left = transform.model_to_raster(&Point::new(envelope.min_x, envelope.max_y));
        let lower_right = transform.model_to_raster(&Point::new(envelope.max_x, envelope.min_y));
        let requested = GridRange::from_corners(
            snap_to_pixel(upper_left.x).floor() as i64,
            snap_to_pixel(upper_left.y).floor() as i64,
            snap_to_pixel(lower_right.x).ceil() as i64,
            snap_to_pixel(lower_right.y).ceil() as i64,
        );
        let window = grid.intersection(&requested);

        query.result_window = window;
        query.result_envelope = transform.grid_to_envelope(&window);
        if window.is_empty() {
            query.matching_tiles = GridRange::new(0, 0, 0, 0);
            query.tiled_image_range = GridRange::new(window.x, window.y, 0, 0);
            query.window_in_tiled_image = GridRange::new(0, 0, 0, 0);
            return;
        }

        let (tile_width, tile_height) = self.catalog.tile_dimension(raster_index);
        let (tile_width, tile_height) = (tile_width as i64, tile_height as i64);
        let tiles_x = tile_span(window.x, window.width, tile_width, query.level_tile_range.width);
        let tiles_y = tile_span(window.y, window.height, tile_height, query.level_tile_range.height);

        query.matching_tiles = GridRange::new(tiles_x.0, tiles_y.0, tiles_x.1, tiles_y.1);
        query.tiled_image_range = GridRange::new(
            tiles_x.0 * tile_width,
            tiles_y.0 * tile_height,
            tiles_x.1 * tile_width,
            tiles_y.1 * tile_height,
        );
        query.window_in_tiled_image = window.translate(-query.tiled_image_range.x, -query.tiled_image_range.y);

        debug!("Raster {} window {} in tiles {} (tile-aligned image {}), envelope {}",
               query.raster_id, window, query.matching_tiles,
               query.tiled_image_range, query.result_envelope);
    }

    fn level_resolution(&self, raster_index: usize, level: usize) -> (f64, f64) {
        let grid = self.catalog.grid_range(raster_index, level);
        let envelope = self.catalog.grid_envelope(raster_index, level);
        (envelope.width() / grid.width as f64, envelope.height() / grid.height as f64)
    }

    /// Pick the pyramid level of a raster for a requested pixel size
    ///
    /// # Arguments
    /// * `raster_index` - Index of the raster in the catalog
    /// * `requested` - Requested model units per pixel along X
    /// * `policy` - Selection policy
    ///
    /// # Returns
    /// The level index, 0 being the finest
    pub fn select_level(&self, raster_index: usize, requested: f64, policy: OverviewPolicy) -> usize {
        let levels = self.catalog.num_pyramid_levels(raster_index);
        if levels <= 1 || policy == OverviewPolicy::Ignore {
            return 0;
        }

        let resolutions: Vec<f64> = (0..levels)
            .map(|level| self.level_resolution(raster_index, level).0)
            .collect();
        let tolerance = requested * RESOLUTION_EPSILON;

        match policy {
            OverviewPolicy::Quality => resolutions
                .iter()
                .rposition(|res| *res <= requested + tolerance)
                .unwrap_or(0),
            OverviewPolicy::Speed => resolutions
                .iter()
                .position(|res| *res >= requested - tolerance)
                .unwrap_or(levels - 1),
            OverviewPolicy::Nearest => {
                let mut best = 0;
                for (level, res) in resolutions.iter().enumerate() {
                    if (res - requested).abs() < (resolutions[best] - requested).abs() {
                        best = level;
                    }
                }
                best
            }
            OverviewPolicy::Ignore => 0,
        }
    }
}

/// First tile and tile count covering `[start, start + length)`
///
/// The count is widened by one when the floor/ceil split leaves the end of
/// the window uncovered and the level has another tile to give.
fn tile_span(start: i64, length: i64, tile_size: i64, tiles_available: i64) -> (i64, i64) {
    let first = start.div_euclid(tile_size);
    let mut count = div_ceil(length, tile_size);
    if (first + count) * tile_size < start + length && first + count < tiles_available {
        count += 1;
    }
    (first, count)
}

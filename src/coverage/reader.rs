//! Top-level raster reads
//!
//! A read reprojects the request envelope into the catalog CRS, plans one
//! query per matching raster, assembles each raster's image, plans the
//! shared mosaic grid and composes the final image.

use log::{debug, info};

use crate::assembler::{MosaicAssembler, RasterImageAssembler};
use crate::coordinate::{CoordinateTransformer, EnvelopeReprojector};
use crate::planner::{MosaicPlanner, QueryInfo, QueryPlanner};
use crate::raster::catalog::RasterCatalog;
use crate::raster::errors::MosaicResult;
use crate::store::TileStore;
use crate::tiles::TileReaderFactory;
use crate::utils::progress::ProgressTracker;

use super::request::{CoverageResult, ReadRequest, SampleDimension};

/// Reads mosaicked images out of a catalog and its tile store
pub struct CoverageReader<'a> {
    catalog: &'a dyn RasterCatalog,
    store: &'a dyn TileStore,
    reprojector: Box<dyn EnvelopeReprojector + 'a>,
    show_progress: bool,
}

impl<'a> CoverageReader<'a> {
    /// Creates a reader over a catalog and the store holding its tiles
    ///
    /// # Arguments
    /// * `catalog` - Metadata of the dataset
    /// * `store` - Tile store of the dataset
    ///
    /// # Returns
    /// A reader with the built-in reprojector and no progress bar
    pub fn new(catalog: &'a dyn RasterCatalog, store: &'a dyn TileStore) -> Self {
        CoverageReader {
            catalog,
            store,
            reprojector: Box::new(CoordinateTransformer),
            show_progress: false,
        }
    }

    /// Replace the built-in WGS84/Web Mercator reprojector
    pub fn with_reprojector(mut self, reprojector: Box<dyn EnvelopeReprojector + 'a>) -> Self {
        self.reprojector = reprojector;
        self
    }

    /// Show a progress bar over the per-raster assembly
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Read the mosaicked image covering `request`
    ///
    /// # Arguments
    /// * `request` - Envelope, CRS, output size and overview policy
    ///
    /// # Returns
    /// The image with its envelope in the catalog's CRS and per-band sample
    /// dimensions, or the planning, store or configuration error that
    /// stopped the read. Store cursors are released either way.
    pub fn read(&self, request: &ReadRequest) -> MosaicResult<CoverageResult> {
        let native_crs = self.catalog.crs();
        let envelope = match &request.crs {
            Some(crs) if *crs != native_crs => {
                let reprojected = self.reprojector.reproject(&request.envelope, crs, &native_crs)?;
                debug!("Request envelope {} in {} is {} in {}",
                       request.envelope, crs.description(), reprojected, native_crs.description());
                reprojected
            }
            _ => request.envelope,
        };

        info!("Reading {} at {}x{} with {} overview policy",
              envelope, request.width, request.height, request.policy);

        let planner = QueryPlanner::new(self.catalog);
        let mut queries = planner.plan(&envelope, request.width, request.height, request.policy)?;

        self.assemble_rasters(&mut queries)?;

        let plan = MosaicPlanner::plan_mosaic(&mut queries)?;
        let raster_ids: Vec<u64> = queries.iter().map(|q| q.raster_id).collect();
        let image = MosaicAssembler::mosaic(&plan, &mut queries)?;

        let reference = &queries[plan.reference];
        let sample_dimensions = self
            .catalog
            .band_ids(reference.raster_index)
            .into_iter()
            .enumerate()
            .map(|(band, band_id)| SampleDimension {
                band_id,
                cell_type: image.cell_type,
                no_data: self.catalog.no_data_value(reference.raster_index, band),
                value_range: image.cell_type.value_range(),
            })
            .collect();

        info!("Read {}x{} image covering {}", image.width, image.height, plan.envelope);
        Ok(CoverageResult {
            image,
            envelope: plan.envelope,
            crs: native_crs,
            sample_dimensions,
            raster_ids,
        })
    }

    fn assemble_rasters(&self, queries: &mut [QueryInfo]) -> MosaicResult<()> {
        let assembler = RasterImageAssembler::new(self.catalog);
        let progress = if self.show_progress {
            ProgressTracker::new(queries.len() as u64, "Assembling rasters")
        } else {
            ProgressTracker::hidden(queries.len() as u64)
        };

        for query in queries.iter_mut() {
            progress.set_message(&format!("raster {}", query.raster_id));

            let reader = TileReaderFactory::create(
                self.store,
                self.catalog,
                query.raster_index,
                query.pyramid_level,
                query.matching_tiles,
            )?;
            query.image = Some(assembler.assemble(reader, query)?);

            progress.increment(1);
        }

        progress.finish();
        Ok(())
    }
}

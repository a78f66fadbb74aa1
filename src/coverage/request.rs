//! Read requests and their results

use crate::assembler::RasterImage;
use crate::coordinate::{CoordinateSystem, Envelope};
use crate::planner::OverviewPolicy;
use crate::raster::cell_type::CellType;

/// What a caller asks the coverage reader for
#[derive(Debug, Clone, PartialEq)]
pub struct ReadRequest {
    pub envelope: Envelope,
    /// CRS of `envelope`; `None` means the catalog's own CRS
    pub crs: Option<CoordinateSystem>,
    pub width: i64,
    pub height: i64,
    pub policy: OverviewPolicy,
}

impl ReadRequest {
    pub fn new(envelope: Envelope, width: i64, height: i64) -> Self {
        ReadRequest {
            envelope,
            crs: None,
            width,
            height,
            policy: OverviewPolicy::default(),
        }
    }

    pub fn with_crs(mut self, crs: CoordinateSystem) -> Self {
        self.crs = Some(crs);
        self
    }

    pub fn with_policy(mut self, policy: OverviewPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Description of one output band
#[derive(Debug, Clone, PartialEq)]
pub struct SampleDimension {
    pub band_id: u64,
    pub cell_type: CellType,
    pub no_data: Option<f64>,
    /// Smallest and largest value the band's samples can hold
    pub value_range: (f64, f64),
}

/// A read's output image with the envelope it covers
#[derive(Debug, Clone)]
pub struct CoverageResult {
    pub image: RasterImage,
    pub envelope: Envelope,
    pub crs: CoordinateSystem,
    pub sample_dimensions: Vec<SampleDimension>,
    /// Rasters that contributed to the image
    pub raster_ids: Vec<u64>,
}

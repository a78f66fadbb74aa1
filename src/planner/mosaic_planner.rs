//! Common output grid for several raster queries
//!
//! The coarsest matched resolution becomes the mosaic grid, so finer
//! rasters are reduced rather than coarser ones blown up into blocky,
//! repeating patterns. All placements come from that one transform.

use log::{debug, info};

use crate::coordinate::{Envelope, GridRange, GridTransform};
use crate::raster::errors::{MosaicError, MosaicResult};

use super::query::QueryInfo;

/// Target grid of a mosaic
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MosaicPlan {
    /// Pixel rectangle of the output, in the reference level's grid
    pub target: GridRange,
    /// Envelope covered by `target`
    pub envelope: Envelope,
    /// Model units per pixel of the output
    pub resolution: (f64, f64),
    /// Index into the query list of the reference raster
    pub reference: usize,
}

pub struct MosaicPlanner;

impl MosaicPlanner {
    /// Choose the reference grid and set each query's placement
    ///
    /// # Arguments
    /// * `queries` - Fitted queries; their `placement` is set in the
    ///   reference level's pixel space
    ///
    /// # Returns
    /// The target rectangle, its envelope and resolution, and the index of
    /// the reference query, or an error when `queries` is empty
    pub fn plan_mosaic(queries: &mut [QueryInfo]) -> MosaicResult<MosaicPlan> {
        let reference = coarsest_query(queries)
            .ok_or_else(|| MosaicError::GenericError("Cannot plan a mosaic without queries".to_string()))?;

        let reference_query = &queries[reference];
        let transform = GridTransform::from_grid(&reference_query.level_grid_range, &reference_query.level_envelope);

        let result_envelope = queries
            .iter()
            .map(|q| q.result_envelope)
            .reduce(|acc, env| acc.union(&env))
            .unwrap_or(reference_query.result_envelope);

        let target = transform.envelope_to_grid(&result_envelope);
        for query in queries.iter_mut() {
            query.placement = transform.envelope_to_grid(&query.result_envelope);
            debug!("Raster {} placed at {} within {}", query.raster_id, query.placement, target);
        }

        let plan = MosaicPlan {
            target,
            envelope: transform.grid_to_envelope(&target),
            resolution: (transform.resolution_x, transform.resolution_y),
            reference,
        };
        info!("Mosaic grid {} at resolution {:?} from raster {}",
              plan.target, plan.resolution, queries[reference].raster_id);
        Ok(plan)
    }
}

/// Query with the largest pixel size; the first one wins ties
fn coarsest_query(queries: &[QueryInfo]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (index, query) in queries.iter().enumerate() {
        match best {
            Some(current) if queries[current].resolution.0 >= query.resolution.0 => {}
            _ => best = Some(index),
        }
    }
    best
}

//! Tests for the shared mosaic grid

extern crate std;

use crate::coordinate::{Envelope, GridRange};
use crate::planner::{MosaicPlanner, OverviewPolicy, QueryInfo, QueryPlanner};
use crate::raster::CellType;
use crate::test_utils::{catalog, raster};

#[test]
fn test_coarsest_raster_is_reference() {
    let catalog = catalog(
        CellType::EightBitUnsigned,
        1,
        vec![
            raster(1, (2, 2), 1, &[(8, 8, Envelope::new(0.0, 0.0, 80.0, 80.0))]),
            raster(2, (2, 2), 1, &[(4, 4, Envelope::new(80.0, 0.0, 160.0, 80.0))]),
        ],
    );
    let planner = QueryPlanner::new(&catalog);
    let mut queries = planner
        .plan(&Envelope::new(0.0, 0.0, 160.0, 80.0), 16, 8, OverviewPolicy::Quality)
        .unwrap();
    std::assert_eq!(queries.len(), 2);

    let plan = MosaicPlanner::plan_mosaic(&mut queries).unwrap();
    std::assert_eq!(plan.reference, 1);
    std::assert_eq!(plan.resolution, (20.0, 20.0));
    std::assert_eq!(plan.target, GridRange::new(-4, 0, 8, 4));
    std::assert_eq!(plan.envelope, Envelope::new(0.0, 0.0, 160.0, 80.0));

    std::assert_eq!(queries[0].placement, GridRange::new(-4, 0, 4, 4));
    std::assert_eq!(queries[1].placement, GridRange::new(0, 0, 4, 4));
    for query in &queries {
        std::assert!(plan.target.contains(&query.placement));
    }
}

#[test]
fn test_equal_resolutions_keep_first_reference() {
    let catalog = catalog(
        CellType::EightBitUnsigned,
        1,
        vec![
            raster(1, (2, 2), 1, &[(4, 4, Envelope::new(0.0, 0.0, 40.0, 40.0))]),
            raster(2, (2, 2), 1, &[(4, 4, Envelope::new(20.0, 20.0, 60.0, 60.0))]),
        ],
    );
    let planner = QueryPlanner::new(&catalog);
    let mut queries = planner
        .plan(&Envelope::new(0.0, 0.0, 60.0, 60.0), 6, 6, OverviewPolicy::Quality)
        .unwrap();

    let plan = MosaicPlanner::plan_mosaic(&mut queries).unwrap();
    std::assert_eq!(plan.reference, 0);
    std::assert_eq!(plan.target, GridRange::new(0, -2, 6, 6));
    std::assert_eq!(queries[1].placement, GridRange::new(2, -2, 4, 4));
}

#[test]
fn test_single_query_placement_is_its_window() {
    let catalog = catalog(
        CellType::EightBitUnsigned,
        1,
        vec![raster(1, (2, 2), 1, &[(8, 8, Envelope::new(0.0, 0.0, 80.0, 80.0))])],
    );
    let planner = QueryPlanner::new(&catalog);
    let mut queries = planner
        .plan(&Envelope::new(15.0, 15.0, 45.0, 45.0), 3, 3, OverviewPolicy::Quality)
        .unwrap();

    let plan = MosaicPlanner::plan_mosaic(&mut queries).unwrap();
    std::assert_eq!(plan.target, queries[0].result_window);
    std::assert_eq!(queries[0].placement, queries[0].result_window);
    std::assert_eq!(plan.envelope, queries[0].result_envelope);
}

#[test]
fn test_no_queries_is_an_error() {
    let mut queries: Vec<QueryInfo> = Vec::new();
    std::assert!(MosaicPlanner::plan_mosaic(&mut queries).is_err());
}

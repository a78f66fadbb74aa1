//! Request planning
//!
//! Turns a requested envelope and output size into per-raster tile queries,
//! then into one shared mosaic grid.

mod query;
mod query_planner;
mod mosaic_planner;

#[cfg(test)]
mod tests;

pub use query::{OverviewPolicy, QueryInfo};
pub use query_planner::QueryPlanner;
pub use mosaic_planner::{MosaicPlan, MosaicPlanner};

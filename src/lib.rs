pub mod io;
pub mod raster;
pub mod coordinate;
pub mod store;
pub mod tiles;
pub mod planner;
pub mod assembler;
pub mod coverage;
pub mod utils;
pub mod commands;
pub mod api;

#[cfg(test)]
pub(crate) mod test_utils;

pub use crate::api::MosaicKit;

pub use raster::{CellType, DatasetConfig, DatasetInfo, MosaicError, MosaicResult, RasterCatalog};
pub use coordinate::{CoordinateSystem, Envelope, GridRange};
pub use coverage::{CoverageReader, CoverageResult, ReadRequest};
pub use planner::OverviewPolicy;
pub use store::{DirectoryTileStore, InMemoryTileStore, TileStore};

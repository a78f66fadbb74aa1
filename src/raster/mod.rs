//! Raster dataset model
//!
//! Cell types and their promotion chain, the catalog of rasters and pyramid
//! levels, colour maps, dataset configuration files and the crate's errors.

pub mod errors;
pub mod cell_type;
pub mod colormap;
pub mod catalog;
pub mod config;

#[cfg(test)]
mod tests;

pub use errors::{ErrorKind, MosaicError, MosaicResult};
pub use cell_type::{determine_target_cell_type, suggest_no_data_value, CellType};
pub use colormap::{ColorMap, RgbaColor};
pub use catalog::{DatasetInfo, PyramidLevel, RasterCatalog, RasterInfo};
pub use config::DatasetConfig;

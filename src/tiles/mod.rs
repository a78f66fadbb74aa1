//! Tile decoding pipeline
//!
//! Readers that walk a raster's tiles in store order, stamp no-data into
//! missing or masked samples and widen sample depth when a raster's
//! no-data values do not fit its native cell type.

pub mod nodata;
pub mod promotion;
mod tile_reader;


pub use nodata::{BitmaskNoDataConverter, EightBitNoDataConverter, NoDataConverter, NoOpConverter};
pub use promotion::{promotion_rule, PromotionRule};
pub use tile_reader::{bytes_per_tile, NativeTileReader, PromotingTileReader, TileInfo, TileReader, TileReaderFactory};

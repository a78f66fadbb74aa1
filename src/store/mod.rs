//! Backing stores for raw tiles
//!
//! The pipeline only talks to [`TileStore`] and [`TileCursor`]; the
//! in-memory and directory implementations cover tests, tooling and small
//! file-based datasets.

mod tile_store;
mod compression;
mod memory;
mod directory;

#[cfg(test)]
mod tests;

pub use tile_store::{RawTile, TileCursor, TileQuery, TileStore};
pub use compression::{CompressionFactory, CompressionHandler, DeflateHandler, UncompressedHandler, ZstdHandler};
pub use memory::{InMemoryTileStore, StoredTile, TileKey};
pub use directory::{DirectoryTileStore, RasterTileDirectory};

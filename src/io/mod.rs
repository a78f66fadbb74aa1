//! I/O utilities for sample data
//!
//! Byte order strategies for packed samples, and the byte stream view that
//! feeds tiles to the image decoder.

pub mod byte_order;
pub mod tile_stream;

#[cfg(test)]
mod tests;

pub use tile_stream::TileByteStream;

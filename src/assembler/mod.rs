//! Image assembly
//!
//! Decodes each raster's tiles into an image cropped to its window, and
//! composites several such images into the final mosaic.

mod raster_image;
pub mod image_ops;
mod raster_assembler;
mod mosaic_assembler;

#[cfg(test)]
mod tests;

pub use self::raster_image::{image_sample_size, ImageModel, RasterImage};
pub use self::raster_assembler::RasterImageAssembler;
pub use self::mosaic_assembler::MosaicAssembler;

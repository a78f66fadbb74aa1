mod raster_image_tests;
mod raster_assembler_tests;

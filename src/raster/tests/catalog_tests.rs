//! Tests for the in-memory catalog

extern crate std;

use crate::coordinate::{CoordinateSystem, Envelope, GridRange};
use crate::raster::{CellType, ColorMap, DatasetInfo, ErrorKind, PyramidLevel, RasterCatalog, RasterInfo, RgbaColor};

fn level(width: i64, height: i64) -> PyramidLevel {
    PyramidLevel::new(width, height, Envelope::new(0.0, 0.0, 100.0, 50.0))
}

#[test]
fn test_catalog_accessors() {
    let mut catalog = DatasetInfo::new("dem", CellType::SixteenBitSigned, 2, CoordinateSystem::WGS84);
    let raster = RasterInfo::new(11, 256, 128, 2)
        .with_level(level(1000, 500).with_offset(12, 3))
        .with_level(level(500, 250))
        .with_band_ids(vec![4, 9])
        .with_no_data(vec![Some(-32768.0), None]);
    catalog.add_raster(raster).unwrap();

    std::assert_eq!(catalog.num_rasters(), 1);
    std::assert_eq!(catalog.raster_id(0), 11);
    std::assert_eq!(catalog.num_pyramid_levels(0), 2);
    std::assert_eq!(catalog.grid_range(0, 0), GridRange::new(12, 3, 1000, 500));
    std::assert_eq!(catalog.tile_offset(0, 0), (12, 3));
    std::assert_eq!(catalog.num_tiles_wide(0, 0), 4);
    std::assert_eq!(catalog.num_tiles_high(0, 0), 4);
    std::assert_eq!(catalog.num_tiles_wide(0, 1), 2);
    std::assert_eq!(catalog.band_ids(0), vec![4, 9]);
    std::assert_eq!(catalog.no_data_value(0, 0), Some(-32768.0));
    std::assert_eq!(catalog.no_data_value(0, 1), None);
    std::assert_eq!(catalog.target_cell_type(0), CellType::SixteenBitSigned);
    std::assert!(!catalog.is_color_mapped());
    std::assert_eq!(level(1000, 500).resolution(), (0.1, 0.1));
}

#[test]
fn test_catalog_computes_target_cell_type() {
    let mut catalog = DatasetInfo::new("rgb", CellType::EightBitUnsigned, 1, CoordinateSystem::WebMercator);
    catalog
        .add_raster(RasterInfo::new(1, 2, 2, 1).with_level(level(4, 4)).with_no_data(vec![Some(1000.0)]))
        .unwrap();
    std::assert_eq!(catalog.target_cell_type(0), CellType::SixteenBitUnsigned);
    std::assert_eq!(catalog.native_cell_type(), CellType::EightBitUnsigned);
}

#[test]
fn test_catalog_tracks_color_maps() {
    let mut catalog = DatasetInfo::new("landcover", CellType::EightBitUnsigned, 1, CoordinateSystem::WGS84);
    let color_map = ColorMap::new().with_entry(1, RgbaColor::new(0, 128, 0, 255));
    catalog
        .add_raster(RasterInfo::new(1, 2, 2, 1).with_level(level(4, 4)).with_color_map(color_map.clone()))
        .unwrap();
    std::assert!(catalog.is_color_mapped());
    std::assert_eq!(catalog.color_map(0), Some(&color_map));
}

#[test]
fn test_catalog_rejects_invalid_rasters() {
    let mut catalog = DatasetInfo::new("bad", CellType::EightBitUnsigned, 1, CoordinateSystem::WGS84);

    let no_levels = RasterInfo::new(1, 2, 2, 1);
    std::assert_eq!(catalog.add_raster(no_levels).unwrap_err().kind(), ErrorKind::Configuration);

    let zero_tiles = RasterInfo::new(2, 0, 2, 1).with_level(level(4, 4));
    std::assert!(catalog.add_raster(zero_tiles).is_err());

    let wrong_bands = RasterInfo::new(3, 2, 2, 3).with_level(level(4, 4));
    std::assert!(catalog.add_raster(wrong_bands).is_err());

    let finer_overview = RasterInfo::new(4, 2, 2, 1).with_level(level(4, 4)).with_level(level(8, 8));
    std::assert!(catalog.add_raster(finer_overview).is_err());

    let negative_offset = RasterInfo::new(5, 2, 2, 1).with_level(level(4, 4).with_offset(-1, 0));
    std::assert!(catalog.add_raster(negative_offset).is_err());

    std::assert_eq!(catalog.num_rasters(), 0);
}

#[test]
fn test_color_from_hex() {
    std::assert_eq!(RgbaColor::from_hex("#ff8000").unwrap(), RgbaColor::new(255, 128, 0, 255));
    std::assert_eq!(RgbaColor::from_hex("00000080").unwrap(), RgbaColor::new(0, 0, 0, 128));
    std::assert!(RgbaColor::from_hex("#fff").is_err());
    std::assert!(RgbaColor::from_hex("#gg0000").is_err());
}

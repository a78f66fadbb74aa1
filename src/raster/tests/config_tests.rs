//! Tests for dataset configuration parsing

extern crate std;

use std::path::Path;

use crate::coordinate::{CoordinateSystem, Envelope, GridRange};
use crate::io::byte_order::ByteOrder;
use crate::raster::{CellType, DatasetConfig, ErrorKind, RasterCatalog};

const DATASET: &str = r##"
[dataset]
name = "elevation"
cell_type = "16bit_u"
bands = 1
tile_width = 256
tile_height = 256
crs = "EPSG:3857"

[[raster]]
id = 1
tiles = "tiles/r1"
compression = "deflate"
no_data = [0]

[[raster.level]]
width = 512
height = 512
offset = [10, 20]
envelope = [0.0, 0.0, 5120.0, 5120.0]

[[raster.level]]
width = 256
height = 256
envelope = [0.0, 0.0, 5120.0, 5120.0]

[[raster]]
id = 2
byte_order = "little"
compression = "zstd"
tile_width = 128
tile_height = 128
stats = [[0, 65535]]

[[raster.level]]
width = 128
height = 128
envelope = [5120.0, 0.0, 7680.0, 2560.0]
"##;

#[test]
fn test_parse_dataset() {
    let config = DatasetConfig::from_str(DATASET, Path::new("/data")).unwrap();
    let catalog = &config.catalog;

    std::assert_eq!(catalog.name, "elevation");
    std::assert_eq!(catalog.crs(), CoordinateSystem::WebMercator);
    std::assert_eq!(catalog.num_rasters(), 2);
    std::assert_eq!(catalog.native_cell_type(), CellType::SixteenBitUnsigned);

    std::assert_eq!(catalog.num_pyramid_levels(0), 2);
    std::assert_eq!(catalog.grid_range(0, 0), GridRange::new(10, 20, 512, 512));
    std::assert_eq!(catalog.grid_envelope(0, 1), Envelope::new(0.0, 0.0, 5120.0, 5120.0));
    std::assert_eq!(catalog.no_data_value(0, 0), Some(0.0));
    std::assert_eq!(catalog.target_cell_type(0), CellType::SixteenBitUnsigned);

    std::assert_eq!(catalog.tile_dimension(1), (128, 128));
    // statistics cover the whole 16-bit range, so no-data forces promotion
    std::assert_eq!(catalog.no_data_value(1, 0), Some(65536.0));
    std::assert_eq!(catalog.target_cell_type(1), CellType::ThirtyTwoBitUnsigned);

    std::assert_eq!(config.store.root_of(1), Some(Path::new("/data/tiles/r1")));
    std::assert_eq!(config.store.root_of(2), Some(Path::new("/data/raster_2")));
    let second = config.store.raster_directory(2).unwrap();
    std::assert_eq!(second.byte_order, ByteOrder::LittleEndian);
    std::assert_eq!(second.compression.name(), "zstd");
    std::assert_eq!(second.pixels_per_tile, 128 * 128);
}

#[test]
fn test_parse_color_map() {
    let content = r##"
[dataset]
cell_type = "8bit_u"
bands = 1
tile_width = 2
tile_height = 2

[dataset.colormap]
1 = "#ff0000"
2 = "#00ff0080"

[[raster]]
id = 1

[[raster.level]]
width = 4
height = 4
envelope = [0, 0, 4, 4]
"##;
    let config = DatasetConfig::from_str(content, Path::new(".")).unwrap();
    let catalog = &config.catalog;
    std::assert!(catalog.is_color_mapped());
    std::assert_eq!(catalog.crs(), CoordinateSystem::WGS84);

    let color_map = catalog.color_map(0).unwrap();
    std::assert_eq!(color_map.len(), 2);
    std::assert_eq!(color_map.lookup(2).to_array(), [0, 255, 0, 128]);
}

#[test]
fn test_invalid_configurations() {
    let cases = [
        "not toml at all [",
        "[dataset]\ncell_type = \"8bit_u\"\nbands = 1\ntile_width = 2\ntile_height = 2\n",
        "[dataset]\ncell_type = \"9bit\"\nbands = 1\ntile_width = 2\ntile_height = 2\n",
        "[dataset]\ncell_type = \"8bit_u\"\nbands = 1\ntile_width = 2\ntile_height = 2\n\
         [[raster]]\nid = 1\n",
        "[dataset]\ncell_type = \"8bit_u\"\nbands = 1\ntile_width = 2\ntile_height = 2\n\
         [[raster]]\nid = 1\ncompression = \"lzw\"\n[[raster.level]]\nwidth = 4\nheight = 4\nenvelope = [0, 0, 4, 4]\n",
        "[dataset]\ncell_type = \"8bit_u\"\nbands = 1\ntile_width = 2\ntile_height = 2\n\
         [[raster]]\nid = 1\nno_data = [1, 2]\n[[raster.level]]\nwidth = 4\nheight = 4\nenvelope = [0, 0, 4, 4]\n",
        "[dataset]\ncell_type = \"8bit_u\"\nbands = 1\ntile_width = -2\ntile_height = 2\n",
    ];
    for content in cases {
        let err = DatasetConfig::from_str(content, Path::new(".")).err();
        std::assert_eq!(err.map(|e| e.kind()), Some(ErrorKind::Configuration), "{}", content);
    }
}

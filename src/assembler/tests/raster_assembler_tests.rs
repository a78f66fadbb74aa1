//! Tests for decoding a raster's tiles into a cropped image

extern crate std;

use crate::assembler::RasterImageAssembler;
use crate::coordinate::Envelope;
use crate::planner::{OverviewPolicy, QueryInfo, QueryPlanner};
use crate::raster::{CellType, DatasetInfo, ErrorKind};
use crate::store::{InMemoryTileStore, StoredTile, TileKey};
use crate::test_utils::{catalog, fill_level, raster};
use crate::tiles::TileReaderFactory;

/// 8x8 pixels in 2x2 tiles over (0,0)-(80,80), sample x + 10y
fn setup(cell_type: CellType, no_data: Option<f64>) -> (DatasetInfo, InMemoryTileStore) {
    let info = raster(1, (2, 2), 1, &[(8, 8, Envelope::new(0.0, 0.0, 80.0, 80.0))]).with_no_data(vec![no_data]);
    let catalog = catalog(cell_type, 1, vec![info]);
    let mut store = InMemoryTileStore::new();
    fill_level(&mut store, &catalog, 0, 0, |_, x, y| ((x + 10 * y) % 16) as f64);
    (catalog, store)
}

fn plan(catalog: &DatasetInfo, envelope: Envelope, size: i64) -> QueryInfo {
    QueryPlanner::new(catalog)
        .plan(&envelope, size, size, OverviewPolicy::Quality)
        .unwrap()
        .remove(0)
}

#[test]
fn test_assemble_crops_to_window() {
    let (catalog, store) = setup(CellType::EightBitUnsigned, None);
    let query = plan(&catalog, Envelope::new(15.0, 15.0, 45.0, 45.0), 3);

    let reader = TileReaderFactory::create(&store, &catalog, 0, 0, query.matching_tiles).unwrap();
    let image = RasterImageAssembler::new(&catalog).assemble(reader, &query).unwrap();

    std::assert_eq!((image.width, image.height), (4, 4));
    std::assert_eq!((image.x, image.y), (1, 3));
    for j in 0..4 {
        for i in 0..4 {
            let expected = ((1 + i as i64) + 10 * (3 + j as i64)) % 16;
            std::assert_eq!(image.sample_value(i, j, 0), expected as f64, "pixel ({}, {})", i, j);
        }
    }
    std::assert_eq!(store.open_cursor_count(), 0);
}

#[test]
fn test_assemble_tile_aligned_window_skips_crop() {
    let (catalog, store) = setup(CellType::EightBitUnsigned, None);
    let query = plan(&catalog, Envelope::new(0.0, 0.0, 80.0, 80.0), 8);
    std::assert_eq!(query.window_in_tiled_image, query.tiled_image_range);

    let reader = TileReaderFactory::create(&store, &catalog, 0, 0, query.matching_tiles).unwrap();
    let image = RasterImageAssembler::new(&catalog).assemble(reader, &query).unwrap();
    std::assert_eq!((image.x, image.y, image.width, image.height), (0, 0, 8, 8));
    std::assert_eq!(image.sample_value(7, 7, 0), ((7 + 70) % 16) as f64);
}

#[test]
fn test_assemble_unpacks_sub_byte_samples() {
    let (catalog, store) = setup(CellType::FourBit, None);
    let query = plan(&catalog, Envelope::new(0.0, 40.0, 40.0, 80.0), 4);

    let reader = TileReaderFactory::create(&store, &catalog, 0, 0, query.matching_tiles).unwrap();
    let image = RasterImageAssembler::new(&catalog).assemble(reader, &query).unwrap();

    std::assert_eq!(image.cell_type, CellType::FourBit);
    std::assert_eq!(image.data.len(), 16);
    std::assert_eq!(image.data[..4], [0, 1, 2, 3]);
    std::assert_eq!(image.data[4..8], [10, 11, 12, 13]);
}

#[test]
fn test_assemble_promoted_raster_carries_no_data() {
    let (catalog, mut store) = setup(CellType::EightBitUnsigned, Some(300.0));
    store.insert(TileKey::new(1, 0, 1, 0, 0), StoredTile::new(Vec::new(), 0));
    let query = plan(&catalog, Envelope::new(0.0, 60.0, 20.0, 80.0), 2);

    let reader = TileReaderFactory::create(&store, &catalog, 0, 0, query.matching_tiles).unwrap();
    let image = RasterImageAssembler::new(&catalog).assemble(reader, &query).unwrap();

    std::assert_eq!(image.cell_type, CellType::SixteenBitUnsigned);
    std::assert_eq!(image.no_data, vec![Some(300.0)]);
    std::assert_eq!(image.sample_value(0, 0, 0), 300.0);
    std::assert_eq!(image.sample_value(1, 1, 0), 300.0);
}

#[test]
fn test_assemble_store_failure_releases_cursor() {
    let (catalog, mut store) = setup(CellType::EightBitUnsigned, None);
    store.fail_on(TileKey::new(1, 0, 1, 1, 2));
    let query = plan(&catalog, Envelope::new(15.0, 15.0, 45.0, 45.0), 3);

    let reader = TileReaderFactory::create(&store, &catalog, 0, 0, query.matching_tiles).unwrap();
    let err = RasterImageAssembler::new(&catalog).assemble(reader, &query).unwrap_err();
    std::assert_eq!(err.kind(), ErrorKind::Store);
    std::assert_eq!(store.open_cursor_count(), 0);
}

//! Tests for the in-memory tile store

extern crate std;

use crate::coordinate::GridRange;
use crate::raster::{ErrorKind, MosaicError};
use crate::store::{InMemoryTileStore, StoredTile, TileKey, TileQuery, TileStore};

#[test]
fn test_tile_positions_store_order() {
    let query = TileQuery::new(7, 0, GridRange::new(1, 2, 2, 2), vec![10, 20]);
    let positions = query.tile_positions();

    std::assert_eq!(positions.len(), 8);
    std::assert_eq!(positions[0], (10, 1, 2));
    std::assert_eq!(positions[1], (20, 1, 2));
    std::assert_eq!(positions[2], (10, 2, 2));
    std::assert_eq!(positions[4], (10, 1, 3));
    std::assert_eq!(positions[7], (20, 2, 3));
}

#[test]
fn test_cursor_reports_missing_tiles() {
    let mut store = InMemoryTileStore::new();
    store.insert(TileKey::new(1, 0, 1, 1, 0), StoredTile::new(vec![9; 4], 4));

    let query = TileQuery::new(1, 0, GridRange::new(0, 0, 2, 1), vec![1]);
    let mut cursor = store.open_cursor(&query).unwrap();

    let first = cursor.fetch().unwrap().unwrap();
    std::assert_eq!((first.column, first.row, first.pixel_count), (0, 0, 0));
    std::assert!(first.data.is_empty());

    let second = cursor.fetch().unwrap().unwrap();
    std::assert_eq!((second.column, second.row, second.pixel_count), (1, 0, 4));
    std::assert_eq!(second.data, vec![9; 4]);

    std::assert!(cursor.fetch().unwrap().is_none());
    cursor.dispose().unwrap();
}

#[test]
fn test_cursor_dispose_is_idempotent_and_counted() {
    let store = InMemoryTileStore::new();
    let query = TileQuery::new(1, 0, GridRange::new(0, 0, 1, 1), vec![1]);

    let mut cursor = store.open_cursor(&query).unwrap();
    std::assert_eq!(store.open_cursor_count(), 1);

    cursor.dispose().unwrap();
    cursor.dispose().unwrap();
    std::assert_eq!(store.open_cursor_count(), 0);

    std::assert!(std::matches!(cursor.fetch(), Err(MosaicError::ReaderDisposed)));
}

#[test]
fn test_injected_failure_is_a_store_error() {
    let mut store = InMemoryTileStore::new();
    store.fail_on(TileKey::new(3, 1, 1, 0, 0));

    let query = TileQuery::new(3, 1, GridRange::new(0, 0, 1, 1), vec![1]);
    let mut cursor = store.open_cursor(&query).unwrap();
    let err = cursor.fetch().unwrap_err();

    std::assert_eq!(err.kind(), ErrorKind::Store);
    std::assert!(err.to_string().contains("raster 3"));
}

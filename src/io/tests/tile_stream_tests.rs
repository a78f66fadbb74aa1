//! Tests for the tile byte stream

extern crate std;

use std::io::{ErrorKind as IoErrorKind, Read, Seek, SeekFrom};

use crate::coordinate::{Envelope, GridRange};
use crate::io::TileByteStream;
use crate::raster::{CellType, DatasetInfo, ErrorKind, MosaicError};
use crate::store::{InMemoryTileStore, TileKey};
use crate::test_utils::{catalog, fill_level, raster};
use crate::tiles::TileReaderFactory;

/// 4x4 pixels in 2x2 tiles, sample value x + 10y (+100 for band 2)
fn setup(bands: usize) -> (DatasetInfo, InMemoryTileStore) {
    let catalog = catalog(
        CellType::EightBitUnsigned,
        bands,
        vec![raster(1, (2, 2), bands, &[(4, 4, Envelope::new(0.0, 0.0, 4.0, 4.0))])],
    );
    let mut store = InMemoryTileStore::new();
    fill_level(&mut store, &catalog, 0, 0, |band, x, y| (band as i64 * 100 + x + 10 * y) as f64);
    (catalog, store)
}

fn open(catalog: &DatasetInfo, store: &InMemoryTileStore) -> TileByteStream {
    let reader = TileReaderFactory::create(store, catalog, 0, 0, GridRange::new(0, 0, 2, 2)).unwrap();
    TileByteStream::new(reader)
}

#[test]
fn test_stream_reads_tiles_in_store_order() {
    let (catalog, store) = setup(1);
    let mut stream = open(&catalog, &store);
    std::assert_eq!(stream.len(), 16);

    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes).unwrap();
    std::assert_eq!(bytes, vec![0, 1, 10, 11, 2, 3, 12, 13, 20, 21, 30, 31, 22, 23, 32, 33]);
    std::assert_eq!(stream.tiles_read(), 4);

    let mut more = [0u8; 4];
    std::assert_eq!(stream.read(&mut more).unwrap(), 0);
}

#[test]
fn test_stream_interleaves_bands_per_tile() {
    let (catalog, store) = setup(2);
    let mut stream = open(&catalog, &store);
    std::assert_eq!(stream.len(), 32);

    let mut first_position = [0u8; 8];
    stream.read_exact(&mut first_position).unwrap();
    std::assert_eq!(first_position, [0, 1, 10, 11, 100, 101, 110, 111]);
}

#[test]
fn test_stream_forward_seek_and_rewind_within_tile() {
    let (catalog, store) = setup(1);
    let mut stream = open(&catalog, &store);

    std::assert_eq!(stream.seek(SeekFrom::Start(8)).unwrap(), 8);
    let mut tile = [0u8; 4];
    stream.read_exact(&mut tile).unwrap();
    std::assert_eq!(tile, [20, 21, 30, 31]);
    std::assert_eq!(stream.tiles_read(), 3);

    // still inside the buffered tile
    stream.seek(SeekFrom::Current(-3)).unwrap();
    let mut two = [0u8; 2];
    stream.read_exact(&mut two).unwrap();
    std::assert_eq!(two, [21, 30]);

    let err = stream.seek(SeekFrom::Start(2)).unwrap_err();
    std::assert_eq!(err.kind(), IoErrorKind::Unsupported);

    let err = stream.seek(SeekFrom::Current(-100)).unwrap_err();
    std::assert_eq!(err.kind(), IoErrorKind::InvalidInput);
}

#[test]
fn test_stream_disposes_reader_on_drop() {
    let (catalog, store) = setup(1);
    let stream = open(&catalog, &store);
    std::assert_eq!(store.open_cursor_count(), 1);
    drop(stream);
    std::assert_eq!(store.open_cursor_count(), 0);
}

#[test]
fn test_stream_carries_store_errors() {
    let (catalog, mut store) = setup(1);
    store.fail_on(TileKey::new(1, 0, 1, 1, 0));
    let mut stream = open(&catalog, &store);

    let mut bytes = Vec::new();
    let err = stream.read_to_end(&mut bytes).unwrap_err();
    let err = MosaicError::from(err);
    std::assert_eq!(err.kind(), ErrorKind::Store);
}

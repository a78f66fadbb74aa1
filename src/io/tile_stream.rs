//! Byte stream view of a tile reader
//!
//! Tiles are concatenated in store order into one flat sequence of
//! `bytes_per_tile * tiles_wide * tiles_high * bands` bytes. Tiles are pulled
//! lazily as reads cross tile boundaries. Seeking is forward-only, except
//! within the tile currently buffered.

use std::io::{self, Read, Seek, SeekFrom};

use log::{debug, trace};

use crate::tiles::TileReader;

/// Forward-only `Read + Seek` adapter over a [`TileReader`]
pub struct TileByteStream {
    reader: Box<dyn TileReader>,
    buffer: Vec<u8>,
    /// Stream offset of `buffer[0]`
    buffer_start: u64,
    /// Valid bytes in `buffer`; 0 before the first tile
    buffer_len: usize,
    position: u64,
    total_length: u64,
    exhausted: bool,
    tiles_read: usize,
}

impl TileByteStream {
    pub fn new(reader: Box<dyn TileReader>) -> Self {
        let range = reader.tile_range();
        let bytes_per_tile = reader.bytes_per_tile();
        let total_length = bytes_per_tile as u64
            * range.width.max(0) as u64
            * range.height.max(0) as u64
            * reader.num_bands() as u64;

        debug!("Tile stream over raster {}: {} tiles of {} bytes, {} bytes total",
               reader.raster_id(), range.area() * reader.num_bands() as i64,
               bytes_per_tile, total_length);

        TileByteStream {
            reader,
            buffer: vec![0u8; bytes_per_tile],
            buffer_start: 0,
            buffer_len: 0,
            position: 0,
            total_length,
            exhausted: false,
            tiles_read: 0,
        }
    }

    /// Total length of the stream in bytes
    pub fn len(&self) -> u64 {
        self.total_length
    }

    pub fn is_empty(&self) -> bool {
        self.total_length == 0
    }

    /// Tiles pulled from the reader so far
    pub fn tiles_read(&self) -> usize {
        self.tiles_read
    }

    pub fn reader(&self) -> &dyn TileReader {
        self.reader.as_ref()
    }

    fn buffer_end(&self) -> u64 {
        self.buffer_start + self.buffer_len as u64
    }

    /// Pull the next tile into the buffer; false once the reader is exhausted
    fn pull_tile(&mut self) -> io::Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        if !self.reader.has_next()? {
            self.exhausted = true;
            return Ok(false);
        }

        let info = self.reader.next(&mut self.buffer)?;
        self.buffer_start = self.buffer_end();
        self.buffer_len = self.buffer.len();
        self.tiles_read += 1;
        trace!("Buffered tile ({},{}) band {} at stream offset {}",
               info.column, info.row, info.band_id, self.buffer_start);
        Ok(true)
    }
}

impl Read for TileByteStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() || self.position >= self.total_length {
            return Ok(0);
        }

        while self.position >= self.buffer_end() {
            if !self.pull_tile()? {
                return Ok(0);
            }
        }

        let offset = (self.position - self.buffer_start) as usize;
        let stream_left = (self.total_length - self.position) as usize;
        let count = buf.len().min(self.buffer_len - offset).min(stream_left);
        buf[..count].copy_from_slice(&self.buffer[offset..offset + count]);
        self.position += count as u64;
        Ok(count)
    }
}

impl Seek for TileByteStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => offset as i128,
            SeekFrom::Current(delta) => self.position as i128 + delta as i128,
            SeekFrom::End(delta) => self.total_length as i128 + delta as i128,
        };
        if target < 0 {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "seek before start of tile stream"));
        }

        let target = target as u64;
        if target < self.buffer_start {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("tile stream cannot seek back to {} (buffered tile starts at {})",
                        target, self.buffer_start),
            ));
        }
        self.position = target;
        Ok(target)
    }
}

impl Drop for TileByteStream {
    fn drop(&mut self) {
        self.reader.dispose();
    }
}

//! Tile payload compression for file-backed stores

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::raster::errors::{MosaicError, MosaicResult};

/// Strategy trait for handling different compression methods
pub trait CompressionHandler: Send + Sync {
    fn decompress(&self, data: &[u8]) -> MosaicResult<Vec<u8>>;

    fn compress(&self, data: &[u8]) -> MosaicResult<Vec<u8>>;

    /// Name used in dataset configuration
    fn name(&self) -> &'static str;
}

/// Tiles stored as raw sample bytes
pub struct UncompressedHandler;

impl CompressionHandler for UncompressedHandler {
    fn decompress(&self, data: &[u8]) -> MosaicResult<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn compress(&self, data: &[u8]) -> MosaicResult<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Zlib-wrapped deflate
pub struct DeflateHandler;

impl CompressionHandler for DeflateHandler {
    fn decompress(&self, data: &[u8]) -> MosaicResult<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(data);
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed)?;
        Ok(decompressed)
    }

    fn compress(&self, data: &[u8]) -> MosaicResult<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data)?;
        Ok(encoder.finish()?)
    }

    fn name(&self) -> &'static str {
        "deflate"
    }
}

/// Zstandard
pub struct ZstdHandler {
    level: i32,
}

impl ZstdHandler {
    pub fn new() -> Self {
        ZstdHandler { level: 3 }
    }
}

impl Default for ZstdHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressionHandler for ZstdHandler {
    fn decompress(&self, data: &[u8]) -> MosaicResult<Vec<u8>> {
        zstd::stream::decode_all(data)
            .map_err(|e| MosaicError::GenericError(format!("ZSTD decompression failed: {}", e)))
    }

    fn compress(&self, data: &[u8]) -> MosaicResult<Vec<u8>> {
        zstd::stream::encode_all(data, self.level)
            .map_err(|e| MosaicError::GenericError(format!("ZSTD compression failed: {}", e)))
    }

    fn name(&self) -> &'static str {
        "zstd"
    }
}

/// Factory for creating compression handlers
pub struct CompressionFactory;

impl CompressionFactory {
    /// Get a handler by its configuration name
    pub fn get_handler_by_name(name: &str) -> MosaicResult<Box<dyn CompressionHandler>> {
        match name.trim().to_lowercase().as_str() {
            "none" | "uncompressed" | "raw" => Ok(Box::new(UncompressedHandler)),
            "deflate" | "zlib" | "zip" => Ok(Box::new(DeflateHandler)),
            "zstd" => Ok(Box::new(ZstdHandler::new())),
            other => Err(MosaicError::InvalidConfig(format!("Unknown compression type: {}", other))),
        }
    }
}

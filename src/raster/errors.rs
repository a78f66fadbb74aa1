//! Error types for raster reading and mosaic assembly

use std::fmt;
use std::io;

use crate::coordinate::Envelope;
use crate::raster::cell_type::CellType;

/// Broad category of a [`MosaicError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request cannot be planned against the catalog
    Planning,
    /// Fetching or decoding a tile from the backing store failed
    Store,
    /// Catalog metadata is inconsistent with what the pipeline supports
    Configuration,
    /// A tile reader contract was violated
    Protocol,
    /// Plain I/O failure
    Io,
    /// Anything else
    Other,
}

/// Errors raised while planning, fetching and assembling rasters
#[derive(Debug)]
pub enum MosaicError {
    /// I/O error
    IoError(io::Error),
    /// Requested pixel dimension is not strictly positive
    InvalidDimension { width: i64, height: i64 },
    /// Requested envelope does not intersect any raster
    NoIntersection(Envelope),
    /// Request CRS cannot be brought into the catalog CRS
    UnsupportedCrs(String),
    /// Tile fetch or decode failure, with tile context
    Store {
        raster_id: u64,
        column: i64,
        row: i64,
        message: String,
    },
    /// No promotion rule exists for this pair of cell types
    UnsupportedPromotion { from: CellType, to: CellType },
    /// No-data value cannot be encoded in the cell type
    InvalidNoData { cell_type: CellType, value: f64 },
    /// Dataset configuration is malformed
    InvalidConfig(String),
    /// `next` was called on a tile reader without a pending tile
    NoPendingTile,
    /// The store reported a partial tile
    PixelCountMismatch { expected: usize, actual: usize },
    /// The tile reader was used after being disposed
    ReaderDisposed,
    /// Generic error with message
    GenericError(String),
}

impl MosaicError {
    /// Wrap a store-side failure with the raster and tile it happened on
    pub fn store(raster_id: u64, column: i64, row: i64, message: impl Into<String>) -> Self {
        MosaicError::Store {
            raster_id,
            column,
            row,
            message: message.into(),
        }
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MosaicError::InvalidDimension { .. }
            | MosaicError::NoIntersection(_)
            | MosaicError::UnsupportedCrs(_) => ErrorKind::Planning,
            MosaicError::Store { .. } => ErrorKind::Store,
            MosaicError::UnsupportedPromotion { .. }
            | MosaicError::InvalidNoData { .. }
            | MosaicError::InvalidConfig(_) => ErrorKind::Configuration,
            MosaicError::NoPendingTile
            | MosaicError::PixelCountMismatch { .. }
            | MosaicError::ReaderDisposed => ErrorKind::Protocol,
            MosaicError::IoError(_) => ErrorKind::Io,
            MosaicError::GenericError(_) => ErrorKind::Other,
        }
    }
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MosaicError::IoError(e) => write!(f, "I/O error: {}", e),
            MosaicError::InvalidDimension { width, height } => {
                write!(f, "Requested dimension must be positive, got {}x{}", width, height)
            }
            MosaicError::NoIntersection(env) => {
                write!(f, "Requested envelope {} does not intersect any raster", env)
            }
            MosaicError::UnsupportedCrs(msg) => write!(f, "Unsupported CRS: {}", msg),
            MosaicError::Store { raster_id, column, row, message } => write!(
                f,
                "Error fetching tile ({},{}) of raster {}: {}",
                column, row, raster_id, message
            ),
            MosaicError::UnsupportedPromotion { from, to } => {
                write!(f, "No sample promotion from {} to {}", from, to)
            }
            MosaicError::InvalidNoData { cell_type, value } => {
                write!(f, "No-data value {} cannot be encoded as {}", value, cell_type)
            }
            MosaicError::InvalidConfig(msg) => write!(f, "Invalid dataset configuration: {}", msg),
            MosaicError::NoPendingTile => write!(f, "next() called with no pending tile"),
            MosaicError::PixelCountMismatch { expected, actual } => write!(
                f,
                "Tile reported {} pixels, expected 0 or {}",
                actual, expected
            ),
            MosaicError::ReaderDisposed => write!(f, "Tile reader already disposed"),
            MosaicError::GenericError(msg) => write!(f, "Mosaic error: {}", msg),
        }
    }
}

impl std::error::Error for MosaicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MosaicError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MosaicError {
    fn from(error: io::Error) -> Self {
        // tile streams carry pipeline errors through io::Read; unwrap them again
        if error.get_ref().map_or(false, |inner| inner.is::<MosaicError>()) {
            if let Some(inner) = error.into_inner() {
                if let Ok(mosaic_error) = inner.downcast::<MosaicError>() {
                    return *mosaic_error;
                }
            }
            return MosaicError::GenericError("tile stream error lost in transit".to_string());
        }
        MosaicError::IoError(error)
    }
}

impl From<MosaicError> for io::Error {
    fn from(error: MosaicError) -> Self {
        match error {
            MosaicError::IoError(e) => e,
            other => io::Error::new(io::ErrorKind::Other, other),
        }
    }
}

impl From<String> for MosaicError {
    fn from(msg: String) -> Self {
        MosaicError::GenericError(msg)
    }
}

/// Result type for mosaic operations
pub type MosaicResult<T> = Result<T, MosaicError>;

//! Coordinate handling for geospatial data
//!
//! Envelopes in model space, integer grid ranges in pixel/tile space, and
//! the transforms between them.

mod envelope;
mod grid;
mod point;
mod transform;
mod crs;

#[cfg(test)]
mod tests;

// Re-export key types
pub use self::envelope::Envelope;
pub use self::grid::GridRange;
pub use self::point::Point;
pub use self::transform::{snap_to_pixel, CoordinateTransformer, EnvelopeReprojector, GridTransform};
pub use self::crs::CoordinateSystem;

//! Model-to-raster transforms and request envelope reprojection

use std::f64::consts::PI;

use log::debug;

use super::crs::CoordinateSystem;
use super::envelope::Envelope;
use super::grid::GridRange;
use super::point::Point;
use crate::raster::errors::{MosaicError, MosaicResult};

/// Tolerance used when snapping pixel coordinates to whole pixels
const PIXEL_EPSILON: f64 = 1e-9;

/// Round `value` to the nearest integer when it is within floating-point
/// noise of one, so that exact pixel edges survive the division by the
/// resolution.
pub fn snap_to_pixel(value: f64) -> f64 {
    let rounded = value.round();
    if (value - rounded).abs() <= PIXEL_EPSILON * value.abs().max(1.0) {
        rounded
    } else {
        value
    }
}

/// Affine mapping between a grid range and the envelope it covers
///
/// Pixel (0,0) of the grid is the upper-left corner of the envelope; rows
/// grow downwards while model Y grows upwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridTransform {
    /// Model X of the grid's upper-left corner
    pub origin_x: f64,
    /// Model Y of the grid's upper-left corner
    pub origin_y: f64,
    /// Model units per pixel along X
    pub resolution_x: f64,
    /// Model units per pixel along Y (positive)
    pub resolution_y: f64,
    /// Pixel coordinate matching the origin
    pub grid_x: i64,
    pub grid_y: i64,
}

impl GridTransform {
    /// Transform for a grid range covering `envelope` exactly
    pub fn from_grid(grid: &GridRange, envelope: &Envelope) -> Self {
        GridTransform {
            origin_x: envelope.min_x,
            origin_y: envelope.max_y,
            resolution_x: envelope.width() / grid.width as f64,
            resolution_y: envelope.height() / grid.height as f64,
            grid_x: grid.x,
            grid_y: grid.y,
        }
    }

    /// Model to (fractional) pixel coordinates
    pub fn model_to_raster(&self, point: &Point) -> Point {
        Point::new(
            (point.x - self.origin_x) / self.resolution_x + self.grid_x as f64,
            (self.origin_y - point.y) / self.resolution_y + self.grid_y as f64,
        )
    }

    /// Pixel corner to model coordinates
    pub fn raster_to_model(&self, point: &Point) -> Point {
        Point::new(
            self.origin_x + (point.x - self.grid_x as f64) * self.resolution_x,
            self.origin_y - (point.y - self.grid_y as f64) * self.resolution_y,
        )
    }

    /// Pixel rectangle covering `envelope`, rounded outwards
    pub fn envelope_to_grid(&self, envelope: &Envelope) -> GridRange {
        let upper_left = self.model_to_raster(&Point::new(envelope.min_x, envelope.max_y));
        let lower_right = self.model_to_raster(&Point::new(envelope.max_x, envelope.min_y));

        GridRange::from_corners(
            snap_to_pixel(upper_left.x).floor() as i64,
            snap_to_pixel(upper_left.y).floor() as i64,
            snap_to_pixel(lower_right.x).ceil() as i64,
            snap_to_pixel(lower_right.y).ceil() as i64,
        )
    }

    /// Envelope covered by a pixel rectangle
    pub fn grid_to_envelope(&self, grid: &GridRange) -> Envelope {
        let upper_left = self.raster_to_model(&Point::new(grid.x as f64, grid.y as f64));
        let lower_right = self.raster_to_model(&Point::new(grid.end_x() as f64, grid.end_y() as f64));
        Envelope::new(upper_left.x, lower_right.y, lower_right.x, upper_left.y)
    }
}

/// Brings a request envelope into the catalog's native CRS
pub trait EnvelopeReprojector {
    fn reproject(
        &self,
        envelope: &Envelope,
        from_crs: &CoordinateSystem,
        to_crs: &CoordinateSystem,
    ) -> MosaicResult<Envelope>;
}

/// Built-in reprojector for WGS84 and Web Mercator
pub struct CoordinateTransformer;

impl CoordinateTransformer {
    /// Earth radius in meters
    const EARTH_RADIUS: f64 = 6378137.0;

    /// Maximum latitude representable in Web Mercator
    const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

    /// Convert from WGS84 (EPSG:4326) to Web Mercator (EPSG:3857)
    pub fn wgs84_to_web_mercator(&self, lon: f64, lat: f64) -> Point {
        let lat = lat.clamp(-Self::MAX_MERCATOR_LATITUDE, Self::MAX_MERCATOR_LATITUDE);

        let x = lon * Self::EARTH_RADIUS * PI / 180.0;
        let y = f64::ln(f64::tan((90.0 + lat) * PI / 360.0)) * Self::EARTH_RADIUS;

        Point::new(x, y)
    }

    /// Convert from Web Mercator (EPSG:3857) to WGS84 (EPSG:4326)
    pub fn web_mercator_to_wgs84(&self, x: f64, y: f64) -> Point {
        let lon = x * 180.0 / (Self::EARTH_RADIUS * PI);
        let lat = 180.0 / PI * (2.0 * f64::atan(f64::exp(y / Self::EARTH_RADIUS)) - PI / 2.0);

        Point::new(lon, lat)
    }

    /// Transform a point between coordinate systems
    pub fn transform_point(&self, point: &Point, from_crs: &CoordinateSystem, to_crs: &CoordinateSystem) -> MosaicResult<Point> {
        if from_crs == to_crs {
            return Ok(*point);
        }

        match (from_crs, to_crs) {
            (CoordinateSystem::WGS84, CoordinateSystem::WebMercator) => {
                Ok(self.wgs84_to_web_mercator(point.x, point.y))
            },
            (CoordinateSystem::WebMercator, CoordinateSystem::WGS84) => {
                Ok(self.web_mercator_to_wgs84(point.x, point.y))
            },
            _ => Err(MosaicError::UnsupportedCrs(format!(
                "No transformation from {} to {}",
                from_crs.description(), to_crs.description()
            ))),
        }
    }
}

impl EnvelopeReprojector for CoordinateTransformer {
    fn reproject(
        &self,
        envelope: &Envelope,
        from_crs: &CoordinateSystem,
        to_crs: &CoordinateSystem,
    ) -> MosaicResult<Envelope> {
        if from_crs == to_crs {
            return Ok(*envelope);
        }

        // both supported transforms are monotonic per axis, so corners suffice
        let min = self.transform_point(&Point::new(envelope.min_x, envelope.min_y), from_crs, to_crs)?;
        let max = self.transform_point(&Point::new(envelope.max_x, envelope.max_y), from_crs, to_crs)?;
        let reprojected = Envelope::new(min.x, min.y, max.x, max.y);

        debug!("Reprojected {} from {} to {} as {}",
               envelope, from_crs.description(), to_crs.description(), reprojected);
        Ok(reprojected)
    }
}

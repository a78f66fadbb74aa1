//! Coordinate Reference System handling

use lazy_static::lazy_static;
use regex::Regex;

use crate::raster::errors::{MosaicError, MosaicResult};

lazy_static! {
    // "EPSG:4326", "epsg:3857", "urn:ogc:def:crs:EPSG::4326", or a bare code
    static ref EPSG_PATTERN: Regex =
        Regex::new(r"(?i)^\s*(?:urn:ogc:def:crs:)?(?:epsg:{1,2}(?:[\d.]*:)?)?(\d+)\s*$")
            .expect("valid EPSG pattern");
}

/// Identifier for common coordinate systems
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSystem {
    /// WGS 84 (EPSG:4326)
    WGS84,
    /// Web Mercator (EPSG:3857)
    WebMercator,
    /// UTM Zone (EPSG:326xx for northern hemisphere, 327xx for southern)
    UTM(u8, bool),
    /// Other EPSG code
    Other(u32),
}

impl CoordinateSystem {
    /// Get the EPSG code for this coordinate system
    pub fn epsg_code(&self) -> u32 {
        match self {
            CoordinateSystem::WGS84 => 4326,
            CoordinateSystem::WebMercator => 3857,
            CoordinateSystem::UTM(zone, is_northern) => {
                if *is_northern {
                    32600 + *zone as u32
                } else {
                    32700 + *zone as u32
                }
            },
            CoordinateSystem::Other(code) => *code,
        }
    }

    /// Create a coordinate system from an EPSG code
    pub fn from_epsg(epsg: u32) -> CoordinateSystem {
        match epsg {
            4326 => CoordinateSystem::WGS84,
            3857 | 900913 => CoordinateSystem::WebMercator,
            32601..=32660 => CoordinateSystem::UTM((epsg - 32600) as u8, true),
            32701..=32760 => CoordinateSystem::UTM((epsg - 32700) as u8, false),
            _ => CoordinateSystem::Other(epsg),
        }
    }

    /// Parse an identifier such as "EPSG:4326" or "urn:ogc:def:crs:EPSG::3857"
    pub fn parse(crs_str: &str) -> MosaicResult<CoordinateSystem> {
        let caps = EPSG_PATTERN
            .captures(crs_str)
            .ok_or_else(|| MosaicError::UnsupportedCrs(format!("Unrecognised CRS identifier: {}", crs_str)))?;
        let code = caps[1]
            .parse::<u32>()
            .map_err(|_| MosaicError::UnsupportedCrs(format!("Invalid EPSG code: {}", &caps[1])))?;
        Ok(Self::from_epsg(code))
    }

    /// Get a description of this coordinate system
    pub fn description(&self) -> String {
        match self {
            CoordinateSystem::WGS84 => "WGS 84 (EPSG:4326)".to_string(),
            CoordinateSystem::WebMercator => "Web Mercator (EPSG:3857)".to_string(),
            CoordinateSystem::UTM(zone, is_northern) => {
                let hemisphere = if *is_northern { 'N' } else { 'S' };
                format!("UTM Zone {}{} (EPSG:{})", zone, hemisphere, self.epsg_code())
            },
            CoordinateSystem::Other(code) => format!("EPSG:{}", code),
        }
    }
}

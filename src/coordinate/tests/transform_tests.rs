//! Tests for grid transforms and envelope reprojection

extern crate std;

use crate::coordinate::{
    snap_to_pixel, CoordinateSystem, CoordinateTransformer, Envelope, EnvelopeReprojector, GridRange,
    GridTransform, Point,
};
use crate::raster::ErrorKind;

fn level_transform() -> GridTransform {
    // 100x50 pixels covering 1000x500 model units, offset (10, 20) in the tile grid
    GridTransform::from_grid(
        &GridRange::new(10, 20, 100, 50),
        &Envelope::new(0.0, 0.0, 1000.0, 500.0),
    )
}

#[test]
fn test_snap_to_pixel() {
    std::assert_eq!(snap_to_pixel(2.9999999999999), 3.0);
    std::assert_eq!(snap_to_pixel(-4.0000000000001), -4.0);
    std::assert_eq!(snap_to_pixel(2.5), 2.5);
}

#[test]
fn test_model_to_raster_flips_y() {
    let t = level_transform();
    std::assert_eq!(t.model_to_raster(&Point::new(0.0, 500.0)), Point::new(10.0, 20.0));
    std::assert_eq!(t.model_to_raster(&Point::new(1000.0, 0.0)), Point::new(110.0, 70.0));

    let back = t.raster_to_model(&Point::new(60.0, 45.0));
    std::assert_eq!(back, Point::new(500.0, 250.0));
}

#[test]
fn test_envelope_to_grid_rounds_outwards() {
    let t = level_transform();
    let grid = t.envelope_to_grid(&Envelope::new(15.0, 15.0, 25.0, 485.0));
    std::assert_eq!(grid, GridRange::from_corners(11, 21, 13, 69));

    let exact = t.envelope_to_grid(&Envelope::new(0.0, 0.0, 1000.0, 500.0));
    std::assert_eq!(exact, GridRange::new(10, 20, 100, 50));
}

#[test]
fn test_grid_to_envelope_inverse() {
    let t = level_transform();
    let grid = GridRange::new(20, 30, 10, 5);
    let env = t.grid_to_envelope(&grid);
    std::assert_eq!(env, Envelope::new(100.0, 350.0, 200.0, 400.0));
    std::assert_eq!(t.envelope_to_grid(&env), grid);
}

#[test]
fn test_reproject_round_trip() {
    let transformer = CoordinateTransformer;
    let wgs = Envelope::new(-10.0, -5.0, 10.0, 5.0);
    let mercator = transformer
        .reproject(&wgs, &CoordinateSystem::WGS84, &CoordinateSystem::WebMercator)
        .unwrap();

    std::assert!(mercator.min_x < 0.0 && mercator.max_x > 0.0);
    std::assert!((mercator.max_x - 1_113_194.9).abs() < 1.0);

    let back = transformer
        .reproject(&mercator, &CoordinateSystem::WebMercator, &CoordinateSystem::WGS84)
        .unwrap();
    std::assert!((back.min_x - wgs.min_x).abs() < 1e-9);
    std::assert!((back.max_y - wgs.max_y).abs() < 1e-9);
}

#[test]
fn test_reproject_same_crs_and_unsupported() {
    let transformer = CoordinateTransformer;
    let env = Envelope::new(0.0, 0.0, 1.0, 1.0);
    let same = transformer
        .reproject(&env, &CoordinateSystem::Other(2154), &CoordinateSystem::Other(2154))
        .unwrap();
    std::assert_eq!(same, env);

    let err = transformer
        .reproject(&env, &CoordinateSystem::UTM(33, true), &CoordinateSystem::WGS84)
        .unwrap_err();
    std::assert_eq!(err.kind(), ErrorKind::Planning);
}

//! Tests for image models and rendering

extern crate std;

use crate::assembler::{ImageModel, RasterImage};
use crate::raster::{CellType, ColorMap, RgbaColor};

#[test]
fn test_image_model_derivation() {
    std::assert_eq!(ImageModel::derive(1, CellType::EightBitUnsigned, true), ImageModel::Palette);
    std::assert_eq!(ImageModel::derive(1, CellType::FourBit, false), ImageModel::PackedGray);
    std::assert_eq!(ImageModel::derive(1, CellType::SixteenBitUnsigned, false), ImageModel::Gray);
    std::assert_eq!(ImageModel::derive(3, CellType::EightBitUnsigned, false), ImageModel::Rgb);
    std::assert_eq!(ImageModel::derive(4, CellType::SixteenBitUnsigned, false), ImageModel::Rgba);
    std::assert_eq!(ImageModel::derive(1, CellType::ThirtyTwoBitReal, true), ImageModel::Banded);
    std::assert_eq!(ImageModel::derive(2, CellType::EightBitUnsigned, false), ImageModel::Banded);
    std::assert_eq!(ImageModel::derive(1, CellType::SixteenBitSigned, false), ImageModel::Banded);
}

#[test]
fn test_sub_byte_images_use_one_byte_per_sample() {
    let image = RasterImage::new(3, 2, 1, CellType::OneBit);
    std::assert_eq!(image.sample_size(), 1);
    std::assert_eq!(image.data.len(), 6);
    std::assert_eq!(image.row_size(), 3);
}

#[test]
fn test_pixel_access() {
    let mut image = RasterImage::new(2, 2, 2, CellType::SixteenBitUnsigned);
    image.pixel_mut(1, 1).copy_from_slice(&[0x01, 0x02, 0x03, 0x04]);
    std::assert_eq!(image.pixel(1, 1), &[0x01, 0x02, 0x03, 0x04]);
    std::assert_eq!(image.sample(1, 1, 1), &[0x03, 0x04]);
    std::assert_eq!(image.sample_value(1, 1, 0), 258.0);
}

#[test]
fn test_render_gray() {
    let mut image = RasterImage::new(2, 1, 1, CellType::EightBitUnsigned);
    image.data = vec![10, 250];
    let rendered = image.to_dynamic_image().unwrap().to_luma8();
    std::assert_eq!(rendered.dimensions(), (2, 1));
    std::assert_eq!(rendered.get_pixel(1, 0).0, [250]);
}

#[test]
fn test_render_packed_gray_scales_to_full_range() {
    let mut image = RasterImage::new(2, 1, 1, CellType::OneBit);
    image.data = vec![0, 1];
    let rendered = image.to_dynamic_image().unwrap().to_luma8();
    std::assert_eq!(rendered.get_pixel(0, 0).0, [0]);
    std::assert_eq!(rendered.get_pixel(1, 0).0, [255]);
}

#[test]
fn test_render_palette() {
    let color_map = ColorMap::new()
        .with_entry(1, RgbaColor::new(255, 0, 0, 255))
        .with_entry(2, RgbaColor::new(0, 0, 255, 128));
    let mut image = RasterImage::new(3, 1, 1, CellType::EightBitUnsigned).with_color_map(Some(color_map));
    image.data = vec![1, 2, 3];
    std::assert_eq!(image.model, ImageModel::Palette);

    let rendered = image.to_dynamic_image().unwrap().to_rgba8();
    std::assert_eq!(rendered.get_pixel(0, 0).0, [255, 0, 0, 255]);
    std::assert_eq!(rendered.get_pixel(1, 0).0, [0, 0, 255, 128]);
    std::assert_eq!(rendered.get_pixel(2, 0).0, [0, 0, 0, 0]);
}

#[test]
fn test_render_rgb16() {
    let mut image = RasterImage::new(1, 1, 3, CellType::SixteenBitUnsigned);
    image.data = vec![0x01, 0x00, 0x00, 0x02, 0xFF, 0xFF];
    let rendered = image.to_dynamic_image().unwrap().to_rgb16();
    std::assert_eq!(rendered.get_pixel(0, 0).0, [256, 2, 65535]);
}

#[test]
fn test_banded_images_cannot_render() {
    let image = RasterImage::new(1, 1, 2, CellType::ThirtyTwoBitReal);
    std::assert!(image.to_dynamic_image().is_err());
}

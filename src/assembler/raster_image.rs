//! Decoded raster images
//!
//! Pixels are interleaved, samples big-endian. Sub-byte samples (1/4-bit)
//! are expanded to one byte each on decode so every pixel is addressable
//! without bit arithmetic.

use byteorder::{BigEndian, ByteOrder};
use image::{DynamicImage, ImageBuffer, Luma, Rgb, Rgba};

use crate::io::byte_order::SAMPLE_BYTE_ORDER;
use crate::raster::cell_type::CellType;
use crate::raster::colormap::ColorMap;
use crate::raster::errors::{MosaicError, MosaicResult};

/// Colour and sample model of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageModel {
    /// Single band indexing a colour map
    Palette,
    /// Single 1-bit or 4-bit band
    PackedGray,
    /// Single unsigned 8 or 16-bit band
    Gray,
    Rgb,
    Rgba,
    /// Anything else; kept as raw samples
    Banded,
}

impl ImageModel {
    /// Decision table on band count, sample type and colour map presence
    pub fn derive(num_bands: usize, cell_type: CellType, color_mapped: bool) -> ImageModel {
        let unsigned_int = matches!(cell_type, CellType::EightBitUnsigned | CellType::SixteenBitUnsigned);
        match num_bands {
            1 if color_mapped && !cell_type.is_real() => ImageModel::Palette,
            1 if cell_type.is_sub_byte() => ImageModel::PackedGray,
            1 if unsigned_int => ImageModel::Gray,
            3 if unsigned_int => ImageModel::Rgb,
            4 if unsigned_int => ImageModel::Rgba,
            _ => ImageModel::Banded,
        }
    }
}

/// Bytes one sample occupies inside a decoded image
pub fn image_sample_size(cell_type: CellType) -> usize {
    cell_type.bytes_per_sample().max(1)
}

/// A decoded, fully materialised raster image
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    /// Pixel position of the upper-left corner in its grid
    pub x: i64,
    pub y: i64,
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    /// Samples per pixel
    pub bands: usize,
    /// Cell type of the samples; sub-byte samples take one byte each
    pub cell_type: CellType,
    /// Colour/sample model used when rendering
    pub model: ImageModel,
    pub color_map: Option<ColorMap>,
    /// Per band no-data value of the source raster
    pub no_data: Vec<Option<f64>>,
    pub data: Vec<u8>,
}

impl RasterImage {
    /// Zero-filled image
    ///
    /// # Arguments
    /// * `width` - Width in pixels
    /// * `height` - Height in pixels
    /// * `bands` - Samples per pixel
    /// * `cell_type` - Cell type of the samples
    ///
    /// # Returns
    /// An image at origin (0, 0) with the model derived from bands and type
    pub fn new(width: usize, height: usize, bands: usize, cell_type: CellType) -> Self {
        let sample_size = image_sample_size(cell_type);
        RasterImage {
            x: 0,
            y: 0,
            width,
            height,
            bands,
            cell_type,
            model: ImageModel::derive(bands, cell_type, false),
            color_map: None,
            no_data: vec![None; bands],
            data: vec![0u8; width * height * bands * sample_size],
        }
    }

    pub fn with_origin(mut self, x: i64, y: i64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_color_map(mut self, color_map: Option<ColorMap>) -> Self {
        self.model = ImageModel::derive(self.bands, self.cell_type, color_map.is_some());
        self.color_map = color_map;
        self
    }

    pub fn with_no_data(mut self, no_data: Vec<Option<f64>>) -> Self {
        self.no_data = no_data;
        self
    }

    pub fn sample_size(&self) -> usize {
        image_sample_size(self.cell_type)
    }

    pub fn pixel_size(&self) -> usize {
        self.bands * self.sample_size()
    }

    pub fn row_size(&self) -> usize {
        self.width * self.pixel_size()
    }

    fn pixel_offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * self.pixel_size()
    }

    /// All bands of one pixel
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let offset = self.pixel_offset(x, y);
        &self.data[offset..offset + self.pixel_size()]
    }

    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [u8] {
        let offset = self.pixel_offset(x, y);
        let size = self.pixel_size();
        &mut self.data[offset..offset + size]
    }

    /// Bytes of one sample
    pub fn sample(&self, x: usize, y: usize, band: usize) -> &[u8] {
        let offset = self.pixel_offset(x, y) + band * self.sample_size();
        &self.data[offset..offset + self.sample_size()]
    }

    /// Sample as a number, for inspection and rendering
    pub fn sample_value(&self, x: usize, y: usize, band: usize) -> f64 {
        SAMPLE_BYTE_ORDER
            .create_handler()
            .read_sample(self.cell_type, self.sample(x, y, band))
    }

    /// Render to an `image` crate image for encoding
    pub fn to_dynamic_image(&self) -> MosaicResult<DynamicImage> {
        let (width, height) = (self.width as u32, self.height as u32);
        let wrong_size = || MosaicError::GenericError(format!(
            "Image buffer does not match {}x{}", self.width, self.height
        ));

        match (self.model, self.cell_type) {
            (ImageModel::Palette, _) => {
                let color_map = self.color_map.as_ref().ok_or_else(|| {
                    MosaicError::GenericError("Palette image without colour map".to_string())
                })?;
                let mut rgba = Vec::with_capacity(self.width * self.height * 4);
                for y in 0..self.height {
                    for x in 0..self.width {
                        let index = self.sample_value(x, y, 0).max(0.0) as u32;
                        rgba.extend_from_slice(&color_map.lookup(index).to_array());
                    }
                }
                let buffer = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(width, height, rgba).ok_or_else(wrong_size)?;
                Ok(DynamicImage::ImageRgba8(buffer))
            }
            (ImageModel::PackedGray, cell_type) => {
                let scale = 255 / ((1u16 << cell_type.bits_per_sample()) - 1) as u8;
                let gray: Vec<u8> = self.data.iter().map(|v| v.saturating_mul(scale)).collect();
                let buffer = ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(width, height, gray).ok_or_else(wrong_size)?;
                Ok(DynamicImage::ImageLuma8(buffer))
            }
            (ImageModel::Gray, CellType::EightBitUnsigned) => {
                let buffer = ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(width, height, self.data.clone())
                    .ok_or_else(wrong_size)?;
                Ok(DynamicImage::ImageLuma8(buffer))
            }
            (ImageModel::Gray, CellType::SixteenBitUnsigned) => {
                let buffer = ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(width, height, self.samples_u16())
                    .ok_or_else(wrong_size)?;
                Ok(DynamicImage::ImageLuma16(buffer))
            }
            (ImageModel::Rgb, CellType::EightBitUnsigned) => {
                let buffer = ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(width, height, self.data.clone())
                    .ok_or_else(wrong_size)?;
                Ok(DynamicImage::ImageRgb8(buffer))
            }
            (ImageModel::Rgb, CellType::SixteenBitUnsigned) => {
                let buffer = ImageBuffer::<Rgb<u16>, Vec<u16>>::from_raw(width, height, self.samples_u16())
                    .ok_or_else(wrong_size)?;
                Ok(DynamicImage::ImageRgb16(buffer))
            }
            (ImageModel::Rgba, CellType::EightBitUnsigned) => {
                let buffer = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(width, height, self.data.clone())
                    .ok_or_else(wrong_size)?;
                Ok(DynamicImage::ImageRgba8(buffer))
            }
            (ImageModel::Rgba, CellType::SixteenBitUnsigned) => {
                let buffer = ImageBuffer::<Rgba<u16>, Vec<u16>>::from_raw(width, height, self.samples_u16())
                    .ok_or_else(wrong_size)?;
                Ok(DynamicImage::ImageRgba16(buffer))
            }
            (model, cell_type) => Err(MosaicError::GenericError(format!(
                "Cannot render {} band {} image ({:?}) as a picture", self.bands, cell_type, model
            ))),
        }
    }

    fn samples_u16(&self) -> Vec<u16> {
        self.data.chunks_exact(2).map(BigEndian::read_u16).collect()
    }
}

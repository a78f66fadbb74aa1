//! Pixel operations used to assemble and composite raster images

use log::debug;

use crate::coordinate::GridRange;
use crate::io::byte_order::SAMPLE_BYTE_ORDER;
use crate::raster::cell_type::CellType;
use crate::raster::errors::{MosaicError, MosaicResult};

use super::raster_image::{ImageModel, RasterImage};

/// Cut `window` (relative to the image's upper-left pixel) out of `image`
///
/// # Arguments
/// * `image` - Source image
/// * `window` - Rectangle to keep, relative to the image's upper-left pixel
///
/// # Returns
/// The cropped image with its origin moved by the window offset, or an
/// error when the window leaves the image
pub fn crop(image: &RasterImage, window: &GridRange) -> MosaicResult<RasterImage> {
    let bounds = GridRange::new(0, 0, image.width as i64, image.height as i64);
    if window.is_empty() || !bounds.contains(window) {
        return Err(MosaicError::GenericError(format!(
            "Crop window {} outside image {}x{}", window, image.width, image.height
        )));
    }

    let pixel_size = image.pixel_size();
    let row_size = image.row_size();
    let out_row_size = window.width as usize * pixel_size;
    let mut data = Vec::with_capacity(out_row_size * window.height as usize);
    for row in window.y..window.end_y() {
        let start = row as usize * row_size + window.x as usize * pixel_size;
        data.extend_from_slice(&image.data[start..start + out_row_size]);
    }

    Ok(RasterImage {
        x: image.x + window.x,
        y: image.y + window.y,
        width: window.width as usize,
        height: window.height as usize,
        data,
        ..image.clone_header()
    })
}

/// Move an image to a new pixel origin
pub fn translate(mut image: RasterImage, x: i64, y: i64) -> RasterImage {
    image.x = x;
    image.y = y;
    image
}

/// Nearest-neighbour resample to `width` x `height`, keeping the origin
pub fn resample_nearest(image: &RasterImage, width: usize, height: usize) -> RasterImage {
    let pixel_size = image.pixel_size();
    let mut data = vec![0u8; width * height * pixel_size];
    for y in 0..height {
        let src_y = ((y as f64 + 0.5) * image.height as f64 / height as f64) as usize;
        let src_y = src_y.min(image.height.saturating_sub(1));
        for x in 0..width {
            let src_x = ((x as f64 + 0.5) * image.width as f64 / width as f64) as usize;
            let src_x = src_x.min(image.width.saturating_sub(1));
            let offset = (y * width + x) * pixel_size;
            data[offset..offset + pixel_size].copy_from_slice(image.pixel(src_x, src_y));
        }
    }

    RasterImage {
        x: image.x,
        y: image.y,
        width,
        height,
        data,
        ..image.clone_header()
    }
}

/// Re-encode every sample as `cell_type`
///
/// Used to bring images of rasters promoted to different depths onto one
/// common type before compositing.
pub fn convert_cell_type(image: RasterImage, cell_type: CellType) -> MosaicResult<RasterImage> {
    if image.cell_type == cell_type {
        return Ok(image);
    }

    debug!("Converting {}x{} image from {} to {}", image.width, image.height, image.cell_type, cell_type);
    let handler = SAMPLE_BYTE_ORDER.create_handler();
    let from_size = image.sample_size();
    let mut data = Vec::with_capacity(image.width * image.height * image.bands * cell_type.bytes_per_sample().max(1));
    for sample in image.data.chunks_exact(from_size) {
        let value = handler.read_sample(image.cell_type, sample);
        handler.write_sample(cell_type, value, &mut data)?;
    }

    let color_mapped = image.color_map.is_some();
    Ok(RasterImage {
        cell_type,
        model: ImageModel::derive(image.bands, cell_type, color_mapped),
        data,
        ..image
    })
}

/// Per band no-data bytes of an image, `None` for bands without a value
pub fn no_data_patterns(image: &RasterImage) -> MosaicResult<Vec<Option<Vec<u8>>>> {
    let handler = SAMPLE_BYTE_ORDER.create_handler();
    (0..image.bands)
        .map(|band| match image.no_data.get(band).copied().flatten() {
            Some(value) => {
                let mut pattern = Vec::with_capacity(image.sample_size());
                handler.write_sample(image.cell_type, value, &mut pattern)?;
                Ok(Some(pattern))
            }
            None => Ok(None),
        })
        .collect()
}

/// Fill every pixel with the image's no-data pattern (zero where unset)
pub fn fill_no_data(image: &mut RasterImage) -> MosaicResult<()> {
    let patterns = no_data_patterns(image)?;
    let sample_size = image.sample_size();
    let mut pixel = vec![0u8; image.pixel_size()];
    for (band, pattern) in patterns.iter().enumerate() {
        if let Some(pattern) = pattern {
            pixel[band * sample_size..(band + 1) * sample_size].copy_from_slice(pattern);
        }
    }
    for chunk in image.data.chunks_exact_mut(pixel.len()) {
        chunk.copy_from_slice(&pixel);
    }
    Ok(())
}

/// Draw `source` over `target` at the source's pixel origin
///
/// Source pixels whose every band holds that band's no-data value are
/// transparent. Both images must share cell type and band count.
///
/// # Arguments
/// * `target` - Image drawn onto, usually the mosaic canvas
/// * `source` - Image drawn, positioned by its own origin
///
/// # Returns
/// An error when cell types or band counts differ; pixels outside the
/// target are ignored
pub fn overlay(target: &mut RasterImage, source: &RasterImage) -> MosaicResult<()> {
    if target.cell_type != source.cell_type || target.bands != source.bands {
        return Err(MosaicError::GenericError(format!(
            "Cannot overlay {} band {} image onto {} band {} image",
            source.bands, source.cell_type, target.bands, target.cell_type
        )));
    }

    let target_bounds = GridRange::new(target.x, target.y, target.width as i64, target.height as i64);
    let source_bounds = GridRange::new(source.x, source.y, source.width as i64, source.height as i64);
    let overlap = target_bounds.intersection(&source_bounds);
    if overlap.is_empty() {
        return Ok(());
    }

    let patterns = no_data_patterns(source)?;
    let transparent_pixel: Option<Vec<u8>> = patterns.into_iter().collect::<Option<Vec<Vec<u8>>>>().map(|p| p.concat());

    for y in overlap.y..overlap.end_y() {
        for x in overlap.x..overlap.end_x() {
            let pixel = source.pixel((x - source.x) as usize, (y - source.y) as usize);
            if transparent_pixel.as_deref() == Some(pixel) {
                continue;
            }
            target
                .pixel_mut((x - target.x) as usize, (y - target.y) as usize)
                .copy_from_slice(pixel);
        }
    }
    Ok(())
}

impl RasterImage {
    /// Copy of everything but the pixel data
    fn clone_header(&self) -> RasterImage {
        RasterImage {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            bands: self.bands,
            cell_type: self.cell_type,
            model: self.model,
            color_map: self.color_map.clone(),
            no_data: self.no_data.clone(),
            data: Vec::new(),
        }
    }
}

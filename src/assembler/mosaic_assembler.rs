//! Compositing per-raster images onto the mosaic grid

use log::{debug, info};

use crate::planner::{MosaicPlan, QueryInfo};
use crate::raster::errors::{MosaicError, MosaicResult};

use super::raster_image::RasterImage;
use super::image_ops::{convert_cell_type, fill_no_data, overlay, resample_nearest, translate};

pub struct MosaicAssembler;

impl MosaicAssembler {
    /// Compose the assembled images of `queries` into one image
    ///
    /// A single query hands back its own image untouched. Otherwise every
    /// image is brought to its placement size and origin and drawn in query
    /// order onto a no-data filled canvas, later rasters on top.
    ///
    /// # Arguments
    /// * `plan` - Target grid from the mosaic planner
    /// * `queries` - Planned queries; each assembled image is taken out
    ///
    /// # Returns
    /// The mosaicked image covering `plan.target`, or an error when a query
    /// has no image or an image cannot be widened to the common cell type
    pub fn mosaic(plan: &MosaicPlan, queries: &mut [QueryInfo]) -> MosaicResult<RasterImage> {
        if let [query] = queries {
            return query.image.take().ok_or_else(|| missing_image(query));
        }

        let mut images = Vec::with_capacity(queries.len());
        for query in queries.iter_mut() {
            let image = query.image.take().ok_or_else(|| missing_image(query))?;
            images.push(place(image, query)?);
        }

        let cell_type = images
            .iter()
            .map(|image| image.cell_type)
            .max_by_key(|ct| (ct.bits_per_sample(), ct.is_real()))
            .ok_or_else(|| MosaicError::GenericError("No images to mosaic".to_string()))?;
        let images = images
            .into_iter()
            .map(|image| convert_cell_type(image, cell_type))
            .collect::<MosaicResult<Vec<_>>>()?;

        let first = &images[0];
        let target = plan.target;
        let mut canvas = RasterImage::new(target.width as usize, target.height as usize, first.bands, cell_type)
            .with_origin(target.x, target.y)
            .with_color_map(first.color_map.clone())
            .with_no_data(first.no_data.clone());
        fill_no_data(&mut canvas)?;

        for image in &images {
            overlay(&mut canvas, image)?;
        }

        info!("Mosaicked {} rasters into {}x{} {} image",
              images.len(), canvas.width, canvas.height, canvas.cell_type);
        Ok(canvas)
    }
}

fn missing_image(query: &QueryInfo) -> MosaicError {
    MosaicError::GenericError(format!("Raster {} has no assembled image", query.raster_id))
}

/// Resample to the placement size if needed, then move to the placement origin
fn place(image: RasterImage, query: &QueryInfo) -> MosaicResult<RasterImage> {
    let placement = query.placement;
    if placement.is_empty() {
        return Err(MosaicError::GenericError(format!(
            "Raster {} has an empty placement {}", query.raster_id, placement
        )));
    }

    let (width, height) = (placement.width as usize, placement.height as usize);
    let image = if image.width != width || image.height != height {
        debug!("Resampling raster {} from {}x{} to {}x{}",
               query.raster_id, image.width, image.height, width, height);
        resample_nearest(&image, width, height)
    } else {
        image
    };
    Ok(translate(image, placement.x, placement.y))
}

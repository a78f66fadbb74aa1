use std::path::Path;

use log::info;

use crate::coverage::{CoverageReader, CoverageResult, ReadRequest};
use crate::raster::catalog::{DatasetInfo, RasterCatalog};
use crate::raster::config::DatasetConfig;
use crate::raster::errors::{MosaicError, MosaicResult};
use crate::store::DirectoryTileStore;

/// Main interface to the MosaicKit library
pub struct MosaicKit {
    config: DatasetConfig,
}

impl MosaicKit {
    /// Open a dataset described by a TOML file
    ///
    /// # Arguments
    /// * `dataset_path` - Path to the dataset configuration
    ///
    /// # Returns
    /// A MosaicKit instance or an error if the dataset cannot be loaded
    pub fn open(dataset_path: impl AsRef<Path>) -> MosaicResult<Self> {
        Ok(MosaicKit {
            config: DatasetConfig::from_file(dataset_path)?,
        })
    }

    pub fn from_config(config: DatasetConfig) -> Self {
        MosaicKit { config }
    }

    pub fn catalog(&self) -> &DatasetInfo {
        &self.config.catalog
    }

    /// Tile directories of the dataset, e.g. for writing tiles
    pub fn store(&self) -> &DirectoryTileStore {
        &self.config.store
    }

    /// Read a mosaicked image for `request`
    pub fn read(&self, request: &ReadRequest, show_progress: bool) -> MosaicResult<CoverageResult> {
        CoverageReader::new(&self.config.catalog, &self.config.store)
            .with_progress(show_progress)
            .read(request)
    }

    /// Read and save the result to `output_path`
    ///
    /// `.raw` and `.bin` outputs receive the interleaved big-endian samples
    /// as-is; any other extension is encoded by the image crate.
    pub fn read_to_file(&self, request: &ReadRequest, output_path: &str, show_progress: bool) -> MosaicResult<CoverageResult> {
        let result = self.read(request, show_progress)?;

        let extension = Path::new(output_path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        if extension == "raw" || extension == "bin" {
            std::fs::write(output_path, &result.image.data)?;
        } else {
            result
                .image
                .to_dynamic_image()?
                .save(output_path)
                .map_err(|e| MosaicError::GenericError(format!("Failed to save image: {}", e)))?;
        }

        info!("Saved {}x{} image covering {} to {}",
              result.image.width, result.image.height, result.envelope, output_path);
        Ok(result)
    }

    /// Human readable summary of the dataset
    pub fn describe(&self) -> String {
        let catalog = &self.config.catalog;
        let mut result = format!("Dataset: {}\n", catalog.name);
        result.push_str(&format!("  Cell type: {}\n", catalog.native_cell_type()));
        result.push_str(&format!("  Bands: {}\n", catalog.num_bands()));
        result.push_str(&format!("  CRS: {}\n", catalog.crs().description()));
        result.push_str(&format!("  Color mapped: {}\n", catalog.is_color_mapped()));
        result.push_str(&format!("  Rasters: {}\n", catalog.num_rasters()));

        for raster_index in 0..catalog.num_rasters() {
            let (tile_width, tile_height) = catalog.tile_dimension(raster_index);
            result.push_str(&format!("\nRaster {} ({}x{} tiles, target cell type {})\n",
                                     catalog.raster_id(raster_index), tile_width, tile_height,
                                     catalog.target_cell_type(raster_index)));

            let no_data: Vec<String> = (0..catalog.num_bands())
                .map(|band| match catalog.no_data_value(raster_index, band) {
                    Some(value) => value.to_string(),
                    None => "-".to_string(),
                })
                .collect();
            result.push_str(&format!("  No-data: [{}]\n", no_data.join(", ")));

            for level in 0..catalog.num_pyramid_levels(raster_index) {
                result.push_str(&format!("  Level {}: grid {} in {}x{} tiles, envelope {}\n",
                                         level,
                                         catalog.grid_range(raster_index, level),
                                         catalog.num_tiles_wide(raster_index, level),
                                         catalog.num_tiles_high(raster_index, level),
                                         catalog.grid_envelope(raster_index, level)));
            }
        }

        result
    }
}

//! Mosaic read command
//!
//! Reads the requested envelope from a dataset and writes the resulting
//! image to a file.

use clap::ArgMatches;
use log::info;

use crate::api::MosaicKit;
use crate::commands::command_traits::Command;
use crate::coordinate::{CoordinateSystem, Envelope};
use crate::coverage::ReadRequest;
use crate::planner::OverviewPolicy;
use crate::raster::errors::{MosaicError, MosaicResult};

/// Command reading one mosaicked image
pub struct ReadCommand {
    /// Path to the dataset configuration
    dataset_file: String,
    /// Path of the image to write
    output_file: String,
    request: ReadRequest,
    show_progress: bool,
}

impl ReadCommand {
    /// Create a new read command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    ///
    /// # Returns
    /// A new ReadCommand instance or an error
    pub fn new(args: &ArgMatches) -> MosaicResult<Self> {
        let dataset_file = args.get_one::<String>("dataset")
            .ok_or_else(|| MosaicError::GenericError("Missing dataset file".to_string()))?
            .clone();

        let output_file = args.get_one::<String>("output")
            .ok_or_else(|| MosaicError::GenericError("Missing output file, use --output".to_string()))?
            .clone();

        let bbox = args.get_one::<String>("bbox")
            .ok_or_else(|| MosaicError::GenericError("Missing bounding box, use --bbox".to_string()))?;
        let envelope = Envelope::from_string(bbox).map_err(MosaicError::GenericError)?;

        let size = args.get_one::<String>("size")
            .ok_or_else(|| MosaicError::GenericError("Missing output size, use --size".to_string()))?;
        let (width, height) = parse_size(size)?;

        let mut request = ReadRequest::new(envelope, width, height);
        if let Some(crs) = args.get_one::<String>("crs") {
            request = request.with_crs(CoordinateSystem::parse(crs)?);
        }
        if let Some(policy) = args.get_one::<String>("policy") {
            request = request.with_policy(policy.parse::<OverviewPolicy>()?);
        }

        Ok(ReadCommand {
            dataset_file,
            output_file,
            request,
            show_progress: !args.get_flag("quiet"),
        })
    }
}

/// Parse "WIDTHxHEIGHT"
pub fn parse_size(size: &str) -> MosaicResult<(i64, i64)> {
    let parts: Vec<&str> = size.trim().split(|c| c == 'x' || c == 'X').collect();
    if parts.len() != 2 {
        return Err(MosaicError::GenericError(format!("Size must be WIDTHxHEIGHT, got {}", size)));
    }

    let parse = |part: &str| {
        part.trim()
            .parse::<i64>()
            .map_err(|_| MosaicError::GenericError(format!("Invalid size component: {}", part)))
    };
    Ok((parse(parts[0])?, parse(parts[1])?))
}

impl Command for ReadCommand {
    fn execute(&self) -> MosaicResult<()> {
        info!("Reading {} from {} at {}x{}",
              self.request.envelope, self.dataset_file, self.request.width, self.request.height);

        let kit = MosaicKit::open(&self.dataset_file)?;
        let result = kit.read_to_file(&self.request, &self.output_file, self.show_progress)?;

        info!("Rasters used: {:?}", result.raster_ids);
        info!("Output envelope: {}", result.envelope);
        for dimension in &result.sample_dimensions {
            info!("  Band {}: {} (no-data {:?})", dimension.band_id, dimension.cell_type, dimension.no_data);
        }
        Ok(())
    }
}

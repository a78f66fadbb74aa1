//! Dataset summary command

use clap::ArgMatches;
use log::info;

use crate::api::MosaicKit;
use crate::commands::command_traits::Command;
use crate::raster::errors::{MosaicError, MosaicResult};

/// Command printing the catalog of a dataset
pub struct InfoCommand {
    /// Path to the dataset configuration
    dataset_file: String,
}

impl InfoCommand {
    pub fn new(args: &ArgMatches) -> MosaicResult<Self> {
        let dataset_file = args.get_one::<String>("dataset")
            .ok_or_else(|| MosaicError::GenericError("Missing dataset file".to_string()))?
            .clone();

        Ok(InfoCommand { dataset_file })
    }
}

impl Command for InfoCommand {
    fn execute(&self) -> MosaicResult<()> {
        let kit = MosaicKit::open(&self.dataset_file)?;
        for line in kit.describe().lines() {
            info!("{}", line);
        }
        Ok(())
    }
}

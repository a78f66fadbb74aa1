//! CLI command implementations
//!
//! This module contains implementations of various commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod read_command;
pub mod info_command;

pub use command_traits::{Command, CommandFactory};
pub use read_command::ReadCommand;
pub use info_command::InfoCommand;

use clap::ArgMatches;
use crate::raster::errors::MosaicResult;

/// Factory for creating command instances based on CLI arguments
pub struct MosaickitCommandFactory;

impl MosaickitCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        MosaickitCommandFactory
    }
}

impl Default for MosaickitCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandFactory for MosaickitCommandFactory {
    fn create_command(&self, args: &ArgMatches) -> MosaicResult<Box<dyn Command>> {
        if args.get_flag("info") {
            Ok(Box::new(InfoCommand::new(args)?))
        } else {
            Ok(Box::new(ReadCommand::new(args)?))
        }
    }
}

use clap::{Arg, Command as ClapCommand, ArgAction};
use std::process;
use log::{error, LevelFilter};

use mosaickit::utils::logger::Logger;
use mosaickit::commands::{CommandFactory, MosaickitCommandFactory};

fn main() {
    let matches = ClapCommand::new("MosaicKit")
        .version("0.1")
        .about("Read mosaicked images from tiled raster pyramids")
        .arg(
            Arg::new("dataset")
                .help("Dataset configuration (TOML)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("info")
                .short('i')
                .long("info")
                .help("Print a summary of the dataset and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("bbox")
                .long("bbox")
                .help("Envelope to read (minx,miny,maxx,maxy)")
                .value_name("BBOX")
                .required(false),
        )
        .arg(
            Arg::new("size")
                .long("size")
                .help("Output size in pixels (WIDTHxHEIGHT)")
                .value_name("SIZE")
                .required(false),
        )
        .arg(
            Arg::new("crs")
                .long("crs")
                .help("CRS of the bounding box (e.g., EPSG:4326); defaults to the dataset CRS")
                .value_name("CRS")
                .required(false),
        )
        .arg(
            Arg::new("policy")
                .long("policy")
                .help("Overview policy (quality, speed, nearest, ignore)")
                .value_name("POLICY")
                .default_value("quality")
                .required(false),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output image file (.png, .tif, ... or .raw for samples)")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Hide the progress bar")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Write log records to this file as well as the console")
                .value_name("FILE")
                .required(false),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") { LevelFilter::Debug } else { LevelFilter::Info };

    match matches.get_one::<String>("log-file") {
        Some(log_file) => {
            if let Err(e) = Logger::init_global_logger(log_file, level) {
                eprintln!("Error setting up global logger: {}", e);
                process::exit(1);
            }
        }
        None => {
            env_logger::Builder::new()
                .filter_level(level)
                .parse_default_env()
                .init();
        }
    }

    let factory = MosaickitCommandFactory::new();

    let command_result = factory.create_command(&matches);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}

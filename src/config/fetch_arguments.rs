use crate::config::config::{Config, ConfigError};

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "elevator-dispatch", about = "Simulated multi-elevator dispatch controller")]
pub struct Args {
    /// JSON file with building settings. Flags below override it.
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    #[arg(long, short)]
    pub floors: Option<u8>,

    #[arg(long, short)]
    pub elevators: Option<u8>,

    #[arg(long)]
    pub pixels_per_floor: Option<u32>,

    #[arg(long)]
    pub floor_travel_ms: Option<u64>,

    #[arg(long)]
    pub door_open_ms: Option<u64>,

    /// Floors to call at startup, e.g. "5,3,8".
    #[arg(long, short, value_delimiter = ',')]
    pub script: Vec<u8>,

    /// Do not read calls from stdin. Exits once the script is served.
    #[arg(long, default_value_t = false)]
    pub no_stdin: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    #[arg(long, short, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,
}

impl Args {
    pub fn to_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(floors) = self.floors {
            config.num_floors = floors;
        }
        if let Some(elevators) = self.elevators {
            config.num_elevators = elevators;
        }
        if let Some(pixels) = self.pixels_per_floor {
            config.pixels_per_floor = pixels;
        }
        if let Some(travel) = self.floor_travel_ms {
            config.floor_travel_ms = travel;
        }
        if let Some(door) = self.door_open_ms {
            config.door_open_ms = door;
        }

        config.validate()?;
        Ok(config)
    }
}

pub fn fetch_command_line_arguments() -> Args {
    Args::parse()
}

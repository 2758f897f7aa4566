use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time;

use serde;
use thiserror::Error;

pub const DEFAULT_NUM_FLOORS: u8 = 10;
pub const DEFAULT_NUM_ELEVATORS: u8 = 5;
pub const DEFAULT_PIXELS_PER_FLOOR: u32 = 60;

pub const FLOOR_TRAVEL_DURATION: time::Duration = time::Duration::from_millis(500);
pub const DOOR_TIMER_DURATION: time::Duration = time::Duration::from_millis(4000);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings fixed at construction time. Nothing here changes while the
/// controller runs.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub num_floors: u8,
    pub num_elevators: u8,
    /// Only the presentation layer reads this.
    pub pixels_per_floor: u32,
    pub floor_travel_ms: u64,
    pub door_open_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_floors: DEFAULT_NUM_FLOORS,
            num_elevators: DEFAULT_NUM_ELEVATORS,
            pixels_per_floor: DEFAULT_PIXELS_PER_FLOOR,
            floor_travel_ms: FLOOR_TRAVEL_DURATION.as_millis() as u64,
            door_open_ms: DOOR_TIMER_DURATION.as_millis() as u64,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_floors == 0 {
            return Err(ConfigError::Invalid("there must be at least one floor".to_string()));
        }
        if self.num_elevators == 0 {
            return Err(ConfigError::Invalid("there must be at least one elevator".to_string()));
        }
        Ok(())
    }

    pub fn floor_travel_duration(&self) -> time::Duration {
        time::Duration::from_millis(self.floor_travel_ms)
    }

    pub fn door_open_duration(&self) -> time::Duration {
        time::Duration::from_millis(self.door_open_ms)
    }

    pub fn is_valid_floor(&self, floor: u8) -> bool {
        floor < self.num_floors
    }
}

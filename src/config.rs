use std::path::Path;

use anyhow::{bail, Context, Error};
use common::color::LaserColor;
use log::info;
use serde::{Deserialize, Serialize};

use crate::pins::PinAssignment;

pub const CONFIG_FILE: &str = "config.ron";

/// Points per second the galvos can follow without smearing corners
pub const DEFAULT_POINT_RATE: u32 = 20_000;

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct Config {
    pub pins: PinAssignment,
    /// Colour restored by `set_laser_color()`
    pub default_color: LaserColor,
    pub point_rate: u32,
    pub link: Link,
}

/// Serial link to the microcontroller that owns the DACs
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct Link {
    pub path: String,
    pub baud: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pins: PinAssignment::default(),
            default_color: LaserColor::WHITE,
            point_rate: DEFAULT_POINT_RATE,
            link: Link::default(),
        }
    }
}

impl Default for Link {
    fn default() -> Self {
        Self {
            path: "/dev/serial0".to_string(),
            baud: 115_200,
        }
    }
}

impl Config {
    /// Load `config.ron` from the working directory, falling back to the
    /// defaults when it does not exist
    pub fn load() -> Result<Config, Error> {
        if !Path::new(CONFIG_FILE).exists() {
            info!("No {} found, using the default configuration", CONFIG_FILE);
            return Ok(Config::default());
        }

        Config::load_from(CONFIG_FILE)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Config, Error> {
        let path = path.as_ref();
        let config = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = Config::from_ron(&config)
            .with_context(|| format!("loading {}", path.display()))?;

        info!("Loaded configuration from {}: {}", path.display(), config.pins);

        Ok(config)
    }

    pub fn from_ron(contents: &str) -> Result<Config, Error> {
        let config: Config = ron::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.pins.validate()?;

        if self.point_rate == 0 {
            bail!("point_rate must be greater than zero");
        }

        Ok(())
    }
}

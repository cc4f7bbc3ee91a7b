//! Tunable dungeon parameters, loadable from TOML.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest odd side that still leaves room for a start door three cells from the corners.
pub const MIN_DIMENSION: usize = 7;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DungeonConfig {
    pub width: usize,
    pub height: usize,
    pub enemy_count: usize,
    pub enemy_min_distance: u32,
    pub light_radius: i32,
    /// Extra corridors punched into the perfect maze. Defaults to one per hundred cells, plus one.
    pub loop_count: Option<usize>,
    pub door_attempts: usize,
    pub placement_attempts: usize,
    pub max_regenerations: usize,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            width: 39,
            height: 19,
            enemy_count: 8,
            enemy_min_distance: 3,
            light_radius: 3,
            loop_count: None,
            door_attempts: 64,
            placement_attempts: 4096,
            max_regenerations: 16,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("map {axis:?} must be odd, got {value}")]
    EvenDimension { axis: Axis, value: usize },
    #[error("map {axis:?} must be at least 7, got {value}")]
    DimensionTooSmall { axis: Axis, value: usize },
    #[error("{field} must be greater than zero")]
    ZeroBudget { field: &'static str },
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

impl DungeonConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigLoadError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (axis, value) in [(Axis::Width, self.width), (Axis::Height, self.height)] {
            if value < MIN_DIMENSION {
                return Err(ConfigError::DimensionTooSmall { axis, value });
            }
            if value % 2 == 0 {
                return Err(ConfigError::EvenDimension { axis, value });
            }
        }
        if self.enemy_min_distance == 0 {
            return Err(ConfigError::ZeroBudget { field: "enemy_min_distance" });
        }
        if self.door_attempts == 0 {
            return Err(ConfigError::ZeroBudget { field: "door_attempts" });
        }
        if self.placement_attempts == 0 {
            return Err(ConfigError::ZeroBudget { field: "placement_attempts" });
        }
        Ok(())
    }

    pub fn loop_count(&self) -> usize {
        self.loop_count.unwrap_or((self.width * self.height) / 100 + 1)
    }
}

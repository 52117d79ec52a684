use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common::P;
use crate::pipe::{GeneratorOption, MAX_BOARD_SIZE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] io::Error),
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Game settings. Every field has a default, so a config file only needs the
/// keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub grid_size: i32,
    /// Edge length of one cell on the drawing surface, in pixels.
    pub tile_size: u32,
    pub animation_interval_ms: u64,
    pub carve_bias: usize,
    pub max_generation_attempts: u32,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        GameConfig {
            grid_size: 8,
            tile_size: 60,
            animation_interval_ms: 100,
            carve_bias: 3,
            max_generation_attempts: 16,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_json_str(src: &str) -> Result<GameConfig, ConfigError> {
        let config: GameConfig = serde_json::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<Q: AsRef<Path>>(path: Q) -> Result<GameConfig, ConfigError> {
        GameConfig::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 2 {
            return Err(ConfigError::Invalid(format!(
                "grid_size must be at least 2, got {}",
                self.grid_size
            )));
        }
        if self.grid_size > MAX_BOARD_SIZE {
            return Err(ConfigError::Invalid(format!(
                "grid_size must be at most {}, got {}",
                MAX_BOARD_SIZE, self.grid_size
            )));
        }
        if self.tile_size == 0 {
            return Err(ConfigError::Invalid("tile_size must be positive".to_string()));
        }
        if self.carve_bias == 0 {
            return Err(ConfigError::Invalid("carve_bias must be positive".to_string()));
        }
        Ok(())
    }

    pub fn generator_option(&self) -> GeneratorOption {
        GeneratorOption {
            size: self.grid_size,
            bias: self.carve_bias,
            max_attempts: self.max_generation_attempts,
            ..GeneratorOption::default()
        }
    }

    pub fn animation_interval(&self) -> Duration {
        Duration::from_millis(self.animation_interval_ms)
    }

    /// Side length of the drawing surface in pixels.
    pub fn canvas_size(&self) -> u32 {
        (self.grid_size.max(0) as u32).saturating_mul(self.tile_size)
    }

    /// Cell under a pixel of the drawing surface; `None` off the grid.
    pub fn cell_at_pixel(&self, x: f64, y: f64) -> Option<P> {
        if !(x >= 0.0 && y >= 0.0) {
            return None;
        }
        let tile = self.tile_size as f64;
        let col = (x / tile).floor();
        let row = (y / tile).floor();
        let size = self.grid_size as f64;
        if row < size && col < size {
            Some(P(row as i32, col as i32))
        } else {
            None
        }
    }
}

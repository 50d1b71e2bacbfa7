//! Game settings.

use serde::{Deserialize, Serialize};

use crate::coord::BoundaryMode;
use crate::error::ConfigError;

/// Smallest board that fits the starting snake plus an apple.
pub const MIN_BOARD_SIZE: u32 = 5;
/// Largest board accepted; keeps `size * size` cells addressable on wasm32.
pub const MAX_BOARD_SIZE: u32 = 1024;
pub const DEFAULT_BOARD_SIZE: u32 = 10;
pub const DEFAULT_TICK_INTERVAL_MS: u32 = 150;

/// Settings fixed at game construction.
///
/// Deserializes from the page's settings object (`camelCase` keys); missing
/// fields take the defaults below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// Width and height of the square grid. Default 10.
    pub board_size: u32,
    /// Milliseconds between ticks. Default 150.
    pub tick_interval_ms: u32,
    /// Default `Bounded`.
    pub boundary_mode: BoundaryMode,
    /// Seed for apple placement. `None` lets the host pick one; the engine
    /// falls back to 0.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            boundary_mode: BoundaryMode::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Parses and validates a JSON settings object.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size < MIN_BOARD_SIZE {
            return Err(ConfigError::BoardTooSmall {
                size: self.board_size,
                min: MIN_BOARD_SIZE,
            });
        }
        if self.board_size > MAX_BOARD_SIZE {
            return Err(ConfigError::BoardTooLarge {
                size: self.board_size,
                max: MAX_BOARD_SIZE,
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }
}

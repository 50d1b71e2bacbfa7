//! Board coordinates and the two boundary modes.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::error::{ConfigError, GameError};

/// How coordinates behave at the board edge. Fixed for the lifetime of a game.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum BoundaryMode {
    /// Leaving the grid is fatal.
    #[default]
    Bounded,
    /// Coordinates wrap modulo the board size.
    Wrapping,
}

impl BoundaryMode {
    /// Maps the settings form's "game version" (1 or 2) to a mode.
    pub fn from_version(version: u8) -> Result<Self, ConfigError> {
        match version {
            1 => Ok(Self::Bounded),
            2 => Ok(Self::Wrapping),
            other => Err(ConfigError::UnknownVersion(other)),
        }
    }
}

/// A cell address on a `size` x `size` board.
///
/// Always in range once constructed: Bounded construction rejects anything
/// off the grid, Wrapping construction folds it back on.
#[derive(Clone, Copy, Debug)]
pub struct Coordinate {
    x: i32,
    y: i32,
    size: u32,
}

impl Coordinate {
    /// # Panics
    /// Wrapping construction divides by `size`, so `size` must be non-zero.
    /// Configured games always pass a validated size of at least 5.
    pub fn new(x: i32, y: i32, size: u32, mode: BoundaryMode) -> Result<Self, GameError> {
        assert!(size > 0, "board size must be non-zero");
        let n = size as i32;
        match mode {
            BoundaryMode::Wrapping => Ok(Self {
                x: x.rem_euclid(n),
                y: y.rem_euclid(n),
                size,
            }),
            BoundaryMode::Bounded => {
                if x < 0 || x >= n || y < 0 || y >= n {
                    return Err(GameError::OutOfBounds { x, y, size });
                }
                Ok(Self { x, y, size })
            }
        }
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Linear address into the board, `x + y * size`.
    #[must_use]
    pub fn index(&self) -> usize {
        self.x as usize + self.y as usize * self.size as usize
    }

    /// The neighbouring cell one step towards `direction`.
    pub fn step(&self, direction: Direction, mode: BoundaryMode) -> Result<Self, GameError> {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy, self.size, mode)
    }
}

// Board size is shared by every coordinate of a game, so only x and y take part.
impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

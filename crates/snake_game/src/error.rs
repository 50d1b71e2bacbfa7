//! Error types. Every `GameError` ends the game it occurs in.

use std::fmt;

use thiserror::Error;

/// Fatal conditions raised while a game is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("({x}, {y}) is outside the {size}x{size} board")]
    OutOfBounds { x: i32, y: i32, size: u32 },
    #[error("snake ran into itself at ({x}, {y})")]
    SelfCollision { x: i32, y: i32 },
    #[error("direction code {0} is not one of the four cardinal directions")]
    InvalidDirection(u8),
    #[error("no empty cell left for the apple")]
    BoardFull,
}

impl GameError {
    #[must_use]
    pub fn reason(&self) -> GameOverReason {
        match self {
            Self::OutOfBounds { .. } => GameOverReason::OutOfBounds,
            Self::SelfCollision { .. } => GameOverReason::SelfCollision,
            Self::InvalidDirection(_) => GameOverReason::InvalidDirection,
            Self::BoardFull => GameOverReason::BoardFull,
        }
    }
}

/// Reason reported to `onGameOver`. `Display` yields the bare variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOverReason {
    OutOfBounds,
    SelfCollision,
    InvalidDirection,
    BoardFull,
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OutOfBounds => "OutOfBounds",
            Self::SelfCollision => "SelfCollision",
            Self::InvalidDirection => "InvalidDirection",
            Self::BoardFull => "BoardFull",
        };
        f.write_str(name)
    }
}

/// Settings rejected before a game is created.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("board size {size} is below the minimum of {min}")]
    BoardTooSmall { size: u32, min: u32 },
    #[error("board size {size} is above the maximum of {max}")]
    BoardTooLarge { size: u32, max: u32 },
    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,
    #[error("unknown game version {0}, expected 1 (bounded) or 2 (wrapping)")]
    UnknownVersion(u8),
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot lay out the starting board: {0}")]
    Layout(#[from] GameError),
}

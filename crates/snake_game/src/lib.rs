//! Grid snake game engine.

pub mod cell;
pub mod config;
pub mod coord;
pub mod direction;
pub mod engine;
pub mod error;
pub mod input;
pub mod snake;
pub mod web;

use cell::CellState;
use coord::{BoundaryMode, Coordinate};
use error::GameError;
use rand::Rng;

pub use config::GameConfig;
pub use engine::{GameEngine, Headless, Phase, Presenter, TickOutcome};
pub use error::{ConfigError, GameOverReason};

/// Square grid of cell states, row-major.
#[derive(Debug, Clone)]
pub struct Board {
    size: u32,
    cells: Vec<CellState>,
}

impl Board {
    #[must_use]
    pub fn new(size: u32) -> Self {
        Self {
            size,
            cells: vec![CellState::Empty; size as usize * size as usize],
        }
    }

    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[must_use]
    pub fn get(&self, at: &Coordinate) -> CellState {
        self.cells[at.index()]
    }

    pub fn set(&mut self, at: &Coordinate, state: CellState) {
        self.cells[at.index()] = state;
    }

    #[must_use]
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    #[must_use]
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&cell| cell == state).count()
    }

    /// Draws uniformly random cells until one is Empty.
    ///
    /// Fails with `BoardFull` up front when no Empty cell exists, since the
    /// draw would otherwise never terminate.
    pub fn sample_empty<R: Rng>(&self, rng: &mut R) -> Result<Coordinate, GameError> {
        if !self.cells.contains(&CellState::Empty) {
            return Err(GameError::BoardFull);
        }
        loop {
            let x = rng.gen_range(0..self.size) as i32;
            let y = rng.gen_range(0..self.size) as i32;
            let candidate = Coordinate::new(x, y, self.size, BoundaryMode::Bounded)?;
            if self.get(&candidate) == CellState::Empty {
                return Ok(candidate);
            }
        }
    }
}

//! The snake body: an ordered run of coordinates, head first.
//!
//! `Snake` knows nothing about the board. The engine marks and clears cells
//! around `push_head` / `pop_tail` so the two stay in step.

use std::collections::VecDeque;

use crate::coord::{BoundaryMode, Coordinate};
use crate::error::GameError;

pub const INITIAL_LENGTH: usize = 3;

#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Coordinate>,
}

impl Snake {
    /// Three segments on row `size - 2`, columns 1..=3, head on the right.
    pub fn initial(size: u32) -> Result<Self, GameError> {
        let row = size as i32 - 2;
        let mut body = VecDeque::with_capacity(INITIAL_LENGTH);
        for x in 1..=INITIAL_LENGTH as i32 {
            body.push_front(Coordinate::new(x, row, size, BoundaryMode::Bounded)?);
        }
        Ok(Self { body })
    }

    /// Builds a snake from explicit segments, head first.
    #[cfg(test)]
    pub(crate) fn from_segments(segments: impl IntoIterator<Item = Coordinate>) -> Self {
        Self {
            body: segments.into_iter().collect(),
        }
    }

    /// # Panics
    /// Never for a snake built by `initial`, which always holds segments.
    #[must_use]
    pub fn head(&self) -> Coordinate {
        self.body[0]
    }

    /// # Panics
    /// Never for a snake built by `initial`, which always holds segments.
    #[must_use]
    pub fn tail(&self) -> Coordinate {
        self.body[self.body.len() - 1]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Coordinate> + '_ {
        self.body.iter()
    }

    #[must_use]
    pub fn contains(&self, c: &Coordinate) -> bool {
        self.body.contains(c)
    }

    pub fn push_head(&mut self, c: Coordinate) {
        self.body.push_front(c);
    }

    pub fn pop_tail(&mut self) -> Option<Coordinate> {
        self.body.pop_back()
    }

    /// Whether moving the head onto `next` runs into the body.
    ///
    /// The tail cell is free when the snake is not growing, since the tail
    /// leaves it on the same tick the head arrives.
    #[must_use]
    pub fn collides(&self, next: &Coordinate, growing: bool) -> bool {
        let last = self.body.len().saturating_sub(1);
        self.body
            .iter()
            .enumerate()
            .any(|(i, segment)| segment == next && (growing || i != last))
    }
}
